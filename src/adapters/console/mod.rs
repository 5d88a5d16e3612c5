pub mod summary;

pub use summary::ConsolePresenter;
