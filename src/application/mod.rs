//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Use cases translate incoming commands into
//! domain calls and log what happened.

pub mod invoice;
