//! Core use-case services.
//!
//! # Responsibility
//! - Wrap repository calls into the lookups other components depend on.
//! - Keep callers decoupled from storage details.

pub mod user_storage;
