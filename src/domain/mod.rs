//! Domain types and DTOs
//!
//! These types define the data structures exchanged with the task service.

pub mod tasks;

pub use tasks::*;
