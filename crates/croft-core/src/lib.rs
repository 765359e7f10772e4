//! # Croft Core
//!
//! The domain layer of the Croft feed backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the post aggregate, the repository port, and the [`PostService`] that
//! enforces authorship rules over it.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::ServiceError;
pub use service::PostService;
