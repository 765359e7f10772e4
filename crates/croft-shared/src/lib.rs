//! # Croft Shared
//!
//! Types shared between the server and its clients: request DTOs and the
//! error response envelope.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
