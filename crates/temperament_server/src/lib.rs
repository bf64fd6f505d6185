//! temperament_server: REST surface and PDF backend for the temperament test.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pdf;
pub mod router;
