//! HTTP server: session API and the normalize endpoint.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
