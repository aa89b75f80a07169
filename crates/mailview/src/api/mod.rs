//! Backend API access
//!
//! [`ApiClient`] issues GET requests under `/api/` through a [`Transport`]
//! and normalizes failures into [`ApiError`].

mod client;
mod transport;

pub use client::{API_PREFIX, ApiClient, ApiError};
pub use transport::{LocalBoxFuture, RawResponse, StaticTransport, Transport, UreqTransport};
