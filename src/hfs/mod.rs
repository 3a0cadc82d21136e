// HFS API module.
// Provides the endpoint registry, transport, and typed access to the HFS REST API.

pub mod aggregate;
pub mod api;
pub mod client;
pub mod endpoints;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use aggregate::merge_subject_exams;
pub use api::HfsApi;
pub use client::HfsClient;
pub use endpoints::Endpoint;
pub use transport::Transport;
pub use types::*;
