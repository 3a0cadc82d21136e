//! Query layer for the HFS exam results API.
//!
//! - [`hfs::Endpoint`] is the endpoint registry with `${name}` URL templates.
//! - [`hfs::HfsApi`] issues typed requests over a [`hfs::Transport`] and
//!   unwraps the `{ok, payload, errMsg}` envelope.
//! - [`query::Queries`] gates each operation on its token and parameters and
//!   caches results in a [`query::QueryCache`].

pub mod config;
pub mod error;
pub mod hfs;
pub mod query;

pub use config::ClientConfig;
pub use error::{HfsError, Result};
pub use hfs::{Endpoint, ExamSummary, HfsApi, HfsClient, Transport};
pub use query::{Queries, QueryCache, QueryKey, QueryState};
