// Query module.
// Cache keys, in-memory result cache, query state, and the gated query operations.

pub mod cache;
pub mod key;
pub mod queries;
pub mod state;

pub use cache::{CachedEntry, DEFAULT_TTL, EXAM_LIST_TTL, QueryCache, USER_SNAPSHOT_TTL};
pub use key::{NAMESPACE, QueryKey};
pub use queries::Queries;
pub use state::QueryState;
