//! Backend document storage.

mod memory;
mod query;
mod rest;
mod subscription;
mod traits;

pub use memory::MemoryStore;
pub use query::{compare_values, prefix_bounds, FieldFilter, Query, PREFIX_END};
pub use rest::RestStore;
pub use subscription::{Subscription, Watch};
pub use traits::{is_server_timestamp, server_timestamp, Document, DocumentStore, DocumentStoreExt};
