//! Headless data-access core for the payroll admin screens. Every list
//! page is the same machine: fetch a collection, normalize the backend's
//! inconsistent field casings, filter/sort/page it client-side, and push
//! create/edit/delete operations back through the REST API with retries,
//! cancellation, and transient user feedback. This crate implements that
//! machine once; `resources` instantiates it per resource.

pub mod auth;
pub mod cancel;
pub mod crud;
pub mod error;
pub mod messages;
pub mod normalize;
pub mod paging;
pub mod record;
pub mod resource;
pub mod resources;
pub mod retry;

pub use auth::{MemoryTokenStore, StaticTokenProvider, TokenProvider};
pub use cancel::{CancelSource, CancelToken};
pub use crud::{CrudOptions, CrudResource};
pub use error::ClientError;
pub use messages::{MessageKind, MessageStore};
pub use normalize::{FieldMap, Transform, normalize};
pub use paging::{Page, SortDirection, filter_by, paginate, sort_by};
pub use record::CanonicalRecord;
pub use resource::{Backend, ResourceClient};
pub use resources::ResourceSpec;
pub use retry::{Backoff, RetryPolicy, with_retry};
