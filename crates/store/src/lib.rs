mod error;
mod memory;
mod model;
mod pg;
mod query;
mod store;

pub use error::StoreError;
pub use memory::MemStore;
pub use model::{Comment, Reply, User};
pub use pg::PgStore;
pub use query::{CommentQuery, OrderBy, OrderDirection};
pub use store::{Store, StoreResult};
