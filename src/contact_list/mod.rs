// Contact list API - owners and the contacts attached to them
mod error;
mod handlers;
mod memory_store;
mod pg_store;
mod service;
mod store;
mod types;
mod validation;

pub use error::*;
pub use handlers::*;
pub use memory_store::*;
pub use pg_store::*;
pub use service::*;
pub use store::*;
pub use types::*;
pub use validation::*;
