pub mod error;
pub mod identity;
pub mod money;
pub mod repository;

pub use error::StoreError;
pub use identity::{AuthContext, Role};
pub use repository::{CatalogKind, CatalogRepository, OrderRepository};
