pub mod catalog;
pub mod models;
pub mod normalize;

pub use catalog::Catalog;
pub use models::{Part, Service};
pub use normalize::{normalize_part, normalize_service};
