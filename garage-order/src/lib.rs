pub mod lifecycle;
pub mod models;
pub mod normalize;
pub mod valuation;

pub use lifecycle::{LifecycleController, LifecycleError};
pub use models::{
    Order, OrderHeader, OrderStatus, OrderUpdate, PartSelection, PartUsage, ServiceUsage,
    StatusUpdate,
};
pub use normalize::normalize_order;
pub use valuation::{
    compute_form_total, compute_order_total, price_of_part_usage, price_of_service_usage,
    resolve_display_total,
};
