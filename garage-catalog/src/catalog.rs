use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::models::{Part, Service};
use crate::normalize::{normalize_part, normalize_service};

/// Id-indexed snapshot of the live catalog, used for form-time valuation
/// while an order is still being composed (no usages persisted yet).
///
/// Prices are looked up against whatever the catalog holds right now; there
/// is no per-order price snapshotting.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    services: HashMap<Uuid, Service>,
    parts: HashMap<Uuid, Part>,
}

impl Catalog {
    pub fn new(services: Vec<Service>, parts: Vec<Part>) -> Self {
        Self {
            services: services.into_iter().map(|s| (s.id, s)).collect(),
            parts: parts.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Build from raw repository payloads, dropping entries that are not
    /// even objects.
    pub fn from_payloads(services: &[Value], parts: &[Value]) -> Self {
        Self::new(
            services.iter().filter_map(normalize_service).collect(),
            parts.iter().filter_map(normalize_part).collect(),
        )
    }

    pub fn service(&self, id: &Uuid) -> Option<&Service> {
        self.services.get(id)
    }

    pub fn part(&self, id: &Uuid) -> Option<&Part> {
        self.parts.get(id)
    }
}
