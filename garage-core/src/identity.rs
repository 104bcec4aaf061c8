use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles recognized by the shop application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Customer,
}

/// Authenticated caller identity, threaded explicitly into every component
/// that needs it. Replaces ambient token storage: nothing below the HTTP
/// middleware reads global state to discover who is calling.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Token subject (user identifier)
    pub subject: String,
    /// Client record the caller is bound to, when the caller is a customer
    pub client_id: Option<Uuid>,
    pub role: Role,
}

impl AuthContext {
    pub fn new(subject: impl Into<String>, client_id: Option<Uuid>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            client_id,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
