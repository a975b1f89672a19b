//! Admin user types
//!
//! Profile returned by the login endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_enum_conversions;
use crate::types::session::RefreshGrant;

/// Platform roles; only `Admin` may use the admin panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    FranchiseOwner,
    Customer,
}

impl_domain_enum_conversions!(UserRole {
    Admin => "admin",
    FranchiseOwner => "franchise_owner",
    Customer => "customer",
});

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Kept as the raw wire value so unknown roles still deserialize
    pub role: String,
    #[serde(default)]
    pub franchise_id: Option<String>,
}

impl AdminUser {
    /// Parsed role, `None` for roles this client does not know.
    pub fn role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }
}

/// Body of a successful `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub grant: Option<RefreshGrant>,
    pub user: Option<AdminUser>,
}

impl LoginResponse {
    pub fn from_body(body: &Value) -> Self {
        let user = body.get("user").and_then(|user| serde_json::from_value(user.clone()).ok());
        Self { grant: RefreshGrant::from_body(body), user }
    }
}
