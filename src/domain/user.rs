use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::domain::models::UserId;

/// Role a user holds at a single site.
///
/// Closed set on purpose: every permission decision must be an exhaustive
/// match so a new role cannot silently inherit behavior.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, sqlx::Type,
)]
#[sqlx(type_name = "site_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteRole {
    Member,
    Admin,
}

/// What a caller is trying to do within a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteAction {
    Read,
    Create,
    /// Update or delete a record; carries whether the caller created it.
    Modify { own_record: bool },
}

impl SiteRole {
    /// The single point where site permissions are decided.
    pub fn permits(&self, action: SiteAction) -> bool {
        match (self, action) {
            (SiteRole::Member, SiteAction::Read) => true,
            (SiteRole::Member, SiteAction::Create) => true,
            (SiteRole::Member, SiteAction::Modify { own_record }) => own_record,
            (SiteRole::Admin, SiteAction::Read) => true,
            (SiteRole::Admin, SiteAction::Create) => true,
            (SiteRole::Admin, SiteAction::Modify { .. }) => true,
        }
    }
}

impl fmt::Display for SiteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role_str = match self {
            SiteRole::Member => "member",
            SiteRole::Admin => "admin",
        };
        write!(f, "{role_str}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
}
