use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::models::SiteId;

/// A tenant boundary. All interaction records belong to exactly one site.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub description: Option<String>,
}
