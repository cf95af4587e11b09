use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::domain::models::{InteractionId, SiteId, UserId};

/// Kind of interaction record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, strum::EnumString,
)]
#[sqlx(type_name = "interaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionKind {
    Meeting,
    Call,
    Email,
    Note,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionKind::Meeting => write!(f, "meeting"),
            InteractionKind::Call => write!(f, "call"),
            InteractionKind::Email => write!(f, "email"),
            InteractionKind::Note => write!(f, "note"),
        }
    }
}

/// A business interaction record, owned by exactly one site.
///
/// Soft-deleted rows (`deleted_at` set) are filtered out by every read path.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: InteractionId,
    pub site_id: SiteId,
    pub title: String,
    pub kind: InteractionKind,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    /// IANA timezone name the scheduling window was entered in.
    pub timezone: Option<String>,
    pub participants: Vec<String>,
    pub notes: Option<String>,
    pub created_by: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Payload for creating an interaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInteraction {
    pub site_id: SiteId,
    pub title: String,
    pub kind: InteractionKind,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub notes: Option<String>,
}

/// Payload for updating an interaction. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionUpdate {
    pub title: Option<String>,
    pub kind: Option<InteractionKind>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub starts_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    pub timezone: Option<String>,
    pub participants: Option<Vec<String>>,
    pub notes: Option<String>,
}
