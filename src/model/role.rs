use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Role-specific dashboard shell. Each shell owns its own attendance state.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DashboardRole {
    Manager,
    Finance,
}

impl DashboardRole {
    pub fn from_slug(slug: &str) -> Option<Self> {
        slug.parse().ok()
    }
}
