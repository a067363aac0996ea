//! Pocket group models.

use serde::{Deserialize, Serialize};

use super::Pocket;

/// A named collection of pockets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PocketGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub pockets: Vec<Pocket>,
}

impl PocketGroup {
    /// Sum of the amounts held in the group's pockets.
    pub fn total(&self) -> f64 {
        self.pockets.iter().map(|p| p.amount).sum()
    }
}

/// Body for creating a group. Pockets are referenced by id on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPocketGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub pockets: Vec<String>,
}
