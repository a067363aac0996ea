//! Pocket models.

use serde::{Deserialize, Serialize};

/// A named money bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pocket {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Body for creating a pocket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPocket {
    pub name: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Body for updating a pocket. Only name and group membership are editable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PocketUpdate {
    pub name: String,
    pub group_id: Option<String>,
}

impl From<&Pocket> for PocketUpdate {
    fn from(pocket: &Pocket) -> Self {
        Self {
            name: pocket.name.clone(),
            group_id: pocket.group_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_sends_null_group_to_ungroup() {
        let update = PocketUpdate {
            name: "Rent".into(),
            group_id: None,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "name": "Rent", "groupId": null })
        );
    }

    #[test]
    fn new_pocket_omits_empty_optionals() {
        let pocket = NewPocket {
            name: "Travel".into(),
            amount: 0.0,
            note: None,
            group_id: Some("g1".into()),
        };
        assert_eq!(
            serde_json::to_value(&pocket).unwrap(),
            json!({ "name": "Travel", "amount": 0.0, "groupId": "g1" })
        );
    }
}
