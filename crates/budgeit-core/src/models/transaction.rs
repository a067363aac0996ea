//! Transaction models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded money movement from `outflow` to `inflow`.
///
/// Each endpoint is a pocket id or a free-form external source/sink name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub inflow: String,
    pub outflow: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body for recording a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub name: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub inflow: String,
    pub outflow: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_iso_dates() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "t1",
            "name": "Paycheck",
            "amount": 2500.0,
            "date": "2024-03-01T00:00:00.000Z",
            "inflow": "p1",
            "outflow": "Employer",
            "tags": ["income"]
        }))
        .unwrap();

        assert_eq!(tx.date, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(tx.tags.as_deref(), Some(&["income".to_string()][..]));
        assert!(tx.note.is_none());
    }
}
