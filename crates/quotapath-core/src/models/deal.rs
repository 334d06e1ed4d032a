//! Pipeline models: deals and quotas.

use serde::{Deserialize, Serialize};

choice_enum! {
    pub enum DealStatus {
        Open => ("open", "Open"),
        ClosedWon => ("closed_won", "Won"),
        ClosedLost => ("closed_lost", "Lost"),
    }
}

choice_enum! {
    pub enum DealStage {
        Prospecting => ("prospecting", "Prospecting"),
        Qualification => ("qualification", "Qualification"),
        Proposal => ("proposal", "Proposal"),
        Negotiation => ("negotiation", "Negotiation"),
        Closed => ("closed", "Closed"),
    }
}

choice_enum! {
    pub enum QuotaPeriod {
        Monthly => ("monthly", "Monthly"),
        Quarterly => ("quarterly", "Quarterly"),
        Annual => ("annual", "Annual"),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Deal {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub account_name: String,
    pub owner: i64,
    #[serde(default)]
    pub owner_name: String,
    pub amount: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub status: DealStatus,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub stage: DealStage,
    #[serde(default)]
    pub probability: i32,
    #[serde(default)]
    pub close_date: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub last_activity: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub days_since_created: i64,
}

impl Deal {
    pub fn is_won(&self) -> bool {
        self.status == DealStatus::ClosedWon
    }
}

/// Filters for `GET /sales/deals/`, sent as query parameters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DealQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DealStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<DealStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<i64>,
}

impl DealQuery {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.stage.is_none() && self.owner.is_none()
    }
}

/// Create or partially update a deal. Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DealDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DealStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<DealStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Quota {
    pub id: i64,
    pub user: i64,
    #[serde(default)]
    pub user_name: String,
    pub amount: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub period: QuotaPeriod,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub attainment_percentage: f64,
}

/// Payload for `POST /sales/quotas/`.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaDraft {
    pub user: i64,
    pub amount: String,
    pub period: QuotaPeriod,
    pub start_date: String,
    pub end_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(DealStatus::ClosedWon.label(), "Won");
        assert_eq!(DealStatus::ClosedLost.to_string(), "Lost");
        assert_eq!(DealStatus::from("stalled").label(), "stalled");
        assert_eq!(DealStage::from("negotiation").label(), "Negotiation");
    }

    #[test]
    fn test_parse_deal() {
        let json = r#"{"id": 12, "name": "Acme renewal", "account_name": "Acme", "owner": 3, "owner_name": "Jane Doe", "amount": "12500.00", "status": "closed_won", "stage": "closed", "probability": 100, "close_date": "2024-03-05", "created_date": "2024-01-10T10:00:00Z", "last_activity": "2024-03-05T16:30:00Z", "description": null, "days_since_created": 55}"#;
        let deal: Deal = serde_json::from_str(json).expect("Failed to parse deal JSON");
        assert!(deal.is_won());
        assert_eq!(deal.stage, DealStage::Closed);
        assert_eq!(deal.amount, "12500.00");
    }

    #[test]
    fn test_deal_query_serializes_only_set_filters() {
        let query = DealQuery {
            status: Some(DealStatus::Open),
            ..Default::default()
        };
        let value = serde_json::to_value(&query).expect("Failed to serialize query");
        assert_eq!(value, serde_json::json!({"status": "open"}));
        assert!(DealQuery::default().is_empty());
    }
}
