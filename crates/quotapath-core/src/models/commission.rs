//! Compensation plans and calculated commissions.

use serde::{Deserialize, Serialize};

choice_enum! {
    pub enum PlanType {
        FlatRate => ("flat_rate", "Flat Rate"),
        Percentage => ("percentage", "Percentage"),
        Tiered => ("tiered", "Tiered"),
        QuotaBased => ("quota_based", "Quota Based"),
    }
}

choice_enum! {
    pub enum CommissionStatus {
        Pending => ("pending", "Pending"),
        Calculated => ("calculated", "Calculated"),
        Paid => ("paid", "Paid"),
        Disputed => ("disputed", "Disputed"),
    }
}

/// One tier of a tiered plan. Bounds are inclusive decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommissionRule {
    pub id: i64,
    #[serde(default)]
    pub min_amount: Option<String>,
    #[serde(default)]
    pub max_amount: Option<String>,
    pub commission_rate: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CompensationPlan {
    pub id: i64,
    pub name: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub plan_type: PlanType,
    pub base_rate: String,
    #[serde(default)]
    pub threshold_amount: Option<String>,
    #[serde(default)]
    pub accelerator_rate: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub rules: Vec<CommissionRule>,
}

/// Payload for `POST /commissions/plans/`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDraft {
    pub name: String,
    pub plan_type: PlanType,
    pub base_rate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerator_rate: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Commission {
    pub id: i64,
    pub user: i64,
    #[serde(default)]
    pub user_name: String,
    pub deal: i64,
    #[serde(default)]
    pub deal_name: String,
    pub compensation_plan: i64,
    #[serde(default)]
    pub plan_name: String,
    pub commission_amount: String,
    pub commission_rate: String,
    pub deal_amount: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub status: CommissionStatus,
    #[serde(default)]
    pub calculation_date: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Filters for `GET /commissions/commissions/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommissionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CommissionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
}

/// Partial update for `PATCH /commissions/commissions/{id}/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommissionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CommissionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /commissions/calculate/`. No ids means "all unprocessed
/// closed-won deals".
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalculateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CalculateResponse {
    pub message: String,
    #[serde(default)]
    pub commission_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_with_rules() {
        let json = r#"{"id": 1, "name": "Tiered 2024", "plan_type": "tiered", "base_rate": "0.0500", "threshold_amount": null, "accelerator_rate": null, "is_active": true, "description": "", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z", "rules": [{"id": 1, "min_amount": "0.00", "max_amount": "50000.00", "commission_rate": "0.0500", "order": 1}, {"id": 2, "min_amount": "50000.01", "max_amount": null, "commission_rate": "0.0800", "order": 2}]}"#;
        let plan: CompensationPlan = serde_json::from_str(json).expect("Failed to parse plan JSON");
        assert_eq!(plan.plan_type, PlanType::Tiered);
        assert_eq!(plan.rules.len(), 2);
        assert!(plan.rules[1].max_amount.is_none());
    }

    #[test]
    fn test_commission_status_labels() {
        assert_eq!(CommissionStatus::Pending.label(), "Pending");
        assert_eq!(CommissionStatus::from("disputed"), CommissionStatus::Disputed);
        assert_eq!(CommissionStatus::from("void").to_string(), "void");
    }

    #[test]
    fn test_calculate_request_body() {
        let all = serde_json::to_value(CalculateRequest::default()).expect("Failed to serialize");
        assert_eq!(all, serde_json::json!({}));

        let some = CalculateRequest {
            deal_ids: Some(vec![4, 9]),
        };
        let some = serde_json::to_value(some).expect("Failed to serialize");
        assert_eq!(some, serde_json::json!({"deal_ids": [4, 9]}));
    }
}
