//! Aggregate metrics for the dashboard and commissions views.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DashboardStats {
    pub total_deals: i64,
    pub total_value: String,
    pub won_deals: i64,
    pub won_value: String,
    pub lost_deals: i64,
    pub open_deals: i64,
    pub average_deal_size: String,
    pub win_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PipelineData {
    pub stage: String,
    pub count: i64,
    /// Raw aggregate; the backend sends it as a bare JSON number.
    #[serde(deserialize_with = "decimal_string")]
    pub total_value: String,
    #[serde(default)]
    pub avg_probability: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommissionSummary {
    pub total_commissions: String,
    pub pending_commissions: String,
    pub paid_commissions: String,
    pub commission_count: i64,
    pub average_commission: String,
}

/// Accepts a decimal sent either as a JSON string or as a bare number and
/// keeps it as text, like every other amount in the models.
fn decimal_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Decimal::deserialize(deserializer)? {
        Decimal::Text(text) => text,
        Decimal::Number(number) => number.to_string(),
    })
}
