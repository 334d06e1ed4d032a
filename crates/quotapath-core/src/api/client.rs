//! Typed client for the QuotaPath REST API.

use serde::Serialize;
use serde_json::Value;

use super::{ApiError, Gateway};
use crate::models::{
    AuthResponse, CalculateRequest, CalculateResponse, Commission, CommissionQuery,
    CommissionSummary, CommissionUpdate, CompensationPlan, DashboardStats, Deal, DealDraft,
    DealQuery, LoginCredentials, MessageResponse, NewUser, PipelineData, PlanDraft, Quota,
    QuotaDraft, User, UserUpdate,
};

// ============================================================================
// Endpoints
// ============================================================================

const LOGIN_PATH: &str = "/auth/login/";
const LOGOUT_PATH: &str = "/auth/logout/";
const CURRENT_USER_PATH: &str = "/auth/me/";
const USERS_PATH: &str = "/auth/users/";
const DEALS_PATH: &str = "/sales/deals/";
const QUOTAS_PATH: &str = "/sales/quotas/";
const DASHBOARD_STATS_PATH: &str = "/sales/dashboard-stats/";
const PIPELINE_ANALYSIS_PATH: &str = "/sales/pipeline-analysis/";
const QUOTA_PERFORMANCE_PATH: &str = "/sales/quota-performance/";
const PLANS_PATH: &str = "/commissions/plans/";
const COMMISSIONS_PATH: &str = "/commissions/commissions/";
const CALCULATE_PATH: &str = "/commissions/calculate/";
const SUMMARY_PATH: &str = "/commissions/summary/";
const ANALYTICS_PATH: &str = "/commissions/analytics/";
const PROJECTIONS_PATH: &str = "/commissions/projections/";
const TRENDS_PATH: &str = "/commissions/trends/";

fn detail_path(collection: &str, id: i64) -> String {
    format!("{}{}/", collection, id)
}

/// Commission list and summary, fetched together for the commissions view.
#[derive(Debug, Clone)]
pub struct CommissionsOverview {
    pub commissions: Vec<Commission>,
    pub summary: CommissionSummary,
}

/// API client for the QuotaPath backend.
/// Clone is cheap - the gateway shares its connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    gateway: Gateway,
}

impl ApiClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    // ===== Auth =====

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        self.gateway.post(LOGIN_PATH, credentials).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.gateway.post_empty(LOGOUT_PATH).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.gateway.get(CURRENT_USER_PATH).await
    }

    /// Fetch the profile for `token` without it being the session token.
    pub async fn current_user_with_token(&self, token: &str) -> Result<User, ApiError> {
        self.gateway.get_with_token(CURRENT_USER_PATH, token).await
    }

    // ===== Users =====

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.gateway.get(USERS_PATH).await
    }

    pub async fn user(&self, id: i64) -> Result<User, ApiError> {
        self.gateway.get(&detail_path(USERS_PATH, id)).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.gateway.post(USERS_PATH, user).await
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.gateway.patch(&detail_path(USERS_PATH, id), update).await
    }

    // ===== Sales =====

    pub async fn deals(&self, query: &DealQuery) -> Result<Vec<Deal>, ApiError> {
        self.gateway.get_with_query(DEALS_PATH, query).await
    }

    pub async fn deal(&self, id: i64) -> Result<Deal, ApiError> {
        self.gateway.get(&detail_path(DEALS_PATH, id)).await
    }

    pub async fn create_deal(&self, deal: &DealDraft) -> Result<Deal, ApiError> {
        self.gateway.post(DEALS_PATH, deal).await
    }

    pub async fn update_deal(&self, id: i64, deal: &DealDraft) -> Result<Deal, ApiError> {
        self.gateway.patch(&detail_path(DEALS_PATH, id), deal).await
    }

    pub async fn delete_deal(&self, id: i64) -> Result<(), ApiError> {
        self.gateway.delete(&detail_path(DEALS_PATH, id)).await
    }

    pub async fn quotas(&self) -> Result<Vec<Quota>, ApiError> {
        self.gateway.get(QUOTAS_PATH).await
    }

    pub async fn create_quota(&self, quota: &QuotaDraft) -> Result<Quota, ApiError> {
        self.gateway.post(QUOTAS_PATH, quota).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.gateway.get(DASHBOARD_STATS_PATH).await
    }

    pub async fn pipeline_analysis(&self) -> Result<Vec<PipelineData>, ApiError> {
        self.gateway.get(PIPELINE_ANALYSIS_PATH).await
    }

    pub async fn quota_performance(&self) -> Result<Vec<Value>, ApiError> {
        self.gateway.get(QUOTA_PERFORMANCE_PATH).await
    }

    // ===== Commissions =====

    pub async fn compensation_plans(&self) -> Result<Vec<CompensationPlan>, ApiError> {
        self.gateway.get(PLANS_PATH).await
    }

    pub async fn compensation_plan(&self, id: i64) -> Result<CompensationPlan, ApiError> {
        self.gateway.get(&detail_path(PLANS_PATH, id)).await
    }

    pub async fn create_compensation_plan(
        &self,
        plan: &PlanDraft,
    ) -> Result<CompensationPlan, ApiError> {
        self.gateway.post(PLANS_PATH, plan).await
    }

    pub async fn commissions(&self, query: &CommissionQuery) -> Result<Vec<Commission>, ApiError> {
        self.gateway.get_with_query(COMMISSIONS_PATH, query).await
    }

    pub async fn commission(&self, id: i64) -> Result<Commission, ApiError> {
        self.gateway.get(&detail_path(COMMISSIONS_PATH, id)).await
    }

    pub async fn update_commission(
        &self,
        id: i64,
        update: &CommissionUpdate,
    ) -> Result<Commission, ApiError> {
        self.gateway
            .patch(&detail_path(COMMISSIONS_PATH, id), update)
            .await
    }

    /// Ask the backend to calculate commissions. `None` processes every
    /// closed-won deal that has not been processed yet.
    pub async fn calculate_commissions(
        &self,
        deal_ids: Option<Vec<i64>>,
    ) -> Result<CalculateResponse, ApiError> {
        let body = CalculateRequest { deal_ids };
        self.gateway.post(CALCULATE_PATH, &body).await
    }

    pub async fn commission_summary(&self) -> Result<CommissionSummary, ApiError> {
        self.gateway.get(SUMMARY_PATH).await
    }

    pub async fn commission_analytics<Q: Serialize + ?Sized>(
        &self,
        params: &Q,
    ) -> Result<Value, ApiError> {
        self.gateway.get_with_query(ANALYTICS_PATH, params).await
    }

    pub async fn commission_projections<Q: Serialize + ?Sized>(
        &self,
        params: &Q,
    ) -> Result<Value, ApiError> {
        self.gateway.get_with_query(PROJECTIONS_PATH, params).await
    }

    pub async fn commission_trends<Q: Serialize + ?Sized>(
        &self,
        params: &Q,
    ) -> Result<Value, ApiError> {
        self.gateway.get_with_query(TRENDS_PATH, params).await
    }

    /// Fetch the commission list and the summary concurrently. Either
    /// failure fails the whole.
    pub async fn commissions_overview(&self) -> Result<CommissionsOverview, ApiError> {
        let query = CommissionQuery::default();
        let (commissions, summary) =
            futures::try_join!(self.commissions(&query), self.commission_summary())?;
        Ok(CommissionsOverview {
            commissions,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_path() {
        assert_eq!(detail_path(DEALS_PATH, 12), "/sales/deals/12/");
        assert_eq!(detail_path(USERS_PATH, 3), "/auth/users/3/");
    }
}
