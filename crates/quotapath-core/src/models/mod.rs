//! Data models for the QuotaPath REST backend.
//!
//! Field names follow the backend's snake_case JSON. Monetary amounts and
//! rates are decimal strings; use [`crate::utils::format`] to render them.
//!
//! - `User`, `Role`: the signed-in profile and the role that gates navigation
//! - `Deal`, `Quota`: pipeline and quota data from `/sales/`
//! - `CompensationPlan`, `Commission`: plans and payouts from `/commissions/`
//! - `DashboardStats`, `PipelineData`, `CommissionSummary`: aggregate metrics

/// Declares a server-side choice field: the known values, their display
/// labels, and an `Other` fallback that keeps whatever the server sent.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            /// Wire value as sent by the backend.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(raw) => raw.as_str(),
                }
            }

            /// Human-readable label; unknown values display as-is.
            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($value => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }
    };
}

pub mod commission;
pub mod deal;
pub mod stats;
pub mod user;

pub use commission::{
    CalculateRequest, CalculateResponse, Commission, CommissionQuery, CommissionRule,
    CommissionStatus, CommissionUpdate, CompensationPlan, PlanDraft, PlanType,
};
pub use deal::{Deal, DealDraft, DealQuery, DealStage, DealStatus, Quota, QuotaDraft, QuotaPeriod};
pub use stats::{CommissionSummary, DashboardStats, PipelineData};
pub use user::{AuthResponse, LoginCredentials, MessageResponse, NewUser, Role, User, UserUpdate};
