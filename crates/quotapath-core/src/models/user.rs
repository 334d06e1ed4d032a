//! User profile and authentication payloads.

use serde::{Deserialize, Serialize};

choice_enum! {
    /// Sales organization role. Gates which navigation entries are visible.
    pub enum Role {
        Admin => ("admin", "Admin"),
        Manager => ("manager", "Sales Manager"),
        Rep => ("rep", "Sales Representative"),
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Rep
    }
}

/// A user profile as returned by `/auth/me/` and `/auth/users/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "'admin' | 'manager' | 'rep'"))]
    pub role: Role,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub hire_date: Option<String>,
    #[serde(default)]
    pub is_active_sales: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// "First Last", or the username when no name is on file.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of a successful `POST /auth/login/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MessageResponse {
    pub message: String,
}

/// Payload for `POST /auth/users/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
}

/// Partial update for `PATCH /auth/users/{id}/`. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active_sales: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "jdoe".to_string(),
            email: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: Role::Rep,
            employee_id: None,
            phone: None,
            hire_date: None,
            is_active_sales: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user("Jane", "Doe").display_name(), "Jane Doe");
        assert_eq!(user("Jane", "").display_name(), "Jane");
        assert_eq!(user("", "").display_name(), "jdoe");
    }

    #[test]
    fn test_role_from_wire() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("manager").label(), "Sales Manager");
        assert_eq!(Role::from("auditor"), Role::Other("auditor".to_string()));
    }

    #[test]
    fn test_parse_user() {
        let json = r#"{"id": 7, "username": "mgr", "email": "m@example.com", "first_name": "Morgan", "last_name": "Lee", "role": "manager", "employee_id": null, "phone": null, "hire_date": "2023-01-15", "is_active_sales": true, "created_at": "2023-01-15T09:00:00Z", "updated_at": "2023-06-01T09:00:00Z"}"#;
        let parsed: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(parsed.role, Role::Manager);
        assert_eq!(parsed.hire_date.as_deref(), Some("2023-01-15"));

        let back = serde_json::to_value(&parsed).expect("Failed to serialize user");
        assert_eq!(back["role"], "manager");
    }
}
