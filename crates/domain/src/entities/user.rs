use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Access role carried in tokens and the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "customer" => Some(Role::Customer),
            _ => None,
        }
    }
}

/// Registered user
///
/// `password_digest` never leaves the process; it is skipped on
/// serialization so no API response can carry it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing, default)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("customer"), Some(Role::Customer));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_password_digest_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            role: "customer".to_string(),
            password_digest: "salt$digest".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_digest"));
        assert!(!json.contains("salt$digest"));
    }

    #[test]
    fn test_is_admin() {
        let mut user = User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            role: "admin".to_string(),
            password_digest: String::new(),
            created_at: Utc::now(),
        };
        assert!(user.is_admin());

        user.role = "customer".to_string();
        assert!(!user.is_admin());
    }
}
