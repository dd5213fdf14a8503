use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update. An omitted field stays untouched; an explicit
/// empty string is honored (empty `bio` clears it, empty `name` is rejected
/// in the handler).
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Safe projection of a user: everything a client may see, never the hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            bio: u.bio,
        }
    }
}

/// Response returned after register, login and profile update.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_carries_safe_fields_only() {
        let resp = UserResponse {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            bio: Some("engineer".into()),
        };
        let json = serde_json::to_value(&resp).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("bio"));
    }

    #[test]
    fn update_request_distinguishes_omitted_from_empty() {
        let omitted: UpdateProfileRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(omitted.name.is_none());
        assert!(omitted.bio.is_none());

        let empty: UpdateProfileRequest = serde_json::from_str(r#"{"bio":""}"#).unwrap();
        assert_eq!(empty.bio.as_deref(), Some(""));
    }
}
