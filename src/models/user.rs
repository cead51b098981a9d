use serde::{Deserialize, Serialize};

/// User record returned by `GET /users/firebase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Returns the message to show when the form can't be submitted.
    pub fn validate(&self) -> Option<&'static str> {
        if self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Some("Please fill in all fields.");
        }
        if self.password != self.confirm_password {
            return Some("Passwords do not match.");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_signup_requires_all_fields() {
        assert_eq!(
            form("", "secret", "secret").validate(),
            Some("Please fill in all fields.")
        );
        assert_eq!(
            form("a@b.c", "secret", "").validate(),
            Some("Please fill in all fields.")
        );
    }

    #[test]
    fn test_signup_passwords_must_match() {
        assert_eq!(
            form("a@b.c", "secret", "secrets").validate(),
            Some("Passwords do not match.")
        );
        assert_eq!(form("a@b.c", "secret", "secret").validate(), None);
    }

    #[test]
    fn test_backend_user_deserialize() {
        let user: BackendUser = serde_json::from_str(
            r#"{"_id": "u1", "first_name": "Ada", "email": "ada@example.com", "firebaseUID": "f1"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.last_name, None);
        assert_eq!(user.role, None);
    }
}
