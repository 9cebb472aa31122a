use regex::Regex;
use serde_derive::Deserialize;
use serde_valid::Validate;
use std::sync::OnceLock;

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is valid")
        })
        .is_match(email)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 50)]
    pub username: String,
    #[validate(max_length = 255)]
    pub email: String,
    // bcrypt only looks at the first 72 bytes
    #[validate(min_length = 8)]
    #[validate(max_length = 72)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField<'a> {
    Email(&'a str),
    Username(&'a str),
}

impl LoginForm {
    /// Email wins when both are given.
    pub fn login_field(&self) -> Option<LoginField<'_>> {
        match (self.email.as_deref(), self.username.as_deref()) {
            (Some(email), _) if !email.is_empty() => Some(LoginField::Email(email)),
            (_, Some(username)) if !username.is_empty() => Some(LoginField::Username(username)),
            _ => None,
        }
    }
}

/// Admin-side account creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AccountForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 50)]
    pub username: String,
    #[validate(max_length = 255)]
    pub email: String,
    #[validate(min_length = 8)]
    #[validate(max_length = 72)]
    pub password: String,
    #[validate(max_length = 100)]
    pub full_name: Option<String>,
    #[validate(max_length = 20)]
    pub phone: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AccountUpdateForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 50)]
    pub username: Option<String>,
    #[validate(max_length = 255)]
    pub email: Option<String>,
    #[validate(min_length = 8)]
    #[validate(max_length = 72)]
    pub password: Option<String>,
    #[validate(max_length = 100)]
    pub full_name: Option<String>,
    #[validate(max_length = 20)]
    pub phone: Option<String>,
}

impl AccountUpdateForm {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.full_name.is_none()
            && self.phone.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("ann.lee+tasks@mail.example.org"));
        assert!(!is_valid_email("ann"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann @example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_login_prefers_email() {
        let form: LoginForm = serde_json::from_value(json!({
            "email": "ann@example.com",
            "username": "ann",
            "password": "secret123"
        }))
        .unwrap();
        assert_eq!(form.login_field(), Some(LoginField::Email("ann@example.com")));

        let form: LoginForm =
            serde_json::from_value(json!({"username": "ann", "password": "x"})).unwrap();
        assert_eq!(form.login_field(), Some(LoginField::Username("ann")));

        let form: LoginForm = serde_json::from_value(json!({"password": "x"})).unwrap();
        assert_eq!(form.login_field(), None);
    }

    #[test]
    fn test_short_password_fails_validation() {
        let form: SignupForm = serde_json::from_value(json!({
            "username": "ann",
            "email": "ann@example.com",
            "password": "short"
        }))
        .unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_update_form_emptiness() {
        assert!(AccountUpdateForm::default().is_empty());
        let form: AccountUpdateForm = serde_json::from_value(json!({"phone": "555-0100"})).unwrap();
        assert!(!form.is_empty());
        assert!(form.validate().is_ok());
    }
}
