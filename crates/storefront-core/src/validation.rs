//! Form Validation
//!
//! Field-level errors shared by client-side checks and server `errors` maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Address;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const OTP_LEN: usize = 6;
pub const MAX_REVIEW_LEN: usize = 2000;

/// Ordered map of field name -> messages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when empty
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

/// Loose shape check; the backend does the real verification
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", label));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "Enter a valid email address");
        }
        require(&mut errors, "password", &self.password, "Password");
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "firstName", &self.first_name, "First name");
        require(&mut errors, "lastName", &self.last_name, "Last name");
        if !is_valid_email(&self.email) {
            errors.add("email", "Enter a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OtpForm {
    pub email: String,
    pub otp: String,
}

impl OtpForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let otp = self.otp.trim();
        if otp.len() != OTP_LEN || !otp.chars().all(|c| c.is_ascii_digit()) {
            errors.add("otp", format!("Enter the {}-digit code from your email", OTP_LEN));
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

impl ProfileForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "firstName", &self.first_name, "First name");
        require(&mut errors, "lastName", &self.last_name, "Last name");
        if let Some(phone) = &self.phone {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            let allowed = phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
            if !phone.trim().is_empty() && (!allowed || digits < 7) {
                errors.add("phone", "Enter a valid phone number");
            }
        }
        errors
    }
}

/// Checks shared by checkout and the profile address block
pub fn validate_address(address: &Address) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, "line1", &address.line1, "Address");
    require(&mut errors, "city", &address.city, "City");
    require(&mut errors, "postalCode", &address.postal_code, "Postal code");
    require(&mut errors, "country", &address.country, "Country");
    errors
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
}

impl ReviewForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !(1..=5).contains(&self.rating) {
            errors.add("rating", "Choose a rating from 1 to 5");
        }
        require(&mut errors, "comment", &self.comment, "Comment");
        if self.comment.chars().count() > MAX_REVIEW_LEN {
            errors.add(
                "comment",
                format!("Comment must be at most {} characters", MAX_REVIEW_LEN),
            );
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email(" jane@shop.co.uk "));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("ja ne@example.com"));
    }

    #[test]
    fn test_register_form_collects_all_errors() {
        let form = RegisterForm {
            first_name: "".to_string(),
            last_name: "Doe".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
        };
        let errors = form.validate();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["confirmPassword", "email", "firstName", "password"]);
    }

    #[test]
    fn test_register_form_valid() {
        let form = RegisterForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
        };
        assert!(form.validate().into_result().is_ok());
    }

    #[test]
    fn test_otp_requires_six_digits() {
        let mut form = OtpForm {
            email: "a@b.co".to_string(),
            otp: "12345".to_string(),
        };
        assert!(form.validate().contains("otp"));
        form.otp = "12a456".to_string();
        assert!(form.validate().contains("otp"));
        form.otp = "123456".to_string();
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_field_errors_merge_appends() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Enter a valid email address");
        let mut server = FieldErrors::new();
        server.add("email", "Email already registered");
        server.add("password", "Too common");
        errors.merge(server);
        assert_eq!(errors.get("email").len(), 2);
        assert_eq!(errors.first("password"), Some("Too common"));
        assert!(errors.get("missing").is_empty());
    }

    #[test]
    fn test_review_rating_bounds() {
        let form = ReviewForm {
            rating: 0,
            comment: "Great".to_string(),
        };
        assert!(form.validate().contains("rating"));
        let form = ReviewForm {
            rating: 5,
            comment: "Great".to_string(),
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_address_required_fields() {
        let errors = validate_address(&Address::default());
        assert!(errors.contains("line1"));
        assert!(errors.contains("city"));
        assert!(errors.contains("postalCode"));
        assert!(errors.contains("country"));
    }

    #[test]
    fn test_profile_phone() {
        let mut form = ProfileForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: Some("+1 (555) 123-4567".to_string()),
            address: None,
        };
        assert!(form.validate().is_empty());
        form.phone = Some("call me".to_string());
        assert!(form.validate().contains("phone"));
        form.phone = Some(String::new());
        assert!(form.validate().is_empty());
    }
}
