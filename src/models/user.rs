//! Auth and profile forms with client-side validation.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Registration form. `confirm_password` is checked locally and never sent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(skip_serializing)]
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
    #[validate(length(min = 6, message = "Phone is required"))]
    pub phone: String,
    #[validate(custom(function = "validate_dob"))]
    pub dob: String,
}

/// Partial profile update; absent fields are left untouched server side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, message = "Phone is required"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_dob"))]
    pub dob: Option<String>,
}

/// Token and user record returned by a successful login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResponse {
    pub token: Option<String>,
    pub user: Option<Value>,
}

impl LoginResponse {
    /// Pull the token and user out of the login payload, looking at the top
    /// level first and then inside a `data` envelope.
    pub fn from_body(body: &Value) -> Self {
        let scopes = [Some(body), body.get("data")];
        let token = scopes.iter().flatten().find_map(|scope| {
            ["token", "access_token", "accessToken"]
                .iter()
                .find_map(|key| scope.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        });
        let user = scopes
            .iter()
            .flatten()
            .find_map(|scope| scope.get("user").filter(|u| u.is_object()).cloned());

        Self { token, user }
    }
}

fn validate_dob(dob: &str) -> Result<(), ValidationError> {
    let shaped = match Regex::new(r"^\d{4}-\d{2}-\d{2}$") {
        Ok(re) => re.is_match(dob),
        Err(_) => false,
    };
    if shaped && NaiveDate::parse_from_str(dob, "%Y-%m-%d").is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("dob").with_message("Date of birth must be YYYY-MM-DD".into()))
}

/// Run a form's validation, flattening failures into one `Validation` error.
pub fn check<T: Validate>(form: &T) -> Result<(), ClientError> {
    form.validate()
        .map_err(|errors| ClientError::Validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register() -> RegisterForm {
        RegisterForm {
            username: "neo".to_string(),
            email: "neo@matrix.test".to_string(),
            password: "redpill".to_string(),
            confirm_password: "redpill".to_string(),
            phone: "5550100".to_string(),
            dob: "1999-03-31".to_string(),
        }
    }

    #[test]
    fn login_rules() {
        let ok = LoginForm {
            username: "neo".to_string(),
            password: "123456".to_string(),
        };
        assert!(check(&ok).is_ok());

        let bad = LoginForm {
            username: String::new(),
            password: "123".to_string(),
        };
        let err = check(&bad).unwrap_err().to_string();
        assert!(err.contains("Username is required"));
        assert!(err.contains("Password must be at least 6 characters"));
    }

    #[test]
    fn register_valid() {
        assert!(check(&register()).is_ok());
    }

    #[test]
    fn register_password_mismatch() {
        let form = RegisterForm {
            confirm_password: "bluepill".to_string(),
            ..register()
        };
        let err = check(&form).unwrap_err().to_string();
        assert!(err.contains("Passwords must match"));
    }

    #[test]
    fn register_bad_email_and_dob() {
        let form = RegisterForm {
            email: "not-an-email".to_string(),
            dob: "31/03/1999".to_string(),
            ..register()
        };
        let err = check(&form).unwrap_err().to_string();
        assert!(err.contains("Invalid email address"));
        assert!(err.contains("Date of birth must be YYYY-MM-DD"));
    }

    #[test]
    fn dob_must_be_real_date() {
        assert!(validate_dob("1999-02-30").is_err());
        assert!(validate_dob("2000-02-29").is_ok());
    }

    #[test]
    fn register_body_omits_confirm_password() {
        let body = serde_json::to_value(register()).unwrap();
        assert!(body.get("confirm_password").is_none());
        assert_eq!(body["username"], "neo");
    }

    #[test]
    fn profile_update_only_checks_present_fields() {
        assert!(check(&ProfileUpdate::default()).is_ok());

        let update = ProfileUpdate {
            phone: Some("12".to_string()),
            ..Default::default()
        };
        assert!(check(&update).is_err());

        let body = serde_json::to_value(ProfileUpdate {
            email: Some("a@b.test".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"email": "a@b.test"}));
    }

    #[test]
    fn login_response_token_locations() {
        let top = LoginResponse::from_body(&json!({"token": "t1", "user": {"id": 1}}));
        assert_eq!(top.token.as_deref(), Some("t1"));
        assert_eq!(top.user, Some(json!({"id": 1})));

        let nested = LoginResponse::from_body(&json!({"data": {"accessToken": "t2"}}));
        assert_eq!(nested.token.as_deref(), Some("t2"));
        assert_eq!(nested.user, None);

        let none = LoginResponse::from_body(&json!(null));
        assert_eq!(none.token, None);
    }
}
