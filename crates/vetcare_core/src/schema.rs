//! crates/vetcare_core/src/schema.rs
//!
//! The structural contract of every request body the service accepts.
//!
//! Each `validate_*` function takes the raw JSON body and either returns the
//! strongly-typed record or a `ValidationError` naming the offending fields.
//! Nothing here touches storage.

use chrono::NaiveDate;
use garde::Validate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

//=========================================================================================
// Request Records
//=========================================================================================

/// A request for a visit, as submitted from the website's booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppointmentRequest {
    #[garde(length(chars, min = 2, max = 100))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(chars, min = 7, max = 20))]
    pub phone: String,
    #[garde(length(chars, min = 1, max = 100))]
    pub pet_name: String,
    /// Free text; the site offers dog, cat, rabbit, hamster, guinea pig.
    #[garde(skip)]
    pub species: String,
    #[garde(skip)]
    pub preferred_date: NaiveDate,
    /// A time range or slot label such as "morning".
    #[garde(skip)]
    pub preferred_time: String,
    #[serde(default)]
    #[garde(length(chars, max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewsletterSubscription {
    #[garde(email)]
    pub email: String,
}

/// A question sent through the contact form.
///
/// Unlike the other records, `email` is only required to be non-empty and is
/// not checked for address format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuestionRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub email: String,
    #[garde(length(min = 1))]
    pub message: String,
}

//=========================================================================================
// Validation Errors
//=========================================================================================

/// A single broken constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// The field name, or `body` when the payload as a whole is malformed.
    pub field: String,
    pub message: String,
}

/// Raised when a request body does not satisfy its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// Returns true if any violation concerns `field`.
    pub fn concerns(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<garde::Report> for ValidationError {
    fn from(report: garde::Report) -> Self {
        let violations = report
            .iter()
            .map(|(path, error)| FieldViolation {
                field: path.to_string(),
                message: error.to_string(),
            })
            .collect();
        Self { violations }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ValidationError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let field = if err.path().iter().next().is_some() {
            err.path().to_string()
        } else {
            missing_field(err.inner()).unwrap_or_else(|| "body".to_string())
        };
        Self::single(field, err.into_inner().to_string())
    }
}

/// Names the absent field of a top-level "missing field `x`" error.
///
/// serde raises it on the enclosing struct, so the error path is empty.
fn missing_field(err: &serde_json::Error) -> Option<String> {
    err.to_string()
        .strip_prefix("missing field `")?
        .split('`')
        .next()
        .map(str::to_string)
}

//=========================================================================================
// Validators
//=========================================================================================

/// Deserializes `body` into `T` and runs its field rules.
pub fn validate_body<T>(body: Value) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Validate<Context = ()>,
{
    if !body.is_object() {
        return Err(ValidationError::single("body", "expected a JSON object"));
    }
    let record: T = serde_path_to_error::deserialize(body)?;
    record.validate()?;
    Ok(record)
}

/// A request record that can be built from an untyped JSON body.
pub trait RequestSchema: Sized {
    fn from_body(body: Value) -> Result<Self, ValidationError>;
}

impl<T> RequestSchema for T
where
    T: DeserializeOwned + Validate<Context = ()>,
{
    fn from_body(body: Value) -> Result<Self, ValidationError> {
        validate_body(body)
    }
}

pub fn validate_appointment(body: Value) -> Result<AppointmentRequest, ValidationError> {
    validate_body(body)
}

pub fn validate_subscription(body: Value) -> Result<NewsletterSubscription, ValidationError> {
    validate_body(body)
}

pub fn validate_question(body: Value) -> Result<QuestionRequest, ValidationError> {
    validate_body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn appointment() -> Value {
        json!({
            "name": "Jo",
            "email": "jo@x.com",
            "phone": "1234567",
            "pet_name": "Rex",
            "species": "dog",
            "preferred_date": "2025-01-01",
            "preferred_time": "morning"
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut body = appointment();
        body[field] = value;
        body
    }

    #[test]
    fn accepts_minimal_appointment() {
        let request = validate_appointment(appointment()).unwrap();
        assert_eq!(request.name, "Jo");
        assert_eq!(
            request.preferred_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(request.reason, None);
    }

    #[test]
    fn rejects_one_character_name() {
        let err = validate_appointment(with("name", json!("J"))).unwrap_err();
        assert!(err.concerns("name"), "{err}");
    }

    #[test]
    fn name_length_counts_characters() {
        // 100 characters, 200 bytes.
        assert!(validate_appointment(with("name", json!("ö".repeat(100)))).is_ok());
        assert!(validate_appointment(with("name", json!("x".repeat(101)))).is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        let err = validate_appointment(with("email", json!("not-an-email"))).unwrap_err();
        assert!(err.concerns("email"));
    }

    #[test]
    fn phone_bounds() {
        assert!(validate_appointment(with("phone", json!("123456"))).is_err());
        assert!(validate_appointment(with("phone", json!("1".repeat(20)))).is_ok());
        assert!(validate_appointment(with("phone", json!("1".repeat(21)))).is_err());
    }

    #[test]
    fn rejects_empty_pet_name() {
        let err = validate_appointment(with("pet_name", json!(""))).unwrap_err();
        assert!(err.concerns("pet_name"));
    }

    #[test]
    fn rejects_unparseable_date() {
        for date in ["next tuesday", "2025-02-30"] {
            let err = validate_appointment(with("preferred_date", json!(date))).unwrap_err();
            assert!(err.concerns("preferred_date"), "{err}");
        }
    }

    #[test]
    fn wrong_type_names_the_field() {
        let err = validate_appointment(with("name", json!(5))).unwrap_err();
        assert!(err.concerns("name"), "{err}");
        assert!(!err.concerns("body"));

        let err = validate_subscription(json!({ "email": ["a@b.com"] })).unwrap_err();
        assert!(err.concerns("email"), "{err}");
    }

    #[test]
    fn reason_is_bounded() {
        assert!(validate_appointment(with("reason", json!("limping"))).is_ok());
        assert!(validate_appointment(with("reason", json!(null))).is_ok());
        let err = validate_appointment(with("reason", json!("a".repeat(501)))).unwrap_err();
        assert!(err.concerns("reason"));
    }

    #[test]
    fn missing_field_is_named() {
        let mut body = appointment();
        body.as_object_mut().unwrap().remove("species");

        let err = validate_appointment(body).unwrap_err();

        assert!(err.concerns("species"), "{err}");
    }

    #[test]
    fn reports_every_broken_field() {
        let mut body = with("name", json!("J"));
        body["phone"] = json!("1");

        let err = validate_appointment(body).unwrap_err();

        assert!(err.concerns("name"));
        assert!(err.concerns("phone"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate_subscription(json!(["a@b.com"])).unwrap_err();
        assert!(err.concerns("body"));
    }

    #[test]
    fn subscription_requires_valid_email() {
        assert!(validate_subscription(json!({ "email": "a@b.com" })).is_ok());
        assert!(validate_subscription(json!({ "email": "a@" })).is_err());
        assert!(validate_subscription(json!({})).is_err());
    }

    #[test]
    fn question_email_is_not_format_checked() {
        let question = validate_question(json!({
            "name": "Ana",
            "email": "call me",
            "message": "Hi"
        }))
        .unwrap();
        assert_eq!(question.email, "call me");
    }

    #[test]
    fn question_fields_must_be_present_and_non_empty() {
        assert!(validate_question(json!({ "name": "Ana", "email": "x" })).is_err());
        let err = validate_question(json!({ "name": "", "email": "x", "message": "Hi" }))
            .unwrap_err();
        assert!(err.concerns("name"));
    }
}
