use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::types::{ContactRequest, OwnerRequest};

pub const MIN_PHONE_LENGTH: usize = 10;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern compiles")
});

/// One failed field check, shaped the way existing clients expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    pub location: String,
}

impl FieldError {
    fn field(param: &str, value: &Option<String>, msg: &str) -> Self {
        Self {
            value: value.clone(),
            msg: msg.to_string(),
            param: Some(param.to_string()),
            location: "body".to_string(),
        }
    }

    /// Error that concerns the body as a whole rather than one field.
    pub fn body(msg: impl Into<String>) -> Self {
        Self {
            value: None,
            msg: msg.into(),
            param: None,
            location: "body".to_string(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    local.len() <= 64 && domain.len() <= 253 && EMAIL_REGEX.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().count() >= MIN_PHONE_LENGTH
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

pub fn validate_owner(request: &OwnerRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !is_present(&request.name) {
        errors.push(FieldError::field("name", &request.name, "Name is Required"));
    }
    if !request.email.as_deref().is_some_and(is_valid_email) {
        errors.push(FieldError::field(
            "email",
            &request.email,
            "Pease enter a valid email",
        ));
    }
    if !request.phone_number.as_deref().is_some_and(is_valid_phone) {
        errors.push(FieldError::field(
            "phoneNumber",
            &request.phone_number,
            "Please enter a valid Phone Number.",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_contact(request: &ContactRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !is_present(&request.contact_name) {
        errors.push(FieldError::field(
            "contactName",
            &request.contact_name,
            "Name is required",
        ));
    }
    if !request.contact_email.as_deref().is_some_and(is_valid_email) {
        errors.push(FieldError::field(
            "contactEmail",
            &request.contact_email,
            "Please enter a valid email",
        ));
    }
    if !request.contact_phone.as_deref().is_some_and(is_valid_phone) {
        errors.push(FieldError::field(
            "contactPhone",
            &request.contact_phone,
            "Please enter a valid phone number",
        ));
    }
    if !is_present(&request.contact_type) {
        errors.push(FieldError::field(
            "contactType",
            &request.contact_type,
            "Contact Type is required",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(name: &str, email: &str, phone: &str) -> OwnerRequest {
        OwnerRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone_number: Some(phone.to_string()),
        }
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(is_valid_email("a+tag@mail.example.co"));
        assert!(!is_valid_email("jane.doe"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane..doe@example.com"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_length() {
        assert!(is_valid_phone("0123456789"));
        assert!(is_valid_phone("+44 20 7946 0958"));
        assert!(!is_valid_phone("012345678"));
    }

    #[test]
    fn test_valid_owner_passes() {
        assert!(validate_owner(&owner("Jane", "jane@example.com", "5551234567")).is_ok());
    }

    #[test]
    fn test_owner_errors_keep_field_order() {
        let errors = validate_owner(&owner("", "nope", "123")).unwrap_err();
        let params: Vec<_> = errors.iter().filter_map(|e| e.param.as_deref()).collect();
        assert_eq!(params, ["name", "email", "phoneNumber"]);
        assert_eq!(errors[1].msg, "Pease enter a valid email");
        assert_eq!(errors[1].value.as_deref(), Some("nope"));
    }

    #[test]
    fn test_missing_owner_fields_are_errors() {
        let errors = validate_owner(&OwnerRequest::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.value.is_none()));
    }

    #[test]
    fn test_contact_requires_type() {
        let request = ContactRequest {
            contact_name: Some("Bob".to_string()),
            contact_email: Some("bob@example.com".to_string()),
            contact_phone: Some("5559876543".to_string()),
            contact_type: Some(String::new()),
        };
        let errors = validate_contact(&request).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param.as_deref(), Some("contactType"));
        assert_eq!(errors[0].msg, "Contact Type is required");
    }

    #[test]
    fn test_body_error_has_no_param() {
        let json = serde_json::to_value(FieldError::body("expected an object")).unwrap();
        assert_eq!(json["location"], "body");
        assert!(json.get("param").is_none());
    }
}
