use std::fmt;

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateStaff {
    #[validate(
        custom(function = "not_blank", message = "rfid should not be empty"),
        length(max = 64, message = "rfid must be at most 64 characters")
    )]
    pub rfid: String,
    #[validate(
        email(message = "email must be an email"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
    #[validate(
        custom(function = "not_blank", message = "name should not be empty"),
        length(max = 255, message = "name must be at most 255 characters")
    )]
    pub name: String,
}

#[derive(Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStaff {
    #[validate(
        custom(function = "not_blank", message = "rfid should not be empty"),
        length(max = 64, message = "rfid must be at most 64 characters")
    )]
    pub rfid: Option<String>,
    #[validate(
        email(message = "email must be an email"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "name should not be empty"),
        length(max = 255, message = "name must be at most 255 characters")
    )]
    pub name: Option<String>,
}

/// The identifying fields checked for collisions before a write.
/// Absent fields are not checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueFields<'a> {
    pub rfid: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl CreateStaff {
    pub fn unique_fields(&self) -> UniqueFields<'_> {
        UniqueFields {
            rfid: Some(&self.rfid),
            email: Some(&self.email),
        }
    }
}

impl UpdateStaff {
    pub fn unique_fields(&self) -> UniqueFields<'_> {
        UniqueFields {
            rfid: self.rfid.as_deref(),
            email: self.email.as_deref(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Flattens `errors` into one message per violation, ordered by field name.
pub fn violation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |violation| match &violation.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", violation.code),
            })
        })
        .collect()
}

// Hand-written so request bodies can be traced without leaking passwords.
impl fmt::Debug for CreateStaff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateStaff")
            .field("rfid", &self.rfid)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Debug for UpdateStaff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateStaff")
            .field("rfid", &self.rfid)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .finish()
    }
}
