//! Guest account model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// Validation errors returned by the account value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    NameLength { min: usize, max: usize },
    InvalidEmail,
    InvalidPhone,
    PasswordTooShort { min: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameLength { min, max } => {
                write!(f, "name must be between {min} and {max} characters")
            }
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::InvalidPhone => write!(
                f,
                "phone must contain {PHONE_MIN_DIGITS} to {PHONE_MAX_DIGITS} digits"
            ),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl UserValidationError {
    /// Field name the error refers to, in request casing.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameLength { .. } => "name",
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phone",
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Guest's display name, trimmed, 3 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Asha Rao")]
pub struct FullName(String);

impl FullName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        let length = trimmed.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&length) {
            return Err(UserValidationError::NameLength {
                min: NAME_MIN,
                max: NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FullName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

/// Lower-cased email address used as the login identifier.
///
/// Only the shape is checked: a non-empty local part and a dotted domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "asha@example.com")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = domain
            .split('.')
            .all(|label| !label.is_empty())
            && domain.contains('.');
        if local.is_empty() || !domain_ok || normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Contact number: 7 to 15 digits with an optional leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "+919876543210")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let valid = digits.chars().all(|c| c.is_ascii_digit())
            && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len());
        if !valid {
            return Err(UserValidationError::InvalidPhone);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Registered guest as exposed to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: FullName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Al")]
    #[case("   ")]
    fn rejects_short_names(#[case] raw: &str) {
        assert!(matches!(
            FullName::new(raw),
            Err(UserValidationError::NameLength { .. })
        ));
    }

    #[rstest]
    fn trims_names() {
        let name = FullName::new("  Asha Rao ").expect("valid name");
        assert_eq!(name.as_str(), "Asha Rao");
    }

    #[rstest]
    #[case("asha@example.com", true)]
    #[case("Asha@Example.COM", true)]
    #[case("asha@example", false)]
    #[case("@example.com", false)]
    #[case("asha@.com", false)]
    #[case("asha rao@example.com", false)]
    fn validates_email_shape(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn lowercases_email() {
        let email = EmailAddress::new("Asha@Example.COM").expect("valid email");
        assert_eq!(email.as_str(), "asha@example.com");
    }

    #[rstest]
    #[case("9876543210", true)]
    #[case("+919876543210", true)]
    #[case("12345", false)]
    #[case("98765-43210", false)]
    fn validates_phone(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(PhoneNumber::new(raw).is_ok(), ok);
    }
}
