//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field is reported as `invalid_request` with
//! `{"field": ..., "code": ...}` details so clients can highlight the input.

use serde_json::json;

use crate::domain::{
    BookingValidationError, Error, HotelValidationError, InvalidAadhaar, InvalidId,
    LoginValidationError, RoomValidationError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidField,
    InvalidDate,
    EmptyField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidField => "invalid_field",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::EmptyField => "empty_field",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Wrap a raw numeric identifier, rejecting zero and negatives.
pub(crate) fn parse_id<T>(raw: i64, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64, Error = InvalidId>,
{
    T::try_from(raw).map_err(|_| {
        let field = field.as_str();
        Error::invalid_request(format!("{field} must be a positive integer")).with_details(json!({
            "field": field,
            "value": raw,
            "code": ErrorCode::InvalidId.as_str(),
        }))
    })
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    field_error(err.field(), ErrorCode::InvalidField, err.to_string())
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, ErrorCode::EmptyField, err.to_string())
}

pub(crate) fn map_hotel_validation_error(err: HotelValidationError) -> Error {
    field_error(err.field(), ErrorCode::InvalidField, err.to_string())
}

pub(crate) fn map_room_validation_error(err: RoomValidationError) -> Error {
    field_error(err.field(), ErrorCode::InvalidField, err.to_string())
}

pub(crate) fn map_booking_validation_error(err: BookingValidationError) -> Error {
    let code = match err {
        BookingValidationError::MalformedDate { .. } | BookingValidationError::EmptyStay => {
            ErrorCode::InvalidDate
        }
        BookingValidationError::NoGuests | BookingValidationError::AmountOverflow => {
            ErrorCode::InvalidField
        }
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn map_aadhaar_error(err: InvalidAadhaar) -> Error {
    field_error("aadhaar", ErrorCode::InvalidField, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingId, ErrorCode as DomainCode};
    use rstest::rstest;

    #[rstest]
    fn positive_ids_are_wrapped() {
        let id: BookingId = parse_id(9, FieldName::new("bookingId")).expect("valid id");
        assert_eq!(id.get(), 9);
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_ids_report_the_field(#[case] raw: i64) {
        let err = parse_id::<BookingId>(raw, FieldName::new("bookingId"))
            .expect_err("non-positive id");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "bookingId");
        assert_eq!(details["code"], "invalid_id");
        assert_eq!(details["value"], raw);
    }

    #[rstest]
    #[case(BookingValidationError::MalformedDate { field: "checkIn" }, "checkIn", "invalid_date")]
    #[case(BookingValidationError::EmptyStay, "checkOut", "invalid_date")]
    #[case(BookingValidationError::NoGuests, "guests", "invalid_field")]
    fn booking_errors_carry_field_and_code(
        #[case] err: BookingValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = map_booking_validation_error(err);
        let details = mapped.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[rstest]
    fn login_errors_name_the_empty_field() {
        let err = map_login_validation_error(LoginValidationError::EmptyPassword);
        assert_eq!(err.details().expect("details")["field"], "password");
        assert_eq!(err.message(), "password must not be empty");
    }
}
