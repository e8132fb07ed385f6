//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, UserId};

/// Parse a path segment into a [`UserId`].
///
/// Failures are `invalid_request` with `{"field": <field>, "code": "invalid_uuid"}`
/// details.
pub(crate) fn parse_user_id(raw: &str, field: &'static str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| {
        Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
            "field": field,
            "code": "invalid_uuid",
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn accepts_uuid() {
        let id = parse_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", "id").expect("uuid");
        assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("")]
    #[case("42")]
    #[case("3fa85f64-5717-4562-b3fc")]
    fn rejects_non_uuid(#[case] raw: &str) {
        let err = parse_user_id(raw, "id").expect_err("not a uuid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "id");
        assert_eq!(details["code"], "invalid_uuid");
    }
}
