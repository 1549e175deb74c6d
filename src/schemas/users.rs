//! 사용자 관리 라우트의 요청 스키마 정의

use once_cell::sync::Lazy;

use crate::constants::OBJECT_ID_REGEX;
use crate::validation::schema::{number, object, string, RequestSchema, Schema};

/// POST /api/user/register
pub static REGISTER_USER: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().body(
        Schema::new()
            .field(string("firstName").required())
            .field(string("lastName").required())
            .field(string("email").email().required())
            .field(
                number("number")
                    .min(1111111111)
                    .max(9999999999)
                    .required(),
            )
            .field(string("password").min(8).max(16).required()),
    )
});

/// PUT /api/user/update/{userId}
pub static UPDATE_USER: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new()
        .params(
            Schema::new()
                .field(string("userId").pattern(&OBJECT_ID_REGEX).required()),
        )
        .body(
            Schema::new()
                .field(string("firstName"))
                .field(string("lastName")),
        )
});

/// POST /api/user/verify
pub static VERIFY_PROVIDER_SIGNUP: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().body(Schema::new().field(string("tokenId").required()))
});

/// POST /api/user/list-users/{userId}
pub static LIST_USERS: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new()
        .params(
            Schema::new()
                .field(string("userId").pattern(&OBJECT_ID_REGEX).required()),
        )
        .body(Schema::new().field(object("filter")))
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate::validate_section;
    use serde_json::json;

    #[test]
    fn test_register_schema_accepts_full_body() {
        let body = REGISTER_USER.body.as_ref().unwrap();
        let input = json!({
            "firstName": "Gil-dong",
            "lastName": "Hong",
            "email": "gildong@example.com",
            "number": 9999999999i64,
            "password": "secret123"
        });

        assert!(validate_section(body, &input, true).is_ok());
    }

    #[test]
    fn test_register_schema_reports_every_missing_field() {
        let body = REGISTER_USER.body.as_ref().unwrap();
        let violations = validate_section(body, &json!({}), true).unwrap_err();

        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["firstName", "lastName", "email", "number", "password"]
        );
    }

    #[test]
    fn test_list_users_filter_accepts_json_string() {
        let body = LIST_USERS.body.as_ref().unwrap();
        let input = json!({ "filter": "{\"active\": true}" });

        let value = validate_section(body, &input, true).unwrap();
        assert_eq!(
            value.as_object().unwrap()["filter"],
            json!({ "active": true })
        );
    }
}
