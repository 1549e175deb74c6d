//! 요청 검증 엔진
//!
//! 선언적 스키마를 받아 요청 섹션을 검증/강제 변환하는 순수 로직입니다.
//! 섹션마다 전체 필드를 끝까지 검사하여 위반된 제약을 전부 수집하고,
//! 실패한 섹션이 하나라도 있으면 모든 섹션의 위반 목록을 합쳐 반환합니다.
//!
//! ## 강제 변환 규칙
//!
//! - 객체/배열 필드에 JSON 형태로 보이는 문자열(`{...}`, `[...]`)이 오면
//!   파싱을 시도하고, 실패하면 원본 문자열로 되돌립니다 (에러를 던지지
//!   않습니다).
//! - 숫자 필드에 숫자 형태의 문자열이 오면 숫자로 변환합니다.
//!   경로 파라미터와 쿼리 스트링은 항상 문자열로 도착하기 때문입니다.
//!
//! ## 알 수 없는 필드
//!
//! 최상위의 알 수 없는 필드는 허용하되 출력에서 제거합니다. files 섹션은
//! 파일 메타데이터 구조가 스키마와 다르므로 제거하지 않고 유지합니다.

use serde_json::{Map, Number, Value};
use validator::ValidateEmail;

use crate::errors::ErrorDetail;

use super::messages::ConstraintKind;
use super::schema::{Field, FieldKind, RequestSchema, Schema};

/// 위반된 제약 조건 하나
#[derive(Debug, Clone)]
pub struct Violation {
    /// 위반이 발생한 필드 경로
    pub path: String,
    /// 위반 종류
    pub kind: ConstraintKind,
    /// 사람이 읽을 수 있는 설명
    pub description: String,
}

impl Violation {
    fn new(path: String, label: &str, kind: ConstraintKind) -> Self {
        let description = kind.describe(label);
        Self {
            path,
            kind,
            description,
        }
    }

    /// 에러 응답 details 항목으로 변환합니다.
    pub fn to_detail(&self) -> ErrorDetail {
        ErrorDetail {
            path: self.path.clone(),
            description: self.description.clone(),
        }
    }
}

/// 검증 전 요청 섹션 값 묶음
#[derive(Debug, Default)]
pub struct SectionValues {
    pub body: Value,
    pub params: Value,
    pub query: Value,
    pub files: Value,
}

/// 검증/강제 변환이 끝난 섹션 값 묶음
///
/// 스키마가 정의되지 않은 섹션은 입력 그대로 유지됩니다.
#[derive(Debug, Clone)]
pub struct ValidatedSections {
    pub body: Value,
    pub params: Value,
    pub query: Value,
    pub files: Value,
}

/// 요청 전체를 스키마 집합에 대해 검증합니다.
///
/// 각 섹션은 독립적으로 검증되며, 위반이 하나라도 있으면 모든 섹션에서
/// 수집된 위반의 합집합을 반환합니다.
pub fn validate_request(
    schema: &RequestSchema,
    sections: SectionValues,
) -> Result<ValidatedSections, Vec<Violation>> {
    let mut violations = Vec::new();

    let body = run_section(schema.body.as_ref(), sections.body, true, &mut violations);
    let params = run_section(schema.params.as_ref(), sections.params, true, &mut violations);
    let query = run_section(schema.query.as_ref(), sections.query, true, &mut violations);
    let files = run_section(schema.files.as_ref(), sections.files, false, &mut violations);

    if violations.is_empty() {
        Ok(ValidatedSections {
            body,
            params,
            query,
            files,
        })
    } else {
        Err(violations)
    }
}

/// 섹션 하나를 검증하고 위반을 누적합니다.
///
/// 스키마가 없는 섹션은 입력을 그대로 반환합니다.
fn run_section(
    schema: Option<&Schema>,
    input: Value,
    strip_unknown: bool,
    violations: &mut Vec<Violation>,
) -> Value {
    match schema {
        None => input,
        Some(schema) => match validate_section(schema, &input, strip_unknown) {
            Ok(coerced) => coerced,
            Err(mut errs) => {
                violations.append(&mut errs);
                input
            }
        },
    }
}

/// 섹션 값 하나를 스키마에 대해 검증합니다.
///
/// 성공 시 강제 변환과 알 수 없는 필드 정리가 끝난 값을 반환합니다.
pub fn validate_section(
    schema: &Schema,
    input: &Value,
    strip_unknown: bool,
) -> Result<Value, Vec<Violation>> {
    validate_object(schema, input, "", strip_unknown)
}

fn validate_object(
    schema: &Schema,
    input: &Value,
    prefix: &str,
    strip_unknown: bool,
) -> Result<Value, Vec<Violation>> {
    let empty = Map::new();
    let object = input.as_object().unwrap_or(&empty);

    let mut violations = Vec::new();
    let mut output = Map::new();

    for field in &schema.fields {
        let path = join_path(prefix, field.name);

        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    violations.push(Violation::new(path, field.label, ConstraintKind::Required));
                }
            }
            Some(raw) => match check_field(field, raw, &path, strip_unknown) {
                Ok(value) => {
                    output.insert(field.name.to_string(), value);
                }
                Err(mut errs) => violations.append(&mut errs),
            },
        }
    }

    for (key, value) in object {
        if schema.fields.iter().any(|f| f.name == key) {
            continue;
        }
        if schema.deny_unknown {
            violations.push(Violation::new(
                join_path(prefix, key),
                key,
                ConstraintKind::UnknownField,
            ));
        } else if !strip_unknown {
            output.insert(key.clone(), value.clone());
        }
    }

    if violations.is_empty() {
        Ok(Value::Object(output))
    } else {
        Err(violations)
    }
}

fn check_field(
    field: &Field,
    raw: &Value,
    path: &str,
    strip_unknown: bool,
) -> Result<Value, Vec<Violation>> {
    match &field.kind {
        FieldKind::Str {
            min,
            max,
            email,
            pattern,
        } => check_string(field, raw, path, *min, *max, *email, *pattern),
        FieldKind::Num { min, max, integer } => {
            check_number(field, raw, path, *min, *max, *integer)
        }
        FieldKind::Obj { schema } => {
            check_object(field, raw, path, schema.as_deref(), strip_unknown)
        }
        FieldKind::Arr => check_array(field, raw, path),
    }
}

fn check_string(
    field: &Field,
    raw: &Value,
    path: &str,
    min: Option<usize>,
    max: Option<usize>,
    email: bool,
    pattern: Option<&regex::Regex>,
) -> Result<Value, Vec<Violation>> {
    let s = match raw.as_str() {
        Some(s) => s,
        None => {
            return Err(vec![Violation::new(
                path.to_string(),
                field.label,
                ConstraintKind::NotAString,
            )]);
        }
    };

    if s.is_empty() {
        return if field.allow_empty {
            Ok(raw.clone())
        } else {
            Err(vec![Violation::new(
                path.to_string(),
                field.label,
                ConstraintKind::Empty,
            )])
        };
    }

    let mut violations = Vec::new();
    let length = s.chars().count();

    if let Some(limit) = min {
        if length < limit {
            violations.push(Violation::new(
                path.to_string(),
                field.label,
                ConstraintKind::MinLength(limit),
            ));
        }
    }
    if let Some(limit) = max {
        if length > limit {
            violations.push(Violation::new(
                path.to_string(),
                field.label,
                ConstraintKind::MaxLength(limit),
            ));
        }
    }
    if email && !s.validate_email() {
        violations.push(Violation::new(
            path.to_string(),
            field.label,
            ConstraintKind::Email,
        ));
    }
    if let Some(re) = pattern {
        if !re.is_match(s) {
            violations.push(Violation::new(
                path.to_string(),
                field.label,
                ConstraintKind::Pattern,
            ));
        }
    }

    if violations.is_empty() {
        Ok(raw.clone())
    } else {
        Err(violations)
    }
}

fn check_number(
    field: &Field,
    raw: &Value,
    path: &str,
    min: Option<f64>,
    max: Option<f64>,
    integer: bool,
) -> Result<Value, Vec<Violation>> {
    let not_a_number = || {
        vec![Violation::new(
            path.to_string(),
            field.label,
            ConstraintKind::NotANumber,
        )]
    };

    let coerced: Number = match raw {
        Value::Number(n) => n.clone(),
        Value::String(s) => {
            if s.is_empty() && field.allow_empty {
                return Ok(raw.clone());
            }
            // 경로/쿼리 파라미터는 문자열로 도착하므로 숫자로 강제 변환한다
            if let Ok(i) = s.parse::<i64>() {
                Number::from(i)
            } else if let Some(n) = s.parse::<f64>().ok().and_then(Number::from_f64) {
                n
            } else {
                return Err(not_a_number());
            }
        }
        _ => return Err(not_a_number()),
    };

    let numeric = match coerced.as_f64() {
        Some(f) => f,
        None => return Err(not_a_number()),
    };

    // 정수 값 실수 표현(예: 45.0)은 정수로 정규화한다
    let coerced = if !coerced.is_i64() && !coerced.is_u64() && numeric.fract() == 0.0 {
        Number::from(numeric as i64)
    } else {
        coerced
    };

    let mut violations = Vec::new();

    if integer && !coerced.is_i64() && !coerced.is_u64() && numeric.fract() != 0.0 {
        violations.push(Violation::new(
            path.to_string(),
            field.label,
            ConstraintKind::NotInteger,
        ));
    }
    if let Some(limit) = min {
        if numeric < limit {
            violations.push(Violation::new(
                path.to_string(),
                field.label,
                ConstraintKind::TooSmall(limit),
            ));
        }
    }
    if let Some(limit) = max {
        if numeric > limit {
            violations.push(Violation::new(
                path.to_string(),
                field.label,
                ConstraintKind::TooLarge(limit),
            ));
        }
    }

    if violations.is_empty() {
        Ok(Value::Number(coerced))
    } else {
        Err(violations)
    }
}

fn check_object(
    field: &Field,
    raw: &Value,
    path: &str,
    nested: Option<&Schema>,
    strip_unknown: bool,
) -> Result<Value, Vec<Violation>> {
    let coerced = coerce_json_string(raw, '{');

    match &coerced {
        Value::Object(_) => match nested {
            Some(schema) => validate_object(schema, &coerced, path, strip_unknown),
            None => Ok(coerced),
        },
        _ => Err(vec![Violation::new(
            path.to_string(),
            field.label,
            ConstraintKind::NotAnObject,
        )]),
    }
}

fn check_array(field: &Field, raw: &Value, path: &str) -> Result<Value, Vec<Violation>> {
    let coerced = coerce_json_string(raw, '[');

    match coerced {
        Value::Array(_) => Ok(coerced),
        _ => Err(vec![Violation::new(
            path.to_string(),
            field.label,
            ConstraintKind::NotAnArray,
        )]),
    }
}

/// JSON 형태로 보이는 문자열을 파싱합니다.
///
/// 선행 공백 뒤에 기대하는 여는 괄호가 있을 때만 시도하며,
/// 파싱에 실패하면 원본 값을 그대로 반환합니다 (절대 실패하지 않습니다).
fn coerce_json_string(raw: &Value, open: char) -> Value {
    if let Value::String(s) = raw {
        if s.trim_start().starts_with(open) {
            match serde_json::from_str::<Value>(s) {
                Ok(parsed) => return parsed,
                Err(e) => {
                    log::error!("JSON 문자열 강제 변환 실패, 원본 유지: {}", e);
                }
            }
        }
    }
    raw.clone()
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OBJECT_ID_REGEX;
    use crate::validation::schema::{array, integer, number, object, string, RequestSchema, Schema};
    use serde_json::json;

    fn login_body() -> Schema {
        Schema::new()
            .field(string("username").required())
            .field(string("password").min(6).max(16).required())
            .field(string("OTP").allow_empty())
            .field(number("latitude").min(0).max(90))
    }

    #[test]
    fn test_missing_required_fields_report_each_path() {
        let result = validate_section(&login_body(), &json!({}), true);

        let violations = result.unwrap_err();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["username", "password"]);
        assert_eq!(violations[0].description, "username is required");
        assert_eq!(violations[1].description, "password is required");
    }

    #[test]
    fn test_all_violations_collected_not_just_first() {
        let input = json!({ "username": "", "password": "abc", "latitude": 120 });
        let violations = validate_section(&login_body(), &input, true).unwrap_err();

        let descriptions: Vec<&str> =
            violations.iter().map(|v| v.description.as_str()).collect();
        assert!(descriptions.contains(&"username should not be empty"));
        assert!(descriptions
            .contains(&"password length must be at least 6 characters long"));
        assert!(descriptions.contains(&"latitude must be less than 90"));
    }

    #[test]
    fn test_unknown_fields_are_stripped() {
        let input = json!({
            "username": "9999999999",
            "password": "secret12",
            "injected": "value"
        });

        let value = validate_section(&login_body(), &input, true).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("injected"));
        assert_eq!(object["username"], json!("9999999999"));
    }

    #[test]
    fn test_unknown_fields_kept_when_strip_disabled() {
        let schema = Schema::new().field(string("name").required());
        let input = json!({ "name": "photo.png", "size": 1234 });

        let value = validate_section(&schema, &input, false).unwrap();
        assert_eq!(value.as_object().unwrap()["size"], json!(1234));
    }

    #[test]
    fn test_deny_unknown_reports_key() {
        let schema = Schema::new().field(string("name").required()).deny_unknown();
        let input = json!({ "name": "ok", "extra": 1 });

        let violations = validate_section(&schema, &input, true).unwrap_err();
        assert_eq!(violations[0].path, "extra");
        assert_eq!(violations[0].description, "extra is not allowed");
    }

    #[test]
    fn test_empty_string_allowed_when_whitelisted() {
        let input = json!({ "username": "u1", "password": "secret12", "OTP": "" });
        let value = validate_section(&login_body(), &input, true).unwrap();
        assert_eq!(value.as_object().unwrap()["OTP"], json!(""));
    }

    #[test]
    fn test_email_and_pattern_rules() {
        let schema = Schema::new()
            .field(string("email").email().required())
            .field(string("userId").pattern(&OBJECT_ID_REGEX).required());

        let input = json!({ "email": "not-an-email", "userId": "xyz" });
        let violations = validate_section(&schema, &input, true).unwrap_err();

        assert_eq!(violations[0].description, "email must be a valid email");
        assert_eq!(violations[1].description, "userId not in valid format");

        let ok = json!({
            "email": "gildong@example.com",
            "userId": "507f1f77bcf86cd799439011"
        });
        assert!(validate_section(&schema, &ok, true).is_ok());
    }

    #[test]
    fn test_numeric_string_is_coerced() {
        let schema = Schema::new().field(
            number("number")
                .min(1000000000)
                .max(9999999999)
                .required(),
        );

        let value =
            validate_section(&schema, &json!({ "number": "9999999999" }), true).unwrap();
        assert_eq!(value.as_object().unwrap()["number"], json!(9999999999i64));

        let violations =
            validate_section(&schema, &json!({ "number": "not-a-number" }), true).unwrap_err();
        assert_eq!(violations[0].description, "number must be a Number");
    }

    #[test]
    fn test_number_bounds_messages() {
        let schema = Schema::new().field(
            number("number")
                .min(1000000000)
                .max(9999999999)
                .required(),
        );

        let too_small =
            validate_section(&schema, &json!({ "number": 12345 }), true).unwrap_err();
        assert_eq!(
            too_small[0].description,
            "number must be larger than or equal to 1000000000"
        );

        let too_large =
            validate_section(&schema, &json!({ "number": 99999999990i64 }), true).unwrap_err();
        assert_eq!(
            too_large[0].description,
            "number must be less than 9999999999"
        );
    }

    #[test]
    fn test_integer_rule() {
        let schema = Schema::new().field(integer("count").required());

        assert!(validate_section(&schema, &json!({ "count": 3 }), true).is_ok());
        let violations =
            validate_section(&schema, &json!({ "count": 3.5 }), true).unwrap_err();
        assert_eq!(violations[0].description, "count must be an integer");
    }

    #[test]
    fn test_json_object_string_is_parsed_before_validation() {
        let schema = Schema::new().field(object("filter"));
        let input = json!({ "filter": "{\"role\": \"admin\"}" });

        let value = validate_section(&schema, &input, true).unwrap();
        assert_eq!(
            value.as_object().unwrap()["filter"],
            json!({ "role": "admin" })
        );
    }

    #[test]
    fn test_malformed_json_string_falls_back_to_raw() {
        // 파싱 실패는 예외가 아니라 원본 문자열에 대한 타입 위반이 된다
        let schema = Schema::new().field(object("filter"));
        let input = json!({ "filter": "{broken json" });

        let violations = validate_section(&schema, &input, true).unwrap_err();
        assert_eq!(violations[0].description, "filter must be an object");
    }

    #[test]
    fn test_json_array_string_is_parsed() {
        let schema = Schema::new().field(array("tags"));

        let value =
            validate_section(&schema, &json!({ "tags": "[1, 2, 3]" }), true).unwrap();
        assert_eq!(value.as_object().unwrap()["tags"], json!([1, 2, 3]));

        let violations =
            validate_section(&schema, &json!({ "tags": "[broken" }), true).unwrap_err();
        assert_eq!(violations[0].description, "tags must be an array");
    }

    #[test]
    fn test_nested_schema_paths_are_prefixed() {
        let schema = Schema::new().field(
            object("photo")
                .schema(
                    Schema::new()
                        .field(string("name").required())
                        .field(number("size").max(600000).required()),
                )
                .required(),
        );

        let input = json!({ "photo": { "size": 700000 } });
        let violations = validate_section(&schema, &input, true).unwrap_err();

        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"photo.name"));
        assert!(paths.contains(&"photo.size"));
    }

    #[test]
    fn test_request_validation_unions_section_violations() {
        let schema = RequestSchema::new()
            .params(
                Schema::new()
                    .field(string("userId").pattern(&OBJECT_ID_REGEX).required()),
            )
            .body(
                Schema::new()
                    .field(string("password").min(6).max(16).required())
                    .field(string("newPassword").min(6).max(16).required()),
            );

        let sections = SectionValues {
            body: json!({ "password": "abc" }),
            params: json!({ "userId": "bad" }),
            query: Value::Null,
            files: Value::Null,
        };

        let violations = validate_request(&schema, sections).unwrap_err();
        let descriptions: Vec<&str> =
            violations.iter().map(|v| v.description.as_str()).collect();

        // 두 섹션의 위반이 모두 포함된다
        assert!(descriptions.contains(&"userId not in valid format"));
        assert!(descriptions
            .contains(&"password length must be at least 6 characters long"));
        assert!(descriptions.contains(&"newPassword is required"));
    }

    #[test]
    fn test_request_validation_success_replaces_sections() {
        let schema = RequestSchema::new().body(
            Schema::new()
                .field(string("username").required())
                .field(string("password").min(6).max(16).required()),
        );

        let sections = SectionValues {
            body: json!({
                "username": "gildong@example.com",
                "password": "secret12",
                "dropped": true
            }),
            params: json!({ "untouched": "yes" }),
            query: Value::Null,
            files: Value::Null,
        };

        let validated = validate_request(&schema, sections).unwrap();
        assert!(validated.body.get("dropped").is_none());
        // 스키마가 없는 섹션은 그대로 유지된다
        assert_eq!(validated.params, json!({ "untouched": "yes" }));
    }
}
