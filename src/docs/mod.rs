//! API 문서 생성 모듈
//!
//! 라우트 테이블과 검증 스키마라는 단일 선언 소스로부터 사람이 읽을 수
//! 있는 엔드포인트/파라미터 문서를 파생합니다. 검증 규칙과 문서가
//! 같은 스키마를 공유하므로 서로 어긋날 수 없습니다.

use serde_json::{json, Map, Value};

use crate::schemas;
use crate::validation::schema::RequestSchema;

/// 문서화 대상 라우트 선언
struct RouteDoc {
    method: &'static str,
    path: &'static str,
    auth: &'static str,
    description: &'static str,
    schema: &'static RequestSchema,
}

/// 전체 라우트 테이블
///
/// 라우트 등록(`crate::routes`)과 같은 스키마 상수를 참조합니다.
fn route_docs() -> Vec<RouteDoc> {
    vec![
        RouteDoc {
            method: "POST",
            path: "/api/login",
            auth: "none",
            description: "Login with phone number or email",
            schema: &schemas::login::LOGIN,
        },
        RouteDoc {
            method: "POST",
            path: "/api/generate/otp",
            auth: "none",
            description: "Issue a password reset OTP",
            schema: &schemas::login::FORGOT_PASSWORD,
        },
        RouteDoc {
            method: "POST",
            path: "/api/verify/otp",
            auth: "none",
            description: "Verify a password reset OTP",
            schema: &schemas::login::VERIFY_OTP,
        },
        RouteDoc {
            method: "POST",
            path: "/api/set/password",
            auth: "none",
            description: "Set a new password with a valid OTP",
            schema: &schemas::login::SET_PASSWORD,
        },
        RouteDoc {
            method: "POST",
            path: "/api/change/password/{userId}",
            auth: "bearer (self only)",
            description: "Change password after verifying the current one",
            schema: &schemas::login::CHANGE_PASSWORD,
        },
        RouteDoc {
            method: "POST",
            path: "/api/provider/login",
            auth: "none",
            description: "Login with a Google identity token",
            schema: &schemas::login::PROVIDER_LOGIN,
        },
        RouteDoc {
            method: "POST",
            path: "/api/user/register",
            auth: "none",
            description: "Register a new user",
            schema: &schemas::users::REGISTER_USER,
        },
        RouteDoc {
            method: "PUT",
            path: "/api/user/update/{userId}",
            auth: "bearer (self only)",
            description: "Update user profile names",
            schema: &schemas::users::UPDATE_USER,
        },
        RouteDoc {
            method: "POST",
            path: "/api/user/verify",
            auth: "none",
            description: "Verify a Google token before signup",
            schema: &schemas::users::VERIFY_PROVIDER_SIGNUP,
        },
        RouteDoc {
            method: "POST",
            path: "/api/user/list-users/{userId}",
            auth: "bearer (admin)",
            description: "List users matching a filter",
            schema: &schemas::users::LIST_USERS,
        },
    ]
}

/// 전체 API 문서를 생성합니다.
pub fn api_documentation() -> Value {
    let routes: Vec<Value> = route_docs().iter().map(describe_route).collect();

    json!({
        "service": "account_service_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "responses": {
            "success": { "status": 1 },
            "failure": { "status": 0, "message": "string", "details": "optional array of {path, description}" },
        },
        "routes": routes,
    })
}

fn describe_route(route: &RouteDoc) -> Value {
    let mut request = Map::new();

    for (name, schema) in [
        ("body", route.schema.body.as_ref()),
        ("params", route.schema.params.as_ref()),
        ("query", route.schema.query.as_ref()),
        ("files", route.schema.files.as_ref()),
    ] {
        if let Some(schema) = schema {
            let fields = serde_json::to_value(schema.describe()).unwrap_or(Value::Null);
            request.insert(name.to_string(), fields);
        }
    }

    json!({
        "method": route.method,
        "path": route.path,
        "auth": route.auth,
        "description": route.description,
        "request": Value::Object(request),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documentation_lists_every_route() {
        let doc = api_documentation();
        let routes = doc["routes"].as_array().unwrap();

        assert_eq!(routes.len(), 10);

        let paths: Vec<&str> = routes
            .iter()
            .map(|r| r["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"/api/login"));
        assert!(paths.contains(&"/api/user/list-users/{userId}"));
    }

    #[test]
    fn test_login_route_documents_constraints() {
        let doc = api_documentation();
        let login = doc["routes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["path"] == "/api/login")
            .unwrap();

        let body = login["request"]["body"].as_array().unwrap();
        let password = body.iter().find(|f| f["name"] == "password").unwrap();

        assert_eq!(password["type"], "string");
        assert_eq!(password["required"], true);
        let constraints = password["constraints"].as_array().unwrap();
        assert!(constraints.contains(&json!("min length 6")));
        assert!(constraints.contains(&json!("max length 16")));
    }

    #[test]
    fn test_params_section_is_documented() {
        let doc = api_documentation();
        let change = doc["routes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["path"] == "/api/change/password/{userId}")
            .unwrap();

        let params = change["request"]["params"].as_array().unwrap();
        assert_eq!(params[0]["name"], "userId");
        assert_eq!(change["auth"], "bearer (self only)");
    }
}
