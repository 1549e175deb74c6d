//! 사용자 응답 DTO
//!
//! 엔티티를 클라이언트 응답으로 변환할 때 사용하는 구조체입니다.
//! 비밀번호 해시와 OTP 레코드 등 민감 정보는 응답에서 제외됩니다.

use serde::Serialize;

use crate::domain::entities::users::{Role, User};

/// 민감 정보가 제거된 사용자 정보 응답
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number: i64,
    pub role: Role,
    pub active: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            number: user.number,
            role: user.role,
            active: user.active,
            created_at: user.created_at.to_chrono().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_hides_credentials() {
        let user = User::new(
            "Gil-dong".to_string(),
            "Hong".to_string(),
            "gildong@example.com".to_string(),
            9999999999,
            "$2b$10$secret-hash".to_string(),
        );

        let response = UserResponse::from(user);
        let value = serde_json::to_value(&response).unwrap();
        let obj = value.as_object().unwrap();

        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("otp"));
        assert_eq!(obj["email"], serde_json::json!("gildong@example.com"));
        assert_eq!(obj["number"], serde_json::json!(9999999999i64));
    }
}
