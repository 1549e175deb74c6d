//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 로컬 자격 증명 인증과 OTP 기반 비밀번호 재설정 상태를 함께 담는
//! 통합 사용자 모델을 제공합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 사용자 역할
///
/// 역할 기반 접근 제어에 사용됩니다. 관리자 전용 라우트는 `Admin` 역할을
/// 요구하며, 신규 가입자는 기본적으로 `User` 역할을 가집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// 비밀번호 재설정용 OTP 레코드
///
/// 사용자 문서에 내장되는 일회용 코드와 절대 만료 시각입니다.
/// 재발급 시 기존 레코드를 덮어쓰며, 비밀번호 설정이 성공하면 함께
/// 제거됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRecord {
    /// 6자리 숫자 코드
    pub otp: String,
    /// 만료 시각
    pub expire_date: DateTime,
}

impl OtpRecord {
    /// 주어진 시각 기준 만료 여부를 반환합니다.
    ///
    /// 만료 시각과 같거나 지난 경우 만료로 취급합니다.
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now >= self.expire_date.to_chrono()
    }
}

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// 이메일과 휴대폰 번호는 시스템 전체에서 유일하며, 두 값 모두
/// 로그인 식별자로 사용될 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 이름
    pub first_name: String,
    /// 성
    pub last_name: String,
    /// 사용자 이메일 (unique)
    pub email: String,
    /// 휴대폰 번호 (unique, 10자리)
    pub number: i64,
    /// 사용자 역할
    #[serde(default)]
    pub role: Role,
    /// 해시된 비밀번호
    pub password: String,
    /// 계정 활성화 여부
    #[serde(default)]
    pub active: bool,
    /// 비밀번호 재설정용 OTP (발급된 경우에만 존재)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<OtpRecord>,
    /// 생성 시간
    pub created_at: DateTime,
}

impl User {
    /// 새 사용자 생성
    ///
    /// 신규 가입 시 `User` 역할과 비활성 상태로 시작하며,
    /// OTP 레코드는 존재하지 않습니다.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        number: i64,
        password_hash: String,
    ) -> Self {
        Self {
            id: None,
            first_name,
            last_name,
            email,
            number,
            role: Role::User,
            password: password_hash,
            active: false,
            otp: None,
            created_at: DateTime::now(),
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_user_document_field_names() {
        let user = User::new(
            "Gil-dong".to_string(),
            "Hong".to_string(),
            "gildong@example.com".to_string(),
            9999999999,
            "$2b$10$hash".to_string(),
        );

        let value = serde_json::to_value(&user).unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.contains_key("firstName"));
        assert!(obj.contains_key("lastName"));
        assert!(obj.contains_key("createdAt"));
        // 새 사용자는 _id와 otp가 직렬화에서 빠진다
        assert!(!obj.contains_key("_id"));
        assert!(!obj.contains_key("otp"));
        assert_eq!(obj["active"], serde_json::json!(false));
        assert_eq!(obj["role"], serde_json::json!("user"));
    }

    #[test]
    fn test_otp_record_expiry_boundary() {
        let now = chrono::Utc::now();
        let record = OtpRecord {
            otp: "042917".to_string(),
            expire_date: DateTime::from_chrono(now + chrono::Duration::minutes(10)),
        };

        assert!(!record.is_expired(now + chrono::Duration::seconds(599)));
        assert!(record.is_expired(now + chrono::Duration::minutes(10)));
        assert!(record.is_expired(now + chrono::Duration::seconds(601)));
    }
}
