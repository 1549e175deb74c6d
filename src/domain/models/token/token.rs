//! JWT 인증 토큰 클레임 구조체
//!
//! RFC 7519 JWT 표준 클레임과 애플리케이션 특화 클레임을 정의합니다.

use serde::{Deserialize, Serialize};

use crate::domain::entities::users::Role;

/// JWT 토큰의 클레임(Payload) 구조체
///
/// 개인정보 보호를 위해 최소한의 정보만 포함합니다.
///
/// ## 클레임 구성
///
/// - `sub`: 토큰의 주체 (사용자 ID)
/// - `userId`: 사용자 ID (sub와 동일하지만 명시적 접근용)
/// - `role`: 사용자 역할 (권한 기반 접근 제어용)
/// - `jti`: 토큰 고유 식별자
/// - `iss`: 토큰 발급자
/// - `iat`: 토큰 발급 시간 (Unix timestamp)
/// - `exp`: 토큰 만료 시간 (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 토큰의 주체 (사용자 ID)
    pub sub: String,
    /// 사용자 ID (sub와 동일)
    #[serde(rename = "userId")]
    pub user_id: String,
    /// 사용자 역할
    pub role: Role,
    /// 토큰 고유 식별자
    pub jti: String,
    /// 토큰 발급자
    pub iss: String,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}
