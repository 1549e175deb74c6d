//! 사용자 관리 요청 DTO
//!
//! 회원 가입, 프로필 수정, 사용자 목록 조회 요청의 본문을 매핑합니다.

use serde::Deserialize;

/// 새로운 사용자 계정 생성을 위한 요청 DTO
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// 휴대폰 번호 (10자리)
    pub number: i64,
    /// 비밀번호가 없으면 서버가 임의 비밀번호를 생성한다
    pub password: Option<String>,
}

/// 사용자 프로필 수정 요청 DTO
///
/// 이름 필드만 수정할 수 있으며 둘 다 선택 사항입니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// 사용자 목록 조회 요청 DTO
///
/// `filter`는 저장소에 그대로 전달되는 조회 조건 객체입니다.
/// 문자열로 전달된 JSON 객체는 검증 단계에서 이미 파싱되어 있습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersRequest {
    pub filter: Option<serde_json::Value>,
}
