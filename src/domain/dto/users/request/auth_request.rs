//! 인증 요청관련 DTO
//!
//! 로그인, OTP 발급/검증, 비밀번호 설정/변경 요청의 본문을 매핑합니다.
//! 모든 구조체는 검증 미들웨어가 강제/정리한 본문으로부터 역직렬화되므로
//! 필드 형식은 이미 스키마를 통과한 상태입니다.

use serde::Deserialize;

/// 로그인 요청 구조체
///
/// `username`은 휴대폰 번호(숫자만) 또는 이메일 주소입니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// 2차 인증 코드 (선택, 빈 문자열 허용)
    #[serde(rename = "OTP")]
    pub otp: Option<String>,
    /// 재로그인 시 기기 식별자 (선택)
    pub device_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// 비밀번호 재설정 OTP 발급 요청 구조체
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub number: i64,
}

/// OTP 검증 요청 구조체
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub number: i64,
    #[serde(rename = "OTP")]
    pub otp: String,
    pub device_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// OTP 기반 비밀번호 설정 요청 구조체
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
    pub number: i64,
    #[serde(rename = "OTP")]
    pub otp: String,
}

/// 현재 비밀번호 확인 후 변경 요청 구조체
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
}

/// 외부 프로바이더 로그인/검증 요청 구조체
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTokenRequest {
    pub token_id: String,
}
