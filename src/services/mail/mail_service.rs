//! OTP 메일 발송 서비스
//!
//! 외부 메일 서비스(Mailgun)를 통해 OTP 코드를 수신자에게 전달합니다.
//! 발송 신뢰성 보장은 외부 서비스의 책임이며, 이 모듈은 API 호출과
//! 에러 변환만 담당합니다.
//!
//! 테스트에서 실제 발송을 대체할 수 있도록 trait 경계로 분리되어 있습니다.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::MailConfig;
use crate::errors::AppError;

/// 메일 발송 경계 trait
///
/// OTP 코드와 수신자 주소를 받아 발송하고 프로바이더의 메시지 ID를
/// 반환합니다.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    async fn send_otp(&self, code: &str, recipient: &str) -> Result<String, AppError>;
}

/// Mailgun 발송 응답
#[derive(Debug, Deserialize)]
struct MailgunResponse {
    id: Option<String>,
    message: Option<String>,
}

/// Mailgun HTTP API 기반 발송 구현체
pub struct MailgunMailer {
    client: reqwest::Client,
}

impl MailgunMailer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for MailgunMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailDispatcher for MailgunMailer {
    /// OTP 코드를 수신자에게 발송합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ExternalServiceError` - API 호출 실패 또는 비정상 응답
    async fn send_otp(&self, code: &str, recipient: &str) -> Result<String, AppError> {
        let url = format!("{}/{}/messages", MailConfig::api_base(), MailConfig::domain());

        let params = [
            ("from", MailConfig::sender()),
            ("to", recipient.to_string()),
            ("subject", "OTP Verification".to_string()),
            ("text", format!("Your Verification OTP is {}", code)),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(MailConfig::api_key()))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("메일 발송 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "메일 발송 실패 ({}): {}",
                status, body
            )));
        }

        let parsed: MailgunResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("메일 응답 파싱 실패: {}", e)))?;

        log::info!(
            "OTP 메일 발송 완료: {} ({})",
            recipient,
            parsed.message.as_deref().unwrap_or("no message")
        );

        Ok(parsed.id.unwrap_or_default())
    }
}
