//! OTP 생명주기 관리 서비스
//!
//! 비밀번호 재설정용 일회용 코드의 발급, 검증, 소비를 담당합니다.
//!
//! ## 상태 전이
//!
//! ```text
//! NONE ──issue──► ISSUED ──verify──► VERIFIED
//!                   │                    │
//!                   │ (시간 경과)         │ set-password
//!                   ▼                    ▼
//!                EXPIRED             CONSUMED (레코드 제거)
//! ```
//!
//! - 발급은 기존 코드를 대기열 없이 덮어씁니다.
//! - 만료는 검증 시점에 지연 확인되며 백그라운드 정리는 없습니다.
//! - 검증 자체는 코드를 지우지 않고, 비밀번호 설정이 소비 시점입니다.
//! - 발급 횟수 제한은 호출자 정책에 맡깁니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::domain::entities::users::{OtpRecord, User};
use crate::errors::AppError;
use crate::repositories::users::UserRepository;
use crate::services::mail::MailDispatcher;

/// OTP 코드 자릿수
pub const OTP_LENGTH: usize = 6;

/// 발급 시점 기준 만료 시간 (분)
pub const OTP_EXPIRY_MINUTES: i64 = 10;

/// OTP 검증 실패 사유
///
/// 플로우 계층에서 사용자에게 보여줄 메시지로 변환됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpFailure {
    /// 발급된 코드가 없음
    Missing,
    /// 만료 시각 도달
    Expired,
    /// 코드 불일치
    Mismatch,
}

/// OTP 생명주기 관리 서비스
pub struct OtpService {
    user_repo: Arc<UserRepository>,
    mailer: Arc<dyn MailDispatcher>,
}

impl OtpService {
    pub fn new(user_repo: Arc<UserRepository>, mailer: Arc<dyn MailDispatcher>) -> Self {
        Self { user_repo, mailer }
    }

    /// 6자리 숫자 코드를 생성합니다.
    ///
    /// 자리마다 0~9를 균등하게 뽑으며 선행 0도 허용됩니다.
    pub fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        (0..OTP_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// 사용자에게 새 OTP를 발급합니다.
    ///
    /// 코드를 생성해 사용자 문서에 저장(기존 코드 덮어쓰기)하고
    /// 등록된 이메일로 발송합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidInput` - 사용자에게 이메일이 없는 경우
    /// * `AppError::ExternalServiceError` - 메일 발송 실패
    pub async fn issue(&self, user: &User) -> Result<String, AppError> {
        if user.email.is_empty() {
            return Err(AppError::InvalidInput(
                "User does not have email ID".to_string(),
            ));
        }

        let code = Self::generate_code();
        let record = OtpRecord {
            otp: code.clone(),
            expire_date: mongodb::bson::DateTime::from_chrono(
                Utc::now() + Duration::minutes(OTP_EXPIRY_MINUTES),
            ),
        };

        self.user_repo.set_otp(user.number, &record).await?;

        log::debug!("OTP 발급: number={}", user.number);

        self.mailer.send_otp(&code, &user.email).await
    }

    /// 저장된 OTP 레코드에 대해 코드를 검증합니다.
    ///
    /// 코드가 정확히 일치하고 만료 전이어야 성공합니다.
    /// 검증 성공은 코드를 소비하지 않습니다.
    pub fn verify(
        record: Option<&OtpRecord>,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpFailure> {
        let record = record.ok_or(OtpFailure::Missing)?;

        if record.is_expired(now) {
            return Err(OtpFailure::Expired);
        }
        if record.otp != code {
            return Err(OtpFailure::Mismatch);
        }

        Ok(())
    }
}
