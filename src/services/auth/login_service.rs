//! 로그인/비밀번호 플로우 서비스
//!
//! 자격 증명 로그인, 프로바이더 로그인, OTP 기반 비밀번호 재설정,
//! 인증된 비밀번호 변경의 비즈니스 로직을 오케스트레이션합니다.
//!
//! ## 보안 설계
//!
//! - 로그인 실패 사유(계정 없음/비밀번호 불일치)는 동일한 메시지로
//!   통합하여 어느 쪽이 틀렸는지 노출하지 않습니다.
//! - 비밀번호 비교는 bcrypt 해시 비교로만 수행합니다.
//! - OTP 검증 성공은 코드를 소비하지 않으며, 비밀번호 설정 성공이
//!   코드를 제거합니다.

use std::sync::Arc;

use chrono::Utc;

use crate::config::PasswordConfig;
use crate::constants::Provider;
use crate::domain::entities::users::{Role, User};
use crate::errors::AppError;
use crate::repositories::users::UserRepository;
use crate::services::auth::google_auth_service::ProviderVerifier;
use crate::services::auth::otp_service::{OtpFailure, OtpService};
use crate::services::auth::token_service::TokenService;
use crate::utils::device::derive_device_id;

/// 로그인 성공 결과
///
/// 사용자 레코드, 액세스 토큰, 역할을 함께 반환합니다.
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub role: Role,
}

/// 로그인/비밀번호 플로우 서비스
pub struct LoginService {
    user_repo: Arc<UserRepository>,
    token_service: Arc<TokenService>,
    otp_service: Arc<OtpService>,
    provider_verifier: Arc<dyn ProviderVerifier>,
}

impl LoginService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        token_service: Arc<TokenService>,
        otp_service: Arc<OtpService>,
        provider_verifier: Arc<dyn ProviderVerifier>,
    ) -> Self {
        Self {
            user_repo,
            token_service,
            otp_service,
            provider_verifier,
        }
    }

    /// 사용자명이 휴대폰 번호 형태인지 판별합니다.
    ///
    /// 숫자만으로 구성된 사용자명은 번호로, 그 외는 이메일로 조회합니다.
    pub fn is_phone_number(username: &str) -> bool {
        !username.is_empty() && username.chars().all(|c| c.is_ascii_digit())
    }

    /// 자격 증명 로그인
    ///
    /// 사용자명(번호 또는 이메일)으로 정확히 하나의 계정을 찾고
    /// 비밀번호 해시를 비교합니다. 성공 시 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidInput` - 조회 실패와 비밀번호 불일치 모두
    ///   동일한 메시지로 반환됩니다
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let invalid =
            || AppError::InvalidInput("Invalid Username or Password!".to_string());

        let user = if Self::is_phone_number(username) {
            match username.parse::<i64>() {
                Ok(number) => self.user_repo.find_by_number(number).await?,
                Err(_) => None,
            }
        } else {
            self.user_repo.find_by_email(username).await?
        };

        let user = user.ok_or_else(invalid)?;

        let matches = bcrypt::verify(password, &user.password)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        if !matches {
            log::warn!("로그인 실패: username={}", username);
            return Err(invalid());
        }

        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let access_token = self.token_service.issue(&user_id, user.role)?;

        log::info!("로그인 성공: 사용자 ID {}", user_id);

        Ok(LoginOutcome {
            role: user.role,
            user,
            access_token,
        })
    }

    /// 외부 프로바이더 토큰으로 로그인
    ///
    /// 프로바이더가 확인한 이메일로 로컬 계정을 조회합니다.
    /// 로그인 경로에서는 계정을 자동 생성하지 않습니다.
    pub async fn login_with_provider(
        &self,
        token_id: &str,
        provider: Provider,
    ) -> Result<LoginOutcome, AppError> {
        if provider != Provider::Google {
            return Err(AppError::InvalidInput("No valid Input found".to_string()));
        }

        let profile = self.provider_verifier.verify_identity_token(token_id).await?;

        let user = self
            .user_repo
            .find_by_email(&profile.email)
            .await?
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "No User are registered with this email{}",
                    profile.email
                ))
            })?;

        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let access_token = self.token_service.issue(&user_id, user.role)?;

        log::info!("프로바이더 로그인 성공: {}", profile.email);

        Ok(LoginOutcome {
            role: user.role,
            user,
            access_token,
        })
    }

    /// 비밀번호 재설정 OTP 발급
    ///
    /// 번호로 사용자를 찾아 OTP를 발급하고 이메일로 발송합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidInput` - 사용자가 없거나 이메일이 없는 경우
    pub async fn forgot_password(&self, number: i64) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_number(number)
            .await?
            .ok_or_else(|| AppError::InvalidInput("No such user found".to_string()))?;

        self.otp_service.issue(&user).await
    }

    /// OTP 검증
    ///
    /// 성공 시 클라이언트 IP와 User-Agent에서 파생한 기기 식별자를
    /// 반환합니다. 검증은 코드를 소비하지 않습니다.
    pub async fn verify_otp(
        &self,
        number: i64,
        code: &str,
        ip: &str,
        user_agent: &str,
    ) -> Result<String, AppError> {
        let user = self.user_repo.find_by_number(number).await?;

        let record = match &user {
            Some(user) => user.otp.as_ref(),
            None => None,
        };

        match OtpService::verify(record, code, Utc::now()) {
            Ok(()) => {}
            Err(OtpFailure::Missing) | Err(OtpFailure::Expired) => {
                return Err(AppError::InvalidInput("Invalid user or OTP.".to_string()));
            }
            Err(OtpFailure::Mismatch) => {
                return Err(AppError::InvalidInput("Invalid or expired otp.".to_string()));
            }
        }

        Ok(derive_device_id(ip, user_agent))
    }

    /// OTP 소비와 함께 새 비밀번호 설정
    ///
    /// 활성 계정만 허용되며, 성공 시 비밀번호 갱신과 OTP 제거가 함께
    /// 수행되어 동일 코드를 재사용할 수 없습니다.
    pub async fn set_password(
        &self,
        password: &str,
        number: i64,
        code: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_number(number)
            .await?
            .filter(|user| user.active)
            .ok_or_else(|| AppError::InvalidInput("Invalid user.".to_string()))?;

        OtpService::verify(user.otp.as_ref(), code, Utc::now())
            .map_err(|_| AppError::InvalidInput("Invalid or expired otp.".to_string()))?;

        let hash = bcrypt::hash(password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        self.user_repo.set_password_and_clear_otp(number, &hash).await
    }

    /// 인증된 사용자의 비밀번호 변경
    ///
    /// 현재 비밀번호 확인이 선행되며 OTP와는 무관합니다.
    pub async fn change_password(
        &self,
        user_id: &str,
        password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .filter(|user| user.active)
            .ok_or_else(|| AppError::InvalidInput("User doesn't exist".to_string()))?;

        let matches = bcrypt::verify(password, &user.password)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        if !matches {
            return Err(AppError::InvalidInput("password doesn't match".to_string()));
        }

        let hash = bcrypt::hash(new_password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        self.user_repo.set_password_by_id(user_id, &hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_classification() {
        assert!(LoginService::is_phone_number("9999999999"));
        assert!(LoginService::is_phone_number("0123"));
        assert!(!LoginService::is_phone_number("gildong@example.com"));
        assert!(!LoginService::is_phone_number("9999a99999"));
        assert!(!LoginService::is_phone_number(""));
    }
}
