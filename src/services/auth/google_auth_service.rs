//! # Google 소셜 로그인 검증 서비스
//!
//! 클라이언트가 Google 로그인으로 획득한 ID 토큰을 서버 측에서 검증하고
//! 검증된 프로필(이름, 이메일)을 돌려주는 서비스입니다.
//!
//! ## 검증 절차
//!
//! 1. Google tokeninfo 엔드포인트에 ID 토큰 조회
//! 2. `aud` 클레임이 이 서비스의 Client ID와 일치하는지 확인
//! 3. 이메일 클레임 존재 확인
//!
//! 토큰의 서명과 만료는 tokeninfo 엔드포인트가 확인하며, 유효하지 않은
//! 토큰은 HTTP 에러로 응답됩니다.
//!
//! ## 설정 의존성
//!
//! ```bash
//! GOOGLE_CLIENT_ID=your-client-id.apps.googleusercontent.com
//! ```

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GoogleOAuthConfig;
use crate::errors::AppError;

/// 외부 프로바이더가 확인해 준 사용자 프로필
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub name: Option<String>,
    pub email: String,
}

/// 외부 ID 토큰 검증 경계 trait
///
/// 프로바이더 토큰을 받아 검증된 프로필을 반환합니다.
/// 플로우 계층은 이 trait에만 의존하므로 테스트에서 스텁으로 대체할 수
/// 있습니다.
#[async_trait]
pub trait ProviderVerifier: Send + Sync {
    async fn verify_identity_token(&self, token_id: &str) -> Result<ProviderProfile, AppError>;
}

/// Google tokeninfo 응답 (필요한 클레임만)
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    email: Option<String>,
    name: Option<String>,
}

/// Google tokeninfo 기반 검증 구현체
pub struct GoogleAuthService {
    client: reqwest::Client,
}

impl GoogleAuthService {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for GoogleAuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderVerifier for GoogleAuthService {
    /// Google ID 토큰을 검증하고 프로필을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidInput` - 토큰이 유효하지 않거나 이 서비스용이
    ///   아닌 경우
    /// * `AppError::ExternalServiceError` - Google API 통신 오류
    async fn verify_identity_token(&self, token_id: &str) -> Result<ProviderProfile, AppError> {
        let url = format!(
            "{}?id_token={}",
            GoogleOAuthConfig::tokeninfo_uri(),
            urlencoding::encode(token_id)
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Google API 호출 실패: {}", e))
        })?;

        if !response.status().is_success() {
            log::warn!("Google 토큰 검증 거부: HTTP {}", response.status());
            return Err(AppError::InvalidInput("Invalid Google User".to_string()));
        }

        let info: GoogleTokenInfo = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("tokeninfo 응답 파싱 실패: {}", e))
        })?;

        // 다른 애플리케이션용으로 발급된 토큰 거부
        if info.aud != GoogleOAuthConfig::client_id() {
            log::warn!("Google 토큰 audience 불일치");
            return Err(AppError::InvalidInput("Invalid Google User".to_string()));
        }

        let email = info
            .email
            .ok_or_else(|| AppError::InvalidInput("Invalid Google User".to_string()))?;

        Ok(ProviderProfile {
            name: info.name,
            email,
        })
    }
}
