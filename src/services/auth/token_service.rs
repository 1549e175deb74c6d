//! JWT RSA 기반 토큰 서비스
//!
//! RS256 알고리즘을 사용한 JWT 토큰 발급 및 검증 서비스입니다.
//! 발급자와 만료 시간이 고정된 상태 없는(stateless) 토큰을 발급하며,
//! 토큰은 저장소에 보관되지 않고 서명만으로 검증됩니다.
//!
//! # 설정 요구사항
//!
//! 다음 환경변수가 사용됩니다:
//! - `JWT_PRIVATE_KEY_PATH`: RSA 개인키 파일 경로
//! - `JWT_PUBLIC_KEY_PATH`: RSA 공개키 파일 경로
//! - `JWT_ISSUER`: 토큰 발급자 (기본값: myapp)
//! - `JWT_EXPIRATION_HOURS`: 토큰 만료 시간 (기본값: 4시간)
//!
//! # RSA 키 생성
//!
//! 키 파일이 없으면 기동 시 자동으로 생성됩니다. 수동 생성 시:
//!
//! ```bash
//! openssl genrsa -out jwt_private_key.pem 2048
//! openssl rsa -in jwt_private_key.pem -pubout -out jwt_public_key.pem
//! ```
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let token_service = TokenService::from_env()?;
//!
//! let token = token_service.issue("507f1f77bcf86cd799439011", Role::User)?;
//! let claims = token_service.verify(&token)?;
//! assert_eq!(claims.user_id, "507f1f77bcf86cd799439011");
//! ```

use std::fs;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::RsaPrivateKey;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::domain::entities::users::Role;
use crate::domain::models::token::TokenClaims;
use crate::errors::AppError;

/// JWT 토큰 발급/검증 서비스
///
/// RSA 키 자료는 기동 시 한 번 로딩되며, 키를 사용할 수 없으면
/// 애플리케이션 기동이 실패합니다. 요청 처리 중에는 키 로딩이
/// 실패할 일이 없습니다.
pub struct TokenService {
    /// 토큰 서명용 인코딩 키 (RSA 개인키)
    encoding_key: EncodingKey,
    /// 토큰 검증용 디코딩 키 (RSA 공개키)
    decoding_key: DecodingKey,
    /// 토큰 발급자 (iss 클레임)
    issuer: String,
    /// 발급 시점 기준 만료 시간 (시간 단위)
    expiration_hours: i64,
}

impl TokenService {
    /// 환경변수 설정으로 서비스를 생성합니다.
    ///
    /// 설정된 경로에 키 파일이 없으면 새 RSA 키 쌍을 생성해 저장합니다.
    ///
    /// # Errors
    ///
    /// - 키 파일을 읽거나 생성할 수 없는 경우
    /// - 키 파일 형식이 올바르지 않은 경우
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let private_key_path = AuthConfig::private_key_path();
        let public_key_path = AuthConfig::public_key_path();

        if !std::path::Path::new(&private_key_path).exists()
            || !std::path::Path::new(&public_key_path).exists()
        {
            log::info!("🔑 JWT keys not found. Generating new RSA key pair...");
            Self::generate_rsa_keys(&private_key_path, &public_key_path)?;
            log::info!("✅ JWT RSA keys generated successfully");
        } else {
            log::info!("🔑 Loading existing JWT RSA keys");
        }

        let private_key_pem = fs::read_to_string(&private_key_path).map_err(|e| {
            format!(
                "Failed to read private key file '{}': {}",
                private_key_path, e
            )
        })?;
        let public_key_pem = fs::read_to_string(&public_key_path).map_err(|e| {
            format!(
                "Failed to read public key file '{}': {}",
                public_key_path, e
            )
        })?;

        Self::from_pems(
            &private_key_pem,
            &public_key_pem,
            &AuthConfig::issuer(),
            AuthConfig::expiration_hours(),
        )
    }

    /// PEM 문자열로부터 서비스를 생성합니다.
    pub fn from_pems(
        private_key_pem: &str,
        public_key_pem: &str,
        issuer: &str,
        expiration_hours: i64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

        Ok(Self {
            encoding_key,
            decoding_key,
            issuer: issuer.to_string(),
            expiration_hours,
        })
    }

    /// RSA 키 쌍을 자동 생성합니다.
    fn generate_rsa_keys(
        private_key_path: &str,
        public_key_path: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // secrets 디렉토리 생성
        if let Some(parent) = std::path::Path::new(private_key_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        // RSA 키 생성 (2048비트)
        let private_key = RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048)?;
        let public_key = private_key.to_public_key();

        // 개인키 저장 (PKCS#1 형식)
        let private_key_pem = private_key.to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)?;
        std::fs::write(private_key_path, private_key_pem.as_bytes())?;

        // 공개키 저장 (PKCS#8 형식)
        let public_key_pem = public_key.to_public_key_pem(rsa::pkcs8::LineEnding::LF)?;
        std::fs::write(public_key_path, public_key_pem.as_bytes())?;

        // 파일 권한 설정 (Unix 계열 시스템에서만)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let private_perms = std::fs::Permissions::from_mode(0o600);
            let public_perms = std::fs::Permissions::from_mode(0o644);

            std::fs::set_permissions(private_key_path, private_perms)?;
            std::fs::set_permissions(public_key_path, public_perms)?;
        }

        log::info!("📁 Private key saved: {}", private_key_path);
        log::info!("📁 Public key saved: {}", public_key_path);

        Ok(())
    }

    /// JWT 토큰을 발급합니다.
    ///
    /// 사용자 ID와 역할을 담아 RSA 개인키로 서명하며,
    /// 만료 시각은 발급 시점 기준 고정 기간입니다.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 고유 식별자 (ObjectId 16진수 문자열)
    /// * `role` - 사용자 역할
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 토큰 서명 실패
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expiration_hours);

        let claims = TokenClaims {
            sub: user_id.to_string(),
            user_id: user_id.to_string(),
            role,
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let header = Header::new(Algorithm::RS256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// JWT 토큰 검증 및 클레임 추출
    ///
    /// 서명, 발급자, 만료 시간을 확인합니다. 서명 불일치, 발급자 불일치,
    /// 만료를 포함한 일반적인 검증 실패는 모두 인증 에러로 반환됩니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 만료, 서명/발급자/형식 불일치
    /// * `AppError::InternalError` - 기타 시스템 오류
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;

                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
                    }
                    ErrorKind::InvalidIssuer => {
                        AppError::AuthenticationError("토큰 발급자가 일치하지 않습니다".to_string())
                    }
                    ErrorKind::InvalidToken
                    | ErrorKind::InvalidSignature
                    | ErrorKind::Base64(_)
                    | ErrorKind::Json(_)
                    | ErrorKind::Utf8(_) => {
                        AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string())
                    }
                    _ => AppError::InternalError(format!("토큰 검증 실패: {}", e)),
                }
            })
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 `Bearer {token}` 형식에서 토큰 부분만을
    /// 추출합니다. 접두사가 없으면 헤더 값 전체를 토큰으로 취급합니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> &'a str {
        auth_header.strip_prefix("Bearer ").unwrap_or(auth_header)
    }
}
