//! # 사용자 관리 서비스 구현
//!
//! 회원 가입, 프로필 수정, 프로바이더 가입 사전 검증, 사용자 목록 조회의
//! 비즈니스 로직을 구현합니다.
//!
//! ## 보안 설계 원칙
//!
//! - **bcrypt 해싱**: 적응형 해시 함수로 무차별 대입 공격 방지
//! - **솔트 자동 생성**: 레인보우 테이블 공격 방지
//! - **중복 방지**: 이메일, 휴대폰 번호 유니크 제약
//! - **민감 정보 제거**: 응답 DTO 변환 시 비밀번호 해시 제외

use std::sync::Arc;

use mongodb::bson::{doc, Document};
use rand::{distributions::Alphanumeric, Rng};

use crate::config::PasswordConfig;
use crate::constants::Provider;
use crate::domain::dto::users::request::{RegisterUserRequest, UpdateUserRequest};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::entities::users::User;
use crate::errors::AppError;
use crate::repositories::users::UserRepository;
use crate::services::auth::google_auth_service::{ProviderProfile, ProviderVerifier};
use crate::utils::string_utils::clean_optional_string;

/// 서버 생성 임시 비밀번호 길이
const GENERATED_PASSWORD_LENGTH: usize = 16;

/// 사용자 관리 비즈니스 로직 서비스
pub struct UserService {
    /// 사용자 데이터 액세스 리포지토리
    user_repo: Arc<UserRepository>,
    /// 외부 프로바이더 토큰 검증기
    provider_verifier: Arc<dyn ProviderVerifier>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        provider_verifier: Arc<dyn ProviderVerifier>,
    ) -> Self {
        Self {
            user_repo,
            provider_verifier,
        }
    }

    /// 새 사용자 계정 생성
    ///
    /// 비밀번호를 bcrypt로 해싱하여 저장합니다. 비밀번호가 없거나 비어
    /// 있으면 서버가 임의 비밀번호를 생성합니다 (프로바이더 가입 경로).
    ///
    /// # 반환값
    ///
    /// * `Ok(UserResponse)` - 생성된 사용자 (민감 정보 제외)
    /// * `Err(AppError::InvalidInput)` - 이메일 또는 번호 중복
    ///
    /// # 비즈니스 규칙
    ///
    /// - 이메일과 휴대폰 번호는 시스템 전체에서 유니크
    /// - 신규 계정은 `user` 역할, 비활성 상태로 시작
    pub async fn register_user(
        &self,
        request: RegisterUserRequest,
    ) -> Result<UserResponse, AppError> {
        let password = match request.password.filter(|p| !p.is_empty()) {
            Some(password) => password,
            None => Self::generate_random_password(),
        };

        let start = std::time::Instant::now();
        let password_hash = bcrypt::hash(&password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
        log::debug!("Password hashing took: {:?}", start.elapsed());

        let user = User::new(
            request.first_name,
            request.last_name,
            request.email,
            request.number,
            password_hash,
        );

        let created = self.user_repo.create(user).await?;

        log::info!("사용자 등록 완료: {}", created.email);

        Ok(UserResponse::from(created))
    }

    /// 사용자 프로필 수정
    ///
    /// 이름 필드 중 전달된 것만 갱신합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidInput` - 해당 ID의 사용자가 없는 경우
    pub async fn update_user(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<(), AppError> {
        let mut update = Document::new();

        if let Some(first_name) = clean_optional_string(request.first_name) {
            update.insert("firstName", first_name);
        }
        if let Some(last_name) = clean_optional_string(request.last_name) {
            update.insert("lastName", last_name);
        }

        let found = if update.is_empty() {
            // 갱신할 필드가 없어도 대상 존재 여부는 확인한다
            self.user_repo.find_by_id(user_id).await?.is_some()
        } else {
            self.user_repo.update_profile(user_id, update).await?
        };

        if !found {
            return Err(AppError::InvalidInput(
                "No user found to update".to_string(),
            ));
        }

        Ok(())
    }

    /// 프로바이더 가입 사전 검증
    ///
    /// 프로바이더 토큰을 검증하고, 해당 이메일로 이미 가입된 계정이 있으면
    /// 중복 가입으로 거부합니다.
    pub async fn verify_provider_signup(
        &self,
        token_id: &str,
        provider: Provider,
    ) -> Result<ProviderProfile, AppError> {
        if provider != Provider::Google {
            return Err(AppError::InvalidInput("No valid Input found".to_string()));
        }

        let profile = self.provider_verifier.verify_identity_token(token_id).await?;

        if let Some(existing) = self.user_repo.find_by_email(&profile.email).await? {
            return Err(AppError::InvalidInput(format!(
                "User is Already Registered with this email: {}",
                existing.email
            )));
        }

        Ok(profile)
    }

    /// 필터 조건으로 사용자 목록 조회
    ///
    /// 호출자가 전달한 필터 객체를 저장소 조회 조건으로 변환해 사용합니다.
    pub async fn list_users(
        &self,
        filter: Option<serde_json::Value>,
    ) -> Result<Vec<UserResponse>, AppError> {
        let filter_doc = match filter {
            Some(value) => mongodb::bson::to_document(&value)
                .map_err(|e| AppError::InvalidInput(format!("Invalid filter: {}", e)))?,
            None => doc! {},
        };

        let users = self.user_repo.list(filter_doc).await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// 서버 생성 임시 비밀번호
    ///
    /// 비밀번호 없는 가입 요청에 사용되는 영숫자 임의 문자열입니다.
    fn generate_random_password() -> String {
        let mut rng = rand::thread_rng();
        (0..GENERATED_PASSWORD_LENGTH)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let password = UserService::generate_random_password();

        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_passwords_differ() {
        let first = UserService::generate_random_password();
        let second = UserService::generate_random_password();

        assert_ne!(first, second);
    }
}
