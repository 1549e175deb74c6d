//! # Application Context - 명시적 의존성 주입
//!
//! 애플리케이션을 구성하는 리포지토리와 서비스들을 기동 시점에 한 번
//! 생성자 주입으로 조립하는 모듈입니다. 리플렉션 기반 컨테이너 없이
//! 의존성 그래프가 코드에 그대로 드러납니다.
//!
//! ```text
//! Database ──► UserRepository ──┬─► OtpService ◄── MailDispatcher
//!                               │        │
//!                               │        ▼
//!                               ├─► LoginService ◄── TokenService, ProviderVerifier
//!                               └─► UserService  ◄── ProviderVerifier
//! ```
//!
//! 조립된 컨텍스트는 `web::Data`로 핸들러와 미들웨어에 공유됩니다.

use std::sync::Arc;

use crate::db::Database;
use crate::repositories::users::UserRepository;
use crate::services::auth::{
    GoogleAuthService, LoginService, OtpService, ProviderVerifier, TokenService,
};
use crate::services::mail::{MailDispatcher, MailgunMailer};
use crate::services::users::UserService;

/// 조립이 끝난 애플리케이션 의존성 묶음
pub struct AppContext {
    pub user_repo: Arc<UserRepository>,
    pub token_service: Arc<TokenService>,
    pub login_service: Arc<LoginService>,
    pub user_service: Arc<UserService>,
}

impl AppContext {
    /// 운영 구성으로 컨텍스트를 초기화합니다.
    ///
    /// 토큰 키 로딩 실패는 기동 실패로 이어지며, 사용자 컬렉션의
    /// 유니크 인덱스가 이 시점에 생성됩니다.
    pub async fn initialize(db: Arc<Database>) -> Result<Self, Box<dyn std::error::Error>> {
        let mailer: Arc<dyn MailDispatcher> = Arc::new(MailgunMailer::new());
        let provider_verifier: Arc<dyn ProviderVerifier> = Arc::new(GoogleAuthService::new());
        let token_service = Arc::new(TokenService::from_env()?);

        let context = Self::assemble(db, token_service, mailer, provider_verifier);

        context.user_repo.create_indexes().await?;

        Ok(context)
    }

    /// 주어진 구성 요소로 컨텍스트를 조립합니다.
    ///
    /// 테스트에서는 메일 발송기와 프로바이더 검증기를 스텁으로 대체해
    /// 호출합니다. 인덱스 생성 등 I/O는 수행하지 않습니다.
    pub fn assemble(
        db: Arc<Database>,
        token_service: Arc<TokenService>,
        mailer: Arc<dyn MailDispatcher>,
        provider_verifier: Arc<dyn ProviderVerifier>,
    ) -> Self {
        let user_repo = Arc::new(UserRepository::new(db));

        let otp_service = Arc::new(OtpService::new(user_repo.clone(), mailer));

        let login_service = Arc::new(LoginService::new(
            user_repo.clone(),
            token_service.clone(),
            otp_service,
            provider_verifier.clone(),
        ));

        let user_service = Arc::new(UserService::new(user_repo.clone(), provider_verifier));

        Self {
            user_repo,
            token_service,
            login_service,
            user_service,
        }
    }
}
