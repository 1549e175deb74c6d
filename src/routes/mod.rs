//! API 라우트 설정 모듈
//!
//! (메서드, 경로)를 핸들러와 미들웨어 체인에 매핑하는 명시적 라우트
//! 테이블입니다. 각 보호 라우트는 (검증, 인증) 가드를 순서대로 거칩니다.
//!
//! # Route Table
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | POST | /api/login | none |
//! | POST | /api/generate/otp | none |
//! | POST | /api/verify/otp | none |
//! | POST | /api/set/password | none |
//! | POST | /api/change/password/{userId} | bearer, self only |
//! | POST | /api/provider/login | none |
//! | POST | /api/user/register | none |
//! | PUT  | /api/user/update/{userId} | bearer, self only |
//! | POST | /api/user/verify | none |
//! | POST | /api/user/list-users/{userId} | bearer, admin |
//!
//! 이외에 헬스체크(`GET /health`)와 스키마에서 파생된 API 문서
//! (`GET /api/docs`)를 제공합니다.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::docs;
use crate::domain::entities::users::Role;
use crate::handlers;
use crate::middlewares::{AuthGuard, ValidateRequest};
use crate::schemas::{login, users};

/// 모든 라우트를 설정합니다
///
/// # Examples
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new().configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            // 로그인/비밀번호 플로우
            .service(
                web::resource("/login")
                    .wrap(ValidateRequest::new(&login::LOGIN))
                    .route(web::post().to(handlers::login::login)),
            )
            .service(
                web::resource("/generate/otp")
                    .wrap(ValidateRequest::new(&login::FORGOT_PASSWORD))
                    .route(web::post().to(handlers::login::generate_otp)),
            )
            .service(
                web::resource("/verify/otp")
                    .wrap(ValidateRequest::new(&login::VERIFY_OTP))
                    .route(web::post().to(handlers::login::verify_otp)),
            )
            .service(
                web::resource("/set/password")
                    .wrap(ValidateRequest::new(&login::SET_PASSWORD))
                    .route(web::post().to(handlers::login::set_password)),
            )
            .service(
                // 가드 실행 순서: 인증 → 검증
                web::resource("/change/password/{userId}")
                    .wrap(ValidateRequest::new(&login::CHANGE_PASSWORD))
                    .wrap(AuthGuard::resource_owner())
                    .route(web::post().to(handlers::login::change_password)),
            )
            .service(
                web::resource("/provider/login")
                    .wrap(ValidateRequest::new(&login::PROVIDER_LOGIN))
                    .route(web::post().to(handlers::login::provider_login)),
            )
            // 사용자 관리
            .service(
                web::scope("/user")
                    .service(
                        web::resource("/register")
                            .wrap(ValidateRequest::new(&users::REGISTER_USER))
                            .route(web::post().to(handlers::users::register_user)),
                    )
                    .service(
                        web::resource("/update/{userId}")
                            .wrap(ValidateRequest::new(&users::UPDATE_USER))
                            .wrap(AuthGuard::resource_owner())
                            .route(web::put().to(handlers::users::update_user)),
                    )
                    .service(
                        web::resource("/verify")
                            .wrap(ValidateRequest::new(&users::VERIFY_PROVIDER_SIGNUP))
                            .route(web::post().to(handlers::users::verify_user)),
                    )
                    .service(
                        web::resource("/list-users/{userId}")
                            .wrap(ValidateRequest::new(&users::LIST_USERS))
                            .wrap(AuthGuard::with_roles(&[Role::Admin]))
                            .route(web::post().to(handlers::users::list_users)),
                    ),
            )
            // 스키마에서 파생된 API 문서
            .service(web::resource("/docs").route(web::get().to(api_docs))),
    );
}

/// API 문서 엔드포인트
///
/// 검증 스키마와 라우트 테이블에서 파생된 문서를 반환합니다.
async fn api_docs() -> HttpResponse {
    HttpResponse::Ok().json(docs::api_documentation())
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// 로드밸런서나 모니터링 시스템에서 서비스 상태를 확인하는 데 사용됩니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "account_service_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "auth": "JWT (RS256)",
            "password_reset": "Email OTP"
        }
    }))
}
