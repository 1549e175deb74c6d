//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 Bearer 토큰을 검증하고 역할과
//! 리소스 소유권 제약을 적용합니다. 실패 시 다운스트림으로 진행하지 않고
//! `{status: 0, message}` 형태의 401 응답으로 단락합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::entities::users::Role;
use crate::middlewares::auth_inner::AuthGuardService;

/// 라우트별 인증 가드
///
/// `required_roles`가 비어 있으면 유효한 토큰만 요구하고,
/// `match_resource_owner`가 켜져 있으면 토큰의 사용자 ID가 경로의
/// `userId` 파라미터와 일치해야 합니다.
pub struct AuthGuard {
    /// 접근에 필요한 역할 집합 (빈 집합 = 인증만 요구)
    required_roles: Vec<Role>,
    /// 토큰 주체와 경로 userId의 일치 요구 여부
    match_resource_owner: bool,
}

impl AuthGuard {
    /// 인증만 요구하는 가드 생성
    pub fn required() -> Self {
        Self {
            required_roles: Vec::new(),
            match_resource_owner: false,
        }
    }

    /// 특정 역할을 요구하는 가드 생성
    pub fn with_roles(roles: &[Role]) -> Self {
        Self {
            required_roles: roles.to_vec(),
            match_resource_owner: false,
        }
    }

    /// 본인 리소스 접근만 허용하는 가드 생성
    pub fn resource_owner() -> Self {
        Self {
            required_roles: Vec::new(),
            match_resource_owner: true,
        }
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardService {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
            match_resource_owner: self.match_resource_owner,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::TokenService;
    use actix_web::{test, web, App, HttpResponse};
    use rsa::pkcs1::EncodeRsaPrivateKey;
    use rsa::pkcs8::EncodePublicKey;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn token_service() -> Arc<TokenService> {
        let private_key =
            rsa::RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048).expect("RSA 키 생성 실패");
        let public_key = private_key.to_public_key();

        let private_pem = private_key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .unwrap()
            .to_string();
        let public_pem = public_key
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .unwrap();

        Arc::new(TokenService::from_pems(&private_pem, &public_pem, "myapp", 4).unwrap())
    }

    async fn protected() -> HttpResponse {
        HttpResponse::Ok().json(json!({ "status": 1 }))
    }

    fn admin_only_app(
        tokens: Arc<TokenService>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl actix_web::body::MessageBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::from(tokens)).service(
            web::resource("/admin/{userId}")
                .wrap(AuthGuard::with_roles(&[Role::Admin]))
                .route(web::post().to(protected)),
        )
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let app = test::init_service(admin_only_app(token_service())).await;

        let req = test::TestRequest::post()
            .uri("/admin/507f1f77bcf86cd799439011")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], json!(0));
        assert_eq!(body["message"], json!("Unauthorized access"));
    }

    #[actix_web::test]
    async fn test_user_role_is_rejected_for_admin_route() {
        let tokens = token_service();
        let token = tokens.issue("507f1f77bcf86cd799439011", Role::User).unwrap();
        let app = test::init_service(admin_only_app(tokens)).await;

        let req = test::TestRequest::post()
            .uri("/admin/507f1f77bcf86cd799439011")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            json!("Unauthorized access: This User does not have sufficient Permission")
        );
    }

    #[actix_web::test]
    async fn test_admin_role_is_allowed() {
        let tokens = token_service();
        let token = tokens
            .issue("507f1f77bcf86cd799439011", Role::Admin)
            .unwrap();
        let app = test::init_service(admin_only_app(tokens)).await;

        let req = test::TestRequest::post()
            .uri("/admin/507f1f77bcf86cd799439011")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_resource_owner_mismatch_is_rejected() {
        let tokens = token_service();
        let token = tokens.issue("507f1f77bcf86cd799439011", Role::User).unwrap();

        let app = test::init_service(
            App::new().app_data(web::Data::from(tokens)).service(
                web::resource("/self/{userId}")
                    .wrap(AuthGuard::resource_owner())
                    .route(web::post().to(protected)),
            ),
        )
        .await;

        // 토큰 주체와 다른 userId 접근
        let req = test::TestRequest::post()
            .uri("/self/ffffffffffffffffffffffff")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], json!("Invalid User access"));
    }

    #[actix_web::test]
    async fn test_resource_owner_match_is_allowed() {
        let tokens = token_service();
        let token = tokens.issue("507f1f77bcf86cd799439011", Role::User).unwrap();

        let app = test::init_service(
            App::new().app_data(web::Data::from(tokens)).service(
                web::resource("/self/{userId}")
                    .wrap(AuthGuard::resource_owner())
                    .route(web::post().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/self/507f1f77bcf86cd799439011")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_garbage_token_is_unauthorized() {
        let app = test::init_service(admin_only_app(token_service())).await;

        let req = test::TestRequest::post()
            .uri("/admin/507f1f77bcf86cd799439011")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], json!("Unauthorized access"));
    }
}
