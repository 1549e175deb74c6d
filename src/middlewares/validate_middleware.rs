//! 요청 검증 미들웨어
//!
//! 라우트에 선언된 스키마 집합으로 요청 섹션(body/params/query)을 검증하고,
//! 통과한 경우 강제 변환이 끝난 값을 Request Extensions에 저장합니다.
//! 다운스트림 핸들러는 `ValidatedBody` 추출기로 정리된 본문을 읽습니다.

use std::future::{ready, Ready};
use std::ops::Deref;
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, Result,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::middlewares::validate_inner::ValidateRequestService;
use crate::validation::schema::RequestSchema;
use crate::validation::validate::ValidatedSections;

/// 요청 검증 미들웨어
///
/// 라우트 등록 시 해당 라우트의 스키마 집합을 받아 생성됩니다.
pub struct ValidateRequest {
    /// 라우트의 요청 스키마 집합
    schema: &'static RequestSchema,
}

impl ValidateRequest {
    /// 스키마 집합으로 검증 미들웨어 생성
    pub fn new(schema: &'static RequestSchema) -> Self {
        Self { schema }
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for ValidateRequest
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ValidateRequestService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ValidateRequestService {
            service: Rc::new(service),
            schema: self.schema,
        }))
    }
}

/// 검증이 끝난 본문을 역직렬화하는 추출기
///
/// 검증 미들웨어가 저장한 강제 변환/정리 완료 본문을 타입으로 변환합니다.
/// 검증 미들웨어 없이 사용하면 내부 오류로 실패합니다.
pub struct ValidatedBody<T>(pub T);

impl<T> ValidatedBody<T> {
    /// 내부 값을 꺼냅니다.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedBody<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned> FromRequest for ValidatedBody<T> {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let body = req
            .extensions()
            .get::<ValidatedSections>()
            .map(|sections| sections.body.clone());

        let result = match body {
            Some(body) => serde_json::from_value::<T>(body)
                .map(ValidatedBody)
                .map_err(|e| {
                    AppError::InternalError(format!("검증된 본문 역직렬화 실패: {}", e)).into()
                }),
            None => Err(AppError::InternalError(
                "검증 미들웨어 없이 ValidatedBody가 사용되었습니다".to_string(),
            )
            .into()),
        };

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dto::users::request::LoginRequest;
    use crate::schemas;
    use actix_web::{test, web, App, HttpResponse};
    use serde_json::{json, Value};

    async fn echo_login(body: ValidatedBody<LoginRequest>) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "status": 1,
            "username": body.username,
        }))
    }

    async fn echo_filter(
        body: ValidatedBody<crate::domain::dto::users::request::ListUsersRequest>,
    ) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "status": 1,
            "filter": body.filter,
        }))
    }

    #[actix_web::test]
    async fn test_invalid_body_is_rejected_with_contract_shape() {
        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(ValidateRequest::new(&schemas::login::LOGIN))
                    .route(web::post().to(echo_login)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "password": "abc" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], json!(0));
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid input:"));

        let details = body["details"].as_array().unwrap();
        let paths: Vec<&str> = details
            .iter()
            .map(|d| d["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"username"));
        assert!(paths.contains(&"password"));
    }

    #[actix_web::test]
    async fn test_valid_body_reaches_handler_with_stripped_fields() {
        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(ValidateRequest::new(&schemas::login::LOGIN))
                    .route(web::post().to(echo_login)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({
                "username": "9999999999",
                "password": "secret12",
                "unknownField": "stripped"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["username"], json!("9999999999"));
    }

    #[actix_web::test]
    async fn test_json_string_filter_is_coerced_before_handler() {
        let app = test::init_service(
            App::new().service(
                web::resource("/list-users/{userId}")
                    .wrap(ValidateRequest::new(&schemas::users::LIST_USERS))
                    .route(web::post().to(echo_filter)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/list-users/507f1f77bcf86cd799439011")
            .set_json(json!({ "filter": "{\"active\": true}" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["filter"], json!({ "active": true }));
    }

    #[actix_web::test]
    async fn test_path_param_violation_is_reported() {
        let app = test::init_service(
            App::new().service(
                web::resource("/list-users/{userId}")
                    .wrap(ValidateRequest::new(&schemas::users::LIST_USERS))
                    .route(web::post().to(echo_filter)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/list-users/not-an-object-id")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["details"][0]["description"],
            json!("userId not in valid format")
        );
    }

    #[actix_web::test]
    async fn test_empty_body_reports_required_fields() {
        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(ValidateRequest::new(&schemas::login::LOGIN))
                    .route(web::post().to(echo_login)),
            ),
        )
        .await;

        let req = test::TestRequest::post().uri("/login").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("username is required"));
        assert!(message.contains("password is required"));
    }
}
