//! User HTTP Handlers
//!
//! 회원 가입, 프로필 수정, 프로바이더 가입 사전 검증, 사용자 목록 조회
//! 엔드포인트를 처리하는 핸들러 함수들입니다.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::constants::Provider;
use crate::core::AppContext;
use crate::domain::dto::users::request::{
    ListUsersRequest, ProviderTokenRequest, RegisterUserRequest, UpdateUserRequest,
};
use crate::errors::AppError;
use crate::middlewares::ValidatedBody;

/// 회원 가입 핸들러
///
/// # Endpoint
/// `POST /api/user/register`
pub async fn register_user(
    ctx: web::Data<AppContext>,
    body: ValidatedBody<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = ctx.user_service.register_user(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "response": user,
    })))
}

/// 사용자 프로필 수정 핸들러
///
/// 인증 가드가 본인 계정에 대한 수정만 허용합니다.
///
/// # Endpoint
/// `PUT /api/user/update/{userId}`
pub async fn update_user(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: ValidatedBody<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    ctx.user_service
        .update_user(&user_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "message": "User Updated",
        "response": {},
    })))
}

/// 프로바이더 가입 사전 검증 핸들러
///
/// 프로바이더 토큰을 검증하고 아직 가입되지 않은 이메일인지 확인합니다.
///
/// # Endpoint
/// `POST /api/user/verify`
pub async fn verify_user(
    ctx: web::Data<AppContext>,
    body: ValidatedBody<ProviderTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = ctx
        .user_service
        .verify_provider_signup(&body.token_id, Provider::Google)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "message": "User Verified",
        "response": {
            "name": profile.name,
            "email": profile.email,
        },
    })))
}

/// 사용자 목록 조회 핸들러
///
/// 관리자 역할 전용이며, 요청 본문의 필터 객체를 그대로 조회 조건으로
/// 사용합니다.
///
/// # Endpoint
/// `POST /api/user/list-users/{userId}`
pub async fn list_users(
    ctx: web::Data<AppContext>,
    body: ValidatedBody<ListUsersRequest>,
) -> Result<HttpResponse, AppError> {
    let users = ctx
        .user_service
        .list_users(body.into_inner().filter)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "message": "Users are fetched",
        "response": users,
    })))
}
