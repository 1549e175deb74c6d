//! Login HTTP Handlers
//!
//! 자격 증명 로그인, OTP 발급/검증, 비밀번호 설정/변경, 프로바이더 로그인
//! 엔드포인트를 처리하는 핸들러 함수들입니다.
//!
//! 모든 핸들러는 검증 미들웨어를 통과한 요청만 받으며, 성공 응답은
//! `{status: 1, ...}` 형태를 따릅니다.

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::constants::Provider;
use crate::core::AppContext;
use crate::domain::dto::users::request::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, ProviderTokenRequest,
    SetPasswordRequest, VerifyOtpRequest,
};
use crate::domain::dto::users::response::UserResponse;
use crate::errors::AppError;
use crate::middlewares::ValidatedBody;

/// 자격 증명 로그인 핸들러
///
/// # Endpoint
/// `POST /api/login`
pub async fn login(
    ctx: web::Data<AppContext>,
    body: ValidatedBody<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = ctx
        .login_service
        .login(&body.username, &body.password)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "response": {
            "user": UserResponse::from(outcome.user),
        },
        "accessToken": outcome.access_token,
        "username": body.username,
        "role": outcome.role,
    })))
}

/// 비밀번호 재설정 OTP 발급 핸들러
///
/// # Endpoint
/// `POST /api/generate/otp`
pub async fn generate_otp(
    ctx: web::Data<AppContext>,
    body: ValidatedBody<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let dispatch_id = ctx.login_service.forgot_password(body.number).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "message": "Forget Password Successful.",
        "sms": dispatch_id,
    })))
}

/// OTP 검증 핸들러
///
/// 성공 시 클라이언트 IP와 User-Agent에서 파생한 기기 식별자를
/// 반환합니다.
///
/// # Endpoint
/// `POST /api/verify/otp`
pub async fn verify_otp(
    req: HttpRequest,
    ctx: web::Data<AppContext>,
    body: ValidatedBody<VerifyOtpRequest>,
) -> Result<HttpResponse, AppError> {
    let ip = client_ip(&req);
    let user_agent = req
        .headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    let device_id = ctx
        .login_service
        .verify_otp(body.number, &body.otp, &ip, &user_agent)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "response": { "deviceId": device_id },
        "message": "OTP verified successfully.",
    })))
}

/// OTP 소비와 함께 비밀번호 설정 핸들러
///
/// # Endpoint
/// `POST /api/set/password`
pub async fn set_password(
    ctx: web::Data<AppContext>,
    body: ValidatedBody<SetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    ctx.login_service
        .set_password(&body.password, body.number, &body.otp)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "response": {},
        "message": "Password set successfully.",
    })))
}

/// 인증된 비밀번호 변경 핸들러
///
/// 인증 가드가 토큰 주체와 경로 userId의 일치를 보장합니다.
///
/// # Endpoint
/// `POST /api/change/password/{userId}`
pub async fn change_password(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: ValidatedBody<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    ctx.login_service
        .change_password(&user_id, &body.password, &body.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "response": {},
        "message": "New password has been set successfully!",
    })))
}

/// 프로바이더 로그인 핸들러
///
/// # Endpoint
/// `POST /api/provider/login`
pub async fn provider_login(
    ctx: web::Data<AppContext>,
    body: ValidatedBody<ProviderTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = ctx
        .login_service
        .login_with_provider(&body.token_id, Provider::Google)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 1,
        "response": {
            "user": UserResponse::from(outcome.user),
        },
        "accessToken": outcome.access_token,
        "role": outcome.role,
    })))
}

/// 클라이언트 IP 추출
///
/// 프록시를 거친 경우 X-Forwarded-For의 첫 항목을 사용합니다.
fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("")
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
