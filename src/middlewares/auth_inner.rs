//! AuthGuard 인증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::domain::entities::users::Role;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::auth::TokenService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthGuardService<S> {
    pub service: Rc<S>,
    pub required_roles: Vec<Role>,
    pub match_resource_owner: bool,
}

impl<S, B> Service<ServiceRequest> for AuthGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let required_roles = self.required_roles.clone();
        let match_resource_owner = self.match_resource_owner;

        Box::pin(async move {
            match authenticate(&req, &required_roles, match_resource_owner) {
                Ok(user) => {
                    // 사용자 정보를 Request Extensions에 저장
                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                    req.extensions_mut().insert(user);

                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(message) => {
                    log::warn!("인증 실패: {} {} ({})", req.method(), req.path(), message);

                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "status": 0,
                        "message": message,
                    }));
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    Ok(res)
                }
            }
        })
    }
}

/// 요청의 Bearer 토큰을 검증하고 역할/소유권 제약을 적용합니다.
///
/// 실패 시 클라이언트에 노출할 메시지를 반환합니다.
fn authenticate(
    req: &ServiceRequest,
    required_roles: &[Role],
    match_resource_owner: bool,
) -> Result<AuthenticatedUser, String> {
    let token_service = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| "Unauthorized access".to_string())?;

    // Authorization 헤더에서 Bearer 토큰 추출
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    let token = token_service.extract_bearer_token(auth_header);

    if token.is_empty() {
        return Err("Unauthorized access".to_string());
    }

    // 서명/발급자/만료 검증
    let claims = match token_service.verify(token) {
        Ok(claims) => claims,
        Err(AppError::AuthenticationError(_)) => {
            return Err("Unauthorized access".to_string());
        }
        Err(e) => {
            log::error!("토큰 검증 중 내부 오류: {}", e);
            return Err("Unauthorized access".to_string());
        }
    };

    // 역할 검증
    if !required_roles.is_empty() && !required_roles.contains(&claims.role) {
        return Err(
            "Unauthorized access: This User does not have sufficient Permission".to_string(),
        );
    }

    // 리소스 소유권 검증
    if match_resource_owner {
        let path_user_id = req.match_info().get("userId").unwrap_or("");
        if claims.user_id != path_user_id {
            return Err("Invalid User access".to_string());
        }
    }

    Ok(AuthenticatedUser {
        user_id: claims.user_id,
        role: claims.role,
    })
}
