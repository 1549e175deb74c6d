//! ValidateRequest 검증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use futures_util::StreamExt;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::validation::schema::RequestSchema;
use crate::validation::validate::{validate_request, SectionValues};

/// 실제 검증을 수행하는 서비스
pub struct ValidateRequestService<S> {
    pub service: Rc<S>,
    pub schema: &'static RequestSchema,
}

impl<S, B> Service<ServiceRequest> for ValidateRequestService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let schema = self.schema;

        Box::pin(async move {
            // 섹션별 원본 값 수집
            let body = if schema.body.is_some() {
                read_json_body(&mut req).await?
            } else {
                Value::Null
            };
            let params = collect_path_params(&req);
            let query = collect_query(&req);

            let sections = SectionValues {
                body,
                params,
                query,
                // 파일 업로드 섹션은 업로드 미들웨어가 채운 경우에만 존재
                files: Value::Null,
            };

            match validate_request(schema, sections) {
                Ok(validated) => {
                    // 강제 변환/정리된 값으로 섹션을 대체
                    req.extensions_mut().insert(validated);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(violations) => {
                    log::warn!(
                        "요청 검증 실패: {} {} ({}건)",
                        req.method(),
                        req.path(),
                        violations.len()
                    );

                    let error = AppError::validation(
                        violations.iter().map(|v| v.to_detail()).collect(),
                    );
                    let response = error.error_response();
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    Ok(res)
                }
            }
        })
    }
}

/// 요청 본문을 JSON 값으로 읽습니다.
///
/// 빈 본문과 JSON이 아닌 본문은 Null로 취급되어 필수 필드 위반으로
/// 보고됩니다.
async fn read_json_body(req: &mut ServiceRequest) -> Result<Value, Error> {
    let mut payload = req.take_payload();
    let mut bytes = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(Error::from)?;
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        log::debug!("본문 JSON 파싱 실패: {}", e);
        Value::Null
    }))
}

/// 경로 파라미터를 객체 값으로 수집합니다.
fn collect_path_params(req: &ServiceRequest) -> Value {
    let map: Map<String, Value> = req
        .match_info()
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    Value::Object(map)
}

/// 쿼리 스트링을 객체 값으로 수집합니다.
fn collect_query(req: &ServiceRequest) -> Value {
    let parsed =
        web::Query::<std::collections::HashMap<String, String>>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();

    let map: Map<String, Value> = parsed
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();

    Value::Object(map)
}
