//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 백엔드 서비스를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! 모든 실패 응답은 `{status: 0, message, details?}` 형태로 직렬화됩니다.
//! 검증 실패는 위반 항목별 `{path, description}` 목록을 details에 담아
//! 내려보내고, 서버 내부 오류는 상세 내용을 로그로만 남기고 클라이언트에는
//! 일반화된 메시지만 노출합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn set_password(number: i64) -> Result<(), AppError> {
//!     let user = user_repo.find_by_number(number).await?
//!         .ok_or_else(|| AppError::InvalidInput("Invalid user.".to_string()))?;
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// 검증 실패 상세 항목
///
/// 위반된 제약 조건 하나에 대한 필드 경로와 사람이 읽을 수 있는 설명입니다.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorDetail {
    /// 위반이 발생한 필드 경로 (예: `password`, `photo.mimetype`)
    pub path: String,
    /// 위반 내용 설명
    pub description: String,
}

/// 애플리케이션 전역 에러 타입
///
/// 백엔드 서비스에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 요청 형식 검증 에러 (400 Bad Request, details 포함)
    #[error("{message}")]
    ValidationError {
        message: String,
        details: Vec<ErrorDetail>,
    },

    /// 비즈니스 규칙 위반 에러 (400 Bad Request)
    ///
    /// 잘못된 자격 증명, 만료/불일치 OTP, 중복 레코드, 대상 없음 등
    /// 입력 자체는 형식상 유효하지만 처리할 수 없는 경우입니다.
    #[error("{0}")]
    InvalidInput(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("{0}")]
    AuthenticationError(String),

    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 외부 서비스 에러 (500 Internal Server Error)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 검증 실패 에러를 생성합니다.
    ///
    /// 메시지는 위반 설명들을 `, `로 이어붙인
    /// `Invalid input: ... .` 형태로 구성됩니다.
    pub fn validation(details: Vec<ErrorDetail>) -> Self {
        let joined = details
            .iter()
            .map(|d| d.description.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        AppError::ValidationError {
            message: format!("Invalid input: {}.", joined),
            details,
        }
    }

    /// 서버 내부 오류 여부 (상세 내용을 클라이언트에 숨겨야 하는 경우)
    fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseError(_)
                | AppError::ExternalServiceError(_)
                | AppError::InternalError(_)
        )
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와
    /// `{status: 0, message, details?}` JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        let body = match self {
            AppError::ValidationError { message, details } => serde_json::json!({
                "status": 0,
                "message": message,
                "details": details,
            }),
            other if other.is_internal() => {
                // 내부 오류 상세는 로그로만 남긴다
                log::error!("내부 오류 발생: {}", other);
                serde_json::json!({
                    "status": 0,
                    "message": "Internal Server Error",
                })
            }
            other => serde_json::json!({
                "status": 0,
                "message": other.to_string(),
            }),
        };

        actix_web::HttpResponse::build(status).json(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::validation(vec![ErrorDetail {
            path: "password".to_string(),
            description: "password is required".to_string(),
        }]);
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_message_format() {
        let error = AppError::validation(vec![
            ErrorDetail {
                path: "username".to_string(),
                description: "username is required".to_string(),
            },
            ErrorDetail {
                path: "password".to_string(),
                description: "password is required".to_string(),
            },
        ]);

        assert_eq!(
            error.to_string(),
            "Invalid input: username is required, password is required."
        );
    }

    #[test]
    fn test_invalid_input_response() {
        let error = AppError::InvalidInput("No such user found".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Unauthorized access".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("Something went wrong".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
