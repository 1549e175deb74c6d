//! HTTP 요청/응답 처리 계층

pub mod login;
pub mod users;
