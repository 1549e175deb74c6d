//! 계정/인증 서비스 백엔드
//!
//! Rust 기반의 사용자 계정 및 인증 관리 서비스입니다.
//! JWT 토큰 기반 인증, Google 소셜 로그인, 이메일 OTP 기반 비밀번호
//! 재설정, 그리고 선언적 스키마 기반 요청 검증을 제공합니다.
//!
//! # Features
//!
//! - **사용자 관리**: 회원 가입, 프로필 수정, 관리자용 목록 조회
//! - **JWT 인증**: RS256 서명 기반 상태 없는 인증
//! - **소셜 로그인**: Google ID 토큰 검증 기반 로그인/가입 검증
//! - **OTP 재설정**: 이메일로 발송되는 6자리 일회용 코드
//! - **요청 검증**: 스키마 선언 한 곳에서 검증과 API 문서를 함께 파생
//! - **MongoDB**: 사용자 데이터 영구 저장
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← 명시적 라우트 테이블 + 미들웨어 체인
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Middlewares   │ ← 요청 검증 / 인증 가드
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직 (로그인, OTP, 토큰, 사용자)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     MongoDB     │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use account_service_backend::core::AppContext;
//! use account_service_backend::db::Database;
//!
//! let database = std::sync::Arc::new(Database::connect().await?);
//! let context = AppContext::initialize(database).await?;
//!
//! let outcome = context.login_service.login("9999999999", "secret12").await?;
//! ```

pub mod config;
pub mod constants;
pub mod core;
pub mod db;
pub mod docs;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod schemas;
pub mod services;
pub mod utils;
pub mod validation;
