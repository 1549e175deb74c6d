//! 애플리케이션 조립 모듈

pub mod context;

pub use context::AppContext;
