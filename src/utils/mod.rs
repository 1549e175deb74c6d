//! 공통 유틸리티 모듈

pub mod device;
pub mod string_utils;
