//! 전역 상수 및 패턴 정의
//!
//! 요청 검증과 라우팅에서 공통으로 사용하는 정규식과 외부 인증 프로바이더
//! 식별자를 정의합니다.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// MongoDB ObjectId 형식 (24자리 16진수)
pub static OBJECT_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{24}$").expect("invalid ObjectId regex"));

/// 외부 인증 프로바이더 식별자
///
/// 소셜 로그인 요청에서 어떤 프로바이더의 토큰인지 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_regex() {
        assert!(OBJECT_ID_REGEX.is_match("507f1f77bcf86cd799439011"));
        assert!(!OBJECT_ID_REGEX.is_match("507F1F77BCF86CD799439011"));
        assert!(!OBJECT_ID_REGEX.is_match("not-an-id"));
        assert!(!OBJECT_ID_REGEX.is_match("507f1f77bcf86cd79943901"));
    }
}
