//! 기기 식별자 파생
//!
//! OTP 검증에 성공한 클라이언트에게 돌려주는 불투명 식별자를
//! 클라이언트 IP와 User-Agent로부터 파생합니다. 보안 목적의 값이
//! 아니라 동일 기기 재식별용 힌트입니다.

use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

/// 클라이언트 IP와 User-Agent에서 기기 식별자를 파생합니다.
///
/// 동일한 입력은 항상 동일한 식별자를 생성합니다.
pub fn derive_device_id(ip: &str, user_agent: &str) -> String {
    let digest = Sha256::digest(format!("{}|{}", ip, user_agent).as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(digest)
}
