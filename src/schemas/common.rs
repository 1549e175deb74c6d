//! 공용 파일 업로드 스키마 정의
//!
//! 업로드된 파일 메타데이터(name, mimetype, size)를 검증하는 스키마입니다.
//! files 섹션은 메타데이터 외 필드를 유지해야 하므로 제거 없이 검증됩니다.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::schema::{number, string, Schema};

static IMAGE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\.png|\.jpg|\.jpeg)$").expect("invalid image name regex"));

static IMAGE_MIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^image/").expect("invalid image mime regex"));

/// 이미지 파일 메타데이터 스키마 (최대 600KB)
pub fn image_schema() -> Schema {
    Schema::new()
        .field(string("name").pattern(&IMAGE_NAME_REGEX).required())
        .field(string("mimetype").pattern(&IMAGE_MIME_REGEX).required())
        .field(number("size").max(600000).required())
}
