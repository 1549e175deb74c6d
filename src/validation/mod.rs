//! 요청 검증 모듈
//!
//! 선언적 스키마 정의(schema), 위반 메시지 포맷(messages),
//! 검증 엔진(validate)으로 구성됩니다. 라우트별 스키마 정의는
//! `crate::schemas` 모듈에 있습니다.

pub mod messages;
pub mod schema;
pub mod validate;

pub use messages::ConstraintKind;
pub use schema::{array, integer, number, object, string, FieldDoc, RequestSchema, Schema};
pub use validate::{
    validate_request, validate_section, SectionValues, ValidatedSections, Violation,
};
