//! 선언적 요청 검증 스키마
//!
//! 라우트별 요청 섹션(body/params/query/files)의 기대 형태를 필드 단위로
//! 기술하는 불변 스키마 구조체입니다. 스키마는 정의 이후 변경되지 않으며,
//! 검증 엔진과 API 문서 생성기가 동일한 스키마를 공유합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use once_cell::sync::Lazy;
//! use crate::validation::schema::{number, string, RequestSchema, Schema};
//!
//! static LOGIN: Lazy<RequestSchema> = Lazy::new(|| {
//!     RequestSchema::new().body(
//!         Schema::new()
//!             .field(string("username").required())
//!             .field(string("password").min(6).max(16).required()),
//!     )
//! });
//! ```

use regex::Regex;

/// 필드의 타입과 타입별 제약 조건
#[derive(Debug)]
pub enum FieldKind {
    /// 문자열 (길이/이메일/패턴 제약)
    Str {
        min: Option<usize>,
        max: Option<usize>,
        email: bool,
        pattern: Option<&'static Regex>,
    },
    /// 숫자 (범위/정수 제약, 숫자 형태의 문자열은 강제 변환됨)
    Num {
        min: Option<f64>,
        max: Option<f64>,
        integer: bool,
    },
    /// 객체 (JSON 객체 형태의 문자열은 강제 변환됨, 중첩 스키마 선택 가능)
    Obj { schema: Option<Box<Schema>> },
    /// 배열 (JSON 배열 형태의 문자열은 강제 변환됨)
    Arr,
}

/// 검증 대상 필드 하나의 선언
#[derive(Debug)]
pub struct Field {
    pub(crate) name: &'static str,
    pub(crate) label: &'static str,
    pub(crate) required: bool,
    pub(crate) allow_empty: bool,
    pub(crate) kind: FieldKind,
}

impl Field {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label: name,
            required: false,
            allow_empty: false,
            kind,
        }
    }

    /// 필수 필드로 지정
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// 빈 문자열 값을 허용
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// 에러 메시지에 사용할 라벨 지정 (기본값은 필드 이름)
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// 하한 지정 (문자열은 최소 길이, 숫자는 최소값)
    pub fn min(mut self, limit: i64) -> Self {
        match &mut self.kind {
            FieldKind::Str { min, .. } => *min = Some(limit as usize),
            FieldKind::Num { min, .. } => *min = Some(limit as f64),
            _ => {}
        }
        self
    }

    /// 상한 지정 (문자열은 최대 길이, 숫자는 최대값)
    pub fn max(mut self, limit: i64) -> Self {
        match &mut self.kind {
            FieldKind::Str { max, .. } => *max = Some(limit as usize),
            FieldKind::Num { max, .. } => *max = Some(limit as f64),
            _ => {}
        }
        self
    }

    /// 이메일 형식 검증 활성화 (문자열 전용)
    pub fn email(mut self) -> Self {
        if let FieldKind::Str { email, .. } = &mut self.kind {
            *email = true;
        }
        self
    }

    /// 정규식 패턴 검증 지정 (문자열 전용)
    pub fn pattern(mut self, regex: &'static Regex) -> Self {
        if let FieldKind::Str { pattern, .. } = &mut self.kind {
            *pattern = Some(regex);
        }
        self
    }

    /// 중첩 객체 스키마 지정 (객체 전용)
    pub fn schema(mut self, nested: Schema) -> Self {
        if let FieldKind::Obj { schema } = &mut self.kind {
            *schema = Some(Box::new(nested));
        }
        self
    }

    /// 문서 생성용 타입 이름
    pub(crate) fn kind_name(&self) -> &'static str {
        match self.kind {
            FieldKind::Str { .. } => "string",
            FieldKind::Num { .. } => "number",
            FieldKind::Obj { .. } => "object",
            FieldKind::Arr => "array",
        }
    }

    /// 문서 생성용 제약 조건 요약
    pub(crate) fn constraint_summary(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.kind {
            FieldKind::Str {
                min,
                max,
                email,
                pattern,
            } => {
                if let Some(n) = min {
                    out.push(format!("min length {}", n));
                }
                if let Some(n) = max {
                    out.push(format!("max length {}", n));
                }
                if *email {
                    out.push("email".to_string());
                }
                if let Some(re) = pattern {
                    out.push(format!("pattern {}", re.as_str()));
                }
            }
            FieldKind::Num { min, max, integer } => {
                if let Some(n) = min {
                    out.push(format!("min {}", n));
                }
                if let Some(n) = max {
                    out.push(format!("max {}", n));
                }
                if *integer {
                    out.push("integer".to_string());
                }
            }
            _ => {}
        }
        if self.allow_empty {
            out.push("empty allowed".to_string());
        }
        out
    }
}

/// 문자열 필드 선언
pub fn string(name: &'static str) -> Field {
    Field::new(
        name,
        FieldKind::Str {
            min: None,
            max: None,
            email: false,
            pattern: None,
        },
    )
}

/// 숫자 필드 선언
pub fn number(name: &'static str) -> Field {
    Field::new(
        name,
        FieldKind::Num {
            min: None,
            max: None,
            integer: false,
        },
    )
}

/// 정수 필드 선언
pub fn integer(name: &'static str) -> Field {
    Field::new(
        name,
        FieldKind::Num {
            min: None,
            max: None,
            integer: true,
        },
    )
}

/// 객체 필드 선언
pub fn object(name: &'static str) -> Field {
    Field::new(name, FieldKind::Obj { schema: None })
}

/// 배열 필드 선언
pub fn array(name: &'static str) -> Field {
    Field::new(name, FieldKind::Arr)
}

/// 요청 섹션 하나에 대한 객체 스키마
///
/// 알 수 없는 최상위 필드는 기본적으로 허용하되 출력에서 제거합니다.
/// `deny_unknown()`을 지정하면 허용하지 않고 위반으로 보고합니다.
#[derive(Debug, Default)]
pub struct Schema {
    pub(crate) fields: Vec<Field>,
    pub(crate) deny_unknown: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 추가
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// 알 수 없는 필드를 위반으로 보고
    pub fn deny_unknown(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    /// 문서 생성용 필드 요약 목록
    pub fn describe(&self) -> Vec<FieldDoc> {
        self.fields
            .iter()
            .map(|f| FieldDoc {
                name: f.name,
                kind: f.kind_name(),
                required: f.required,
                constraints: f.constraint_summary(),
            })
            .collect()
    }
}

/// 문서 생성용 필드 요약
#[derive(Debug, serde::Serialize)]
pub struct FieldDoc {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    pub constraints: Vec<String>,
}

/// 라우트 하나의 요청 섹션별 스키마 집합
///
/// 정의되지 않은 섹션은 검증 없이 통과합니다.
/// files 섹션은 파일 메타데이터 구조가 달라 출력에서 알 수 없는 필드를
/// 제거하지 않습니다.
#[derive(Debug, Default)]
pub struct RequestSchema {
    pub body: Option<Schema>,
    pub params: Option<Schema>,
    pub query: Option<Schema>,
    pub files: Option<Schema>,
}

impl RequestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, schema: Schema) -> Self {
        self.body = Some(schema);
        self
    }

    pub fn params(mut self, schema: Schema) -> Self {
        self.params = Some(schema);
        self
    }

    pub fn query(mut self, schema: Schema) -> Self {
        self.query = Some(schema);
        self
    }

    pub fn files(mut self, schema: Schema) -> Self {
        self.files = Some(schema);
        self
    }
}
