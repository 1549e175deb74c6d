//! 로그인/비밀번호 관련 라우트의 요청 스키마 정의

use once_cell::sync::Lazy;

use crate::constants::OBJECT_ID_REGEX;
use crate::validation::schema::{number, string, RequestSchema, Schema};

/// POST /api/login
pub static LOGIN: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().body(
        Schema::new()
            .field(string("username").required())
            .field(string("password").min(6).max(16).required())
            .field(string("OTP").allow_empty())
            .field(string("deviceId").allow_empty())
            .field(number("latitude").min(0).max(90))
            .field(number("longitude").min(-180).max(180)),
    )
});

/// POST /api/generate/otp
pub static FORGOT_PASSWORD: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().body(
        Schema::new()
            .field(
                number("number")
                    .min(1000000000)
                    .max(9999999999)
                    .required(),
            )
            .field(number("retryCount").allow_empty()),
    )
});

/// POST /api/verify/otp
pub static VERIFY_OTP: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().body(
        Schema::new()
            .field(
                number("number")
                    .min(1000000000)
                    .max(9999999999)
                    .required(),
            )
            .field(string("OTP").required())
            .field(number("latitude").min(0).max(90))
            .field(number("longitude").min(-180).max(180))
            .field(string("deviceId").allow_empty()),
    )
});

/// POST /api/set/password
pub static SET_PASSWORD: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().body(
        Schema::new()
            .field(string("password").min(6).max(16).required())
            .field(
                number("number")
                    .min(1000000000)
                    .max(9999999999)
                    .required(),
            )
            .field(string("OTP").required()),
    )
});

/// POST /api/change/password/{userId}
pub static CHANGE_PASSWORD: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new()
        .params(
            Schema::new()
                .field(string("userId").pattern(&OBJECT_ID_REGEX).required()),
        )
        .body(
            Schema::new()
                .field(string("password").min(6).max(16).required())
                .field(string("newPassword").min(6).max(16).required()),
        )
});

/// POST /api/provider/login
pub static PROVIDER_LOGIN: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().body(Schema::new().field(string("tokenId").required()))
});
