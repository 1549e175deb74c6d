pub mod user;

pub use user::{OtpRecord, Role, User};
