//! API 미들웨어.

pub mod api_key;

pub use api_key::{api_key_middleware, ApiKeyState, API_KEY_HEADER};
