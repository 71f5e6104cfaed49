mod auth;

pub use auth::{require_api_key, ClientApiKey, API_KEY_HEADER};
