use crate::provider::{AuthKey, DEFAULT_KEY_PREFIX};
use serde::Deserialize;

/// 카카오 REST API 인증 정보
#[derive(Debug, Deserialize)]
pub struct API {
    key: String,

    /// 헤더에 키와 함께 실릴 접두사, 설정하지 않으면 `KakaoAK `가 사용된다.
    prefix: Option<String>,
}

impl API {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_KEY_PREFIX)
    }

    pub fn auth_key(&self) -> AuthKey {
        AuthKey::with_prefix(self.prefix(), self.key.as_str())
    }
}
