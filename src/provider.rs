pub mod daum;
pub mod error;
pub mod persist;
pub mod translation;
pub mod vision;

use crate::provider::error::{ClientError, RequestError};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONNECTION};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

/// 카카오 REST API 기본 호스트
pub const KAKAO_API_HOST: &'static str = "https://dapi.kakao.com";

/// REST API 키 앞에 붙는 기본 접두사
pub const DEFAULT_KEY_PREFIX: &'static str = "KakaoAK ";

/// `Authorization` 헤더로 전송될 인증 키
///
/// 접두사는 생성 시점에 정해지며 키 값은 호출자가 전달한 그대로 사용된다.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthKey {
    prefix: String,
    key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX, key)
    }

    pub fn with_prefix(prefix: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key: key.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// 헤더에 실릴 최종 값 (`{prefix}{key}`)
    pub fn header_value(&self) -> String {
        format!("{}{}", self.prefix, self.key)
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthKey")
            .field("prefix", &self.prefix)
            .field("key", &"***")
            .finish()
    }
}

/// GET/POST 양쪽을 지원하는 API의 요청 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl TryFrom<&str> for Method {
    type Error = RequestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(RequestError::InvalidParameter(format!(
                "method must be GET or POST: {}",
                value
            ))),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// 기본 주소와 API 경로를 이어 요청 URL을 만든다.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<reqwest::Url, ClientError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    reqwest::Url::parse(&raw).map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", raw, e)))
}

pub(crate) fn require_auth(auth: Option<AuthKey>) -> Result<AuthKey, RequestError> {
    match auth {
        Some(key) if !key.key().trim().is_empty() => Ok(key),
        _ => Err(RequestError::MissingRequiredParameter("authorization key".to_string())),
    }
}

pub(crate) fn require_query(query: &str) -> Result<String, RequestError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(RequestError::InvalidParameter("query must not be blank".to_string()));
    }
    Ok(query.to_owned())
}

/// 인증 헤더를 붙여 요청을 1회 전송하고 JSON 응답을 `T`로 디코딩한다.
pub(crate) fn execute<T: DeserializeOwned>(
    client: &Client,
    request: RequestBuilder,
    auth: &AuthKey,
) -> Result<T, ClientError> {
    let request = request
        .header(AUTHORIZATION, auth.header_value())
        .header(CONNECTION, "close")
        .build()
        .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

    debug!("{} {}", request.method(), request.url());

    let response = client.execute(request)
        .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

    let status = response.status();
    let text = response.text()
        .map_err(|e| ClientError::ResponseTextExtractionFailed(e.to_string()))?;

    if !status.is_success() {
        warn!("API 요청이 실패 하였습니다. => {} {}", status, text);
        return Err(ClientError::ErrorStatus {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str::<T>(&text)
        .map_err(|e| ClientError::ResponseParseFailed(e.to_string()))
}
