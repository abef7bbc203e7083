use crate::provider;
use crate::provider::error::{ClientError, RequestError};
use crate::provider::persist;
use crate::provider::translation::LanguageInfo;
use crate::provider::{AuthKey, Method, KAKAO_API_HOST};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// 언어 감지 API 경로
const DETECT_PATH: &'static str = "/v3/translation/language/detect";

/// 언어 감지 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectResult {
    pub language_info: Vec<LanguageInfo>,
}

impl DetectResult {
    /// 신뢰도가 가장 높은 감지 결과
    pub fn best(&self) -> Option<&LanguageInfo> {
        self.language_info
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

impl Display for DetectResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        persist::write_json(self, f)
    }
}

/// 입력된 텍스트의 언어를 감지하는 요청 빌더
#[derive(Debug, Clone)]
pub struct DetectLanguage {
    query: String,
    auth: Option<AuthKey>,
    base_url: String,
}

impl DetectLanguage {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            auth: None,
            base_url: KAKAO_API_HOST.to_owned(),
        }
    }

    pub fn authorize_with(mut self, key: AuthKey) -> Self {
        self.auth = Some(key);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> Result<DetectLanguageRequest, RequestError> {
        Ok(DetectLanguageRequest {
            auth: provider::require_auth(self.auth)?,
            query: provider::require_query(&self.query)?,
            base_url: self.base_url,
        })
    }
}

#[derive(Debug)]
pub struct DetectLanguageRequest {
    query: String,
    auth: AuthKey,
    base_url: String,
}

impl DetectLanguageRequest {
    /// GET은 쿼리 스트링으로, POST는 폼 본문으로 텍스트를 전송한다.
    pub fn request_by(&self, method: Method) -> Result<DetectResult, ClientError> {
        let mut url = provider::endpoint(&self.base_url, DETECT_PATH)?;
        let client = reqwest::blocking::Client::new();

        let request = match method {
            Method::Get => {
                url.query_pairs_mut().append_pair("query", &self.query);
                client.get(url)
            }
            Method::Post => client.post(url).form(&[("query", self.query.as_str())]),
        };

        provider::execute(&client, request, &self.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::persist::SaveAsJson;
    use mockito::{Matcher, Server};

    const BODY: &str = r#"{"language_info":[{"code":"kr","name":"Korean","confidence":0.92},{"code":"jp","name":"Japanese","confidence":0.03}]}"#;

    fn request(base_url: String) -> DetectLanguageRequest {
        DetectLanguage::new("안녕하세요")
            .authorize_with(AuthKey::new("test-key"))
            .base_url(base_url)
            .build()
            .unwrap()
    }

    #[test]
    fn detect_by_get() {
        let mut server = Server::new();
        let mock = server.mock("GET", DETECT_PATH)
            .match_header("authorization", "KakaoAK test-key")
            .match_query(Matcher::UrlEncoded("query".into(), "안녕하세요".into()))
            .with_body(BODY)
            .create();

        let result = request(server.url()).request_by(Method::Get).unwrap();

        mock.assert();
        assert_eq!(result.language_info.len(), 2);
        assert_eq!(result.best().unwrap().code, "kr");
    }

    #[test]
    fn detect_by_post() {
        let mut server = Server::new();
        let mock = server.mock("POST", DETECT_PATH)
            .match_header("authorization", "KakaoAK test-key")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::UrlEncoded("query".into(), "안녕하세요".into()))
            .with_body(BODY)
            .create();

        let result = request(server.url()).request_by(Method::Post).unwrap();

        mock.assert();
        assert_eq!(result.best().unwrap().name, "Korean");
    }

    #[test]
    fn detect_result_saves_as_json() {
        let result: DetectResult = serde_json::from_str(BODY).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detect_test_by_get.json");

        result.save_as(&path).unwrap();

        let parsed: DetectResult = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn build_requires_key_and_query() {
        assert!(DetectLanguage::new("안녕").build().is_err());
        assert!(DetectLanguage::new("").authorize_with(AuthKey::new("k")).build().is_err());
    }
}
