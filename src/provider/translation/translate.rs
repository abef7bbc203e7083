use crate::provider;
use crate::provider::error::{ClientError, RequestError};
use crate::provider::persist;
use crate::provider::translation::Language;
use crate::provider::{AuthKey, Method, KAKAO_API_HOST};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// 문장 번역 API 경로
const TRANSLATE_PATH: &'static str = "/v2/translation/translate";

/// 번역 결과, 원문의 문단 단위로 번역된 문장 목록이 담긴다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslateResult {
    pub translated_text: Vec<Vec<String>>,
}

impl TranslateResult {
    /// 문단은 줄바꿈, 문장은 공백으로 이어 붙인 번역문
    pub fn joined(&self) -> String {
        self.translated_text
            .iter()
            .map(|sentences| sentences.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Display for TranslateResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        persist::write_json(self, f)
    }
}

/// 문장 번역 요청 빌더
#[derive(Debug, Clone)]
pub struct Translate {
    query: String,
    src_lang: Option<Language>,
    target_lang: Option<Language>,
    auth: Option<AuthKey>,
    base_url: String,
}

impl Translate {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            src_lang: None,
            target_lang: None,
            auth: None,
            base_url: KAKAO_API_HOST.to_owned(),
        }
    }

    pub fn source_lang(mut self, lang: Language) -> Self {
        self.src_lang = Some(lang);
        self
    }

    pub fn target_lang(mut self, lang: Language) -> Self {
        self.target_lang = Some(lang);
        self
    }

    pub fn authorize_with(mut self, key: AuthKey) -> Self {
        self.auth = Some(key);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> Result<TranslateRequest, RequestError> {
        let auth = provider::require_auth(self.auth)?;
        let query = provider::require_query(&self.query)?;
        let src_lang = self.src_lang.ok_or_else(||
            RequestError::MissingRequiredParameter("source language".to_string()))?;
        let target_lang = self.target_lang.ok_or_else(||
            RequestError::MissingRequiredParameter("target language".to_string()))?;

        if src_lang == target_lang {
            return Err(RequestError::InvalidParameter(format!(
                "source and target language must differ: {}",
                src_lang
            )));
        }

        Ok(TranslateRequest {
            query,
            src_lang,
            target_lang,
            auth,
            base_url: self.base_url,
        })
    }
}

#[derive(Debug)]
pub struct TranslateRequest {
    query: String,
    src_lang: Language,
    target_lang: Language,
    auth: AuthKey,
    base_url: String,
}

impl TranslateRequest {
    pub fn request_by(&self, method: Method) -> Result<TranslateResult, ClientError> {
        let mut url = provider::endpoint(&self.base_url, TRANSLATE_PATH)?;
        let client = reqwest::blocking::Client::new();
        let params = [
            ("query", self.query.as_str()),
            ("src_lang", self.src_lang.code()),
            ("target_lang", self.target_lang.code()),
        ];

        let request = match method {
            Method::Get => {
                url.query_pairs_mut().extend_pairs(params.iter());
                client.get(url)
            }
            Method::Post => client.post(url).form(&params),
        };

        provider::execute(&client, request, &self.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const BODY: &str = r#"{"translated_text":[["Hello."],["Nice to meet you.","Bye."]]}"#;

    fn request(base_url: String) -> TranslateRequest {
        Translate::new("안녕하세요.\n반갑습니다. 안녕히 가세요.")
            .source_lang(Language::Korean)
            .target_lang(Language::English)
            .authorize_with(AuthKey::new("test-key"))
            .base_url(base_url)
            .build()
            .unwrap()
    }

    #[test]
    fn translate_by_get() {
        let mut server = Server::new();
        let mock = server.mock("GET", TRANSLATE_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("src_lang".into(), "kr".into()),
                Matcher::UrlEncoded("target_lang".into(), "en".into()),
            ]))
            .with_body(BODY)
            .create();

        let result = request(server.url()).request_by(Method::Get).unwrap();

        mock.assert();
        assert_eq!(result.joined(), "Hello.\nNice to meet you. Bye.");
    }

    #[test]
    fn translate_by_post() {
        let mut server = Server::new();
        let mock = server.mock("POST", TRANSLATE_PATH)
            .match_header("authorization", "KakaoAK test-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("src_lang".into(), "kr".into()),
                Matcher::UrlEncoded("target_lang".into(), "en".into()),
            ]))
            .with_body(BODY)
            .create();

        let result = request(server.url()).request_by(Method::Post).unwrap();

        mock.assert();
        assert_eq!(result.translated_text.len(), 2);
    }

    #[test]
    fn build_requires_both_languages() {
        let base = Translate::new("hello").authorize_with(AuthKey::new("k"));
        assert!(matches!(
            base.clone().target_lang(Language::Korean).build(),
            Err(RequestError::MissingRequiredParameter(_))
        ));
        assert!(matches!(
            base.clone().source_lang(Language::English).build(),
            Err(RequestError::MissingRequiredParameter(_))
        ));
        assert!(matches!(
            base.source_lang(Language::English).target_lang(Language::English).build(),
            Err(RequestError::InvalidParameter(_))
        ));
    }
}
