pub mod detect;
pub mod translate;

use crate::provider::error::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// 번역 API가 지원하는 언어 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Korean,
    English,
    Japanese,
    Chinese,
    Vietnamese,
    Indonesian,
    Arabic,
    Bengali,
    German,
    Spanish,
    French,
    Hindi,
    Italian,
    Malay,
    Dutch,
    Portuguese,
    Russian,
    Thai,
    Turkish,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "kr",
            Language::English => "en",
            Language::Japanese => "jp",
            Language::Chinese => "cn",
            Language::Vietnamese => "vi",
            Language::Indonesian => "id",
            Language::Arabic => "ar",
            Language::Bengali => "bn",
            Language::German => "de",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Hindi => "hi",
            Language::Italian => "it",
            Language::Malay => "ms",
            Language::Dutch => "nl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Thai => "th",
            Language::Turkish => "tr",
        }
    }
}

impl TryFrom<&str> for Language {
    type Error = RequestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "kr" => Ok(Language::Korean),
            "en" => Ok(Language::English),
            "jp" => Ok(Language::Japanese),
            "cn" => Ok(Language::Chinese),
            "vi" => Ok(Language::Vietnamese),
            "id" => Ok(Language::Indonesian),
            "ar" => Ok(Language::Arabic),
            "bn" => Ok(Language::Bengali),
            "de" => Ok(Language::German),
            "es" => Ok(Language::Spanish),
            "fr" => Ok(Language::French),
            "hi" => Ok(Language::Hindi),
            "it" => Ok(Language::Italian),
            "ms" => Ok(Language::Malay),
            "nl" => Ok(Language::Dutch),
            "pt" => Ok(Language::Portuguese),
            "ru" => Ok(Language::Russian),
            "th" => Ok(Language::Thai),
            "tr" => Ok(Language::Turkish),
            _ => Err(RequestError::InvalidParameter(format!("unsupported language code: {}", value))),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 언어 감지 결과 항목
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// 언어 코드 (kr, en, ...)
    pub code: String,
    pub name: String,
    /// 0 ~ 1.0 사이의 신뢰도
    pub confidence: f64,
}

impl LanguageInfo {
    /// 감지된 언어 코드가 번역 API에서 사용할 수 있는 코드라면 변환한다.
    pub fn language(&self) -> Option<Language> {
        Language::try_from(self.code.as_str()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_round_trip() {
        for code in ["kr", "en", "jp", "cn", "tr"] {
            assert_eq!(Language::try_from(code).unwrap().code(), code);
        }
        assert!(Language::try_from("ko").is_err());
    }

    #[test]
    fn detected_language_converts_when_supported() {
        let info = LanguageInfo { code: "kr".into(), name: "Korean".into(), confidence: 1.0 };
        assert_eq!(info.language(), Some(Language::Korean));

        let unknown = LanguageInfo { code: "xx".into(), ..Default::default() };
        assert_eq!(unknown.language(), None);
    }
}
