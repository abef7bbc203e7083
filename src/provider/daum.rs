pub mod book;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 다음 검색 API가 허용하는 최대 페이지 번호
pub const MAX_PAGE: i32 = 50;
/// 한 페이지에 담을 수 있는 최대 문서 수
pub const MAX_SIZE: i32 = 50;

/// 검색 결과의 페이징 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageableMeta {
    /// 검색된 문서 수
    pub total_count: i32,
    /// `total_count` 중 노출 가능한 문서 수
    pub pageable_count: i32,
    /// 현재 페이지가 마지막 페이지인지 여부
    pub is_end: bool,
}

/// 다음 검색 결과 문서들이 공통으로 가지는 필드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub contents: String,
    pub url: String,
    pub datetime: String,
}

impl WebResult {
    /// ISO 8601 형식의 `datetime`을 파싱한다. 비어있거나 형식이 다르면 `None`
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.datetime).ok()
    }
}
