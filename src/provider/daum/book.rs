use crate::provider;
use crate::provider::daum::{PageableMeta, WebResult, MAX_PAGE, MAX_SIZE};
use crate::provider::error::{ClientError, RequestError};
use crate::provider::persist;
use crate::provider::{AuthKey, KAKAO_API_HOST};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use tracing::debug;

/// 다음 책 검색 API 경로
const BOOK_SEARCH_PATH: &'static str = "/v3/search/book";
const DEFAULT_PAGE: i32 = 1;
const DEFAULT_SIZE: i32 = 10;

/// 책 검색 결과 문서
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookResult {
    #[serde(flatten)]
    pub web: WebResult,
    /// ISBN10 또는 ISBN13, 둘 다 있을 경우 공백으로 구분된다.
    pub isbn: String,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub authors: Vec<String>,
    pub publisher: String,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub translators: Vec<String>,
    /// 정가
    pub price: i32,
    /// 판매가, 정상 판매가 아닐 경우 -1
    pub sale_price: i32,
    pub thumbnail: String,
    /// 판매 상태 (정상, 품절, 절판 등)
    pub status: String,
}

/// 책 검색 결과 한 페이지
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookSearchResult {
    pub meta: PageableMeta,
    pub documents: Vec<BookResult>,
}

impl Display for BookSearchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        persist::write_json(self, f)
    }
}

/// 여러 페이지에 걸친 책 검색 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookSearchResults(pub Vec<BookSearchResult>);

impl BookSearchResults {
    /// 모든 페이지의 문서를 순서대로 순회한다.
    pub fn documents(&self) -> impl Iterator<Item = &BookResult> {
        self.0.iter().flat_map(|page| page.documents.iter())
    }
}

impl Deref for BookSearchResults {
    type Target = Vec<BookSearchResult>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for BookSearchResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        persist::write_json(self, f)
    }
}

/// 결과 문서 정렬 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// 정확도순
    #[default]
    Accuracy,
    /// 발간일순
    Latest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Accuracy => "accuracy",
            SortOrder::Latest => "latest",
        }
    }
}

impl TryFrom<&str> for SortOrder {
    type Error = RequestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "accuracy" => Ok(SortOrder::Accuracy),
            "latest" => Ok(SortOrder::Latest),
            _ => Err(RequestError::InvalidParameter(format!(
                "sort order must be accuracy or latest: {}",
                value
            ))),
        }
    }
}

/// 검색 필드 제한
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Title,
    Isbn,
    Publisher,
    Person,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Title => "title",
            Target::Isbn => "isbn",
            Target::Publisher => "publisher",
            Target::Person => "person",
        }
    }
}

impl TryFrom<&str> for Target {
    type Error = RequestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "title" => Ok(Target::Title),
            "isbn" => Ok(Target::Isbn),
            "publisher" => Ok(Target::Publisher),
            "person" => Ok(Target::Person),
            _ => Err(RequestError::InvalidParameter(format!(
                "target must be one of title, isbn, publisher, person: {}",
                value
            ))),
        }
    }
}

/// 다음 책 검색 요청 빌더
///
/// 설정 값은 [`BookSearch::build`]에서 한번에 검증 되며, 검증을 통과하면
/// 페이지 단위로 결과를 가져오는 [`BookSearchIterator`]가 만들어진다.
///
/// 자세한 사항은 <https://developers.kakao.com/docs/latest/ko/daum-search/dev-guide#search-book> 참고
#[derive(Debug, Clone)]
pub struct BookSearch {
    query: String,
    auth: Option<AuthKey>,
    sort: SortOrder,
    page: i32,
    size: i32,
    target: Option<Target>,
    base_url: String,
}

impl BookSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            auth: None,
            sort: SortOrder::default(),
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            target: None,
            base_url: KAKAO_API_HOST.to_owned(),
        }
    }

    pub fn authorize_with(mut self, key: AuthKey) -> Self {
        self.auth = Some(key);
        self
    }

    pub fn sort_by(mut self, order: SortOrder) -> Self {
        self.sort = order;
        self
    }

    /// 결과 페이지 번호 (1 ~ 50)
    pub fn page(mut self, page: i32) -> Self {
        self.page = page;
        self
    }

    /// 한 페이지에 보여질 문서 수 (1 ~ 50)
    pub fn size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    pub fn filter(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    /// 검색 필드 제한을 해제한다.
    pub fn clear_filter(mut self) -> Self {
        self.target = None;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> Result<BookSearchIterator, RequestError> {
        let auth = provider::require_auth(self.auth)?;
        let query = provider::require_query(&self.query)?;

        if !(1..=MAX_PAGE).contains(&self.page) {
            return Err(RequestError::InvalidParameter(format!(
                "page must be between 1 and {}: {}",
                MAX_PAGE, self.page
            )));
        }
        if !(1..=MAX_SIZE).contains(&self.size) {
            return Err(RequestError::InvalidParameter(format!(
                "size must be between 1 and {}: {}",
                MAX_SIZE, self.size
            )));
        }

        Ok(BookSearchIterator {
            query,
            auth,
            sort: self.sort,
            size: self.size,
            target: self.target,
            base_url: self.base_url,
            page: self.page,
            end: false,
        })
    }
}

/// 책 검색 결과를 한 페이지씩 가져오는 지연 이터레이터
///
/// 서버가 마지막 페이지임을 알리거나 페이지 번호가 50을 넘으면 종료 상태가 되며,
/// 이후 호출은 네트워크 요청 없이 [`ClientError::EndOfPages`]를 반환한다.
#[derive(Debug)]
pub struct BookSearchIterator {
    query: String,
    auth: AuthKey,
    sort: SortOrder,
    size: i32,
    target: Option<Target>,
    base_url: String,
    page: i32,
    end: bool,
}

impl BookSearchIterator {
    /// 다음 호출에서 요청할 페이지 번호
    pub fn page(&self) -> i32 {
        self.page
    }

    pub fn is_end(&self) -> bool {
        self.end
    }

    /// 현재 페이지를 조회하고 커서를 다음 페이지로 옮긴다.
    pub fn next_page(&mut self) -> Result<BookSearchResult, ClientError> {
        if self.end {
            return Err(ClientError::EndOfPages);
        }

        let url = self.search_url()?;
        let client = reqwest::blocking::Client::new();
        let request = client.get(url);
        let result: BookSearchResult = provider::execute(&client, request, &self.auth)?;

        self.page += 1;
        self.end = result.meta.is_end || MAX_PAGE < self.page;

        debug!("책 검색 완료 => (QUERY: {}, DOCUMENTS: {}, END: {})", self.query, result.documents.len(), self.end);

        Ok(result)
    }

    /// 남은 모든 페이지를 조회한다. 중간에 실패하면 그때까지의 결과는 버려진다.
    pub fn collect_pages(&mut self) -> Result<BookSearchResults, ClientError> {
        let mut pages = Vec::new();
        loop {
            match self.next_page() {
                Ok(page) => pages.push(page),
                Err(ClientError::EndOfPages) => break Ok(BookSearchResults(pages)),
                Err(e) => break Err(e),
            }
        }
    }

    fn search_url(&self) -> Result<reqwest::Url, ClientError> {
        let mut url = provider::endpoint(&self.base_url, BOOK_SEARCH_PATH)?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("query", &self.query)
                .append_pair("sort", self.sort.as_str())
                .append_pair("page", &self.page.to_string())
                .append_pair("size", &self.size.to_string());
            if let Some(target) = self.target {
                pairs.append_pair("target", target.as_str());
            }
        }

        Ok(url)
    }
}

/// 실패한 요청은 한 번만 반환되고 이후 순회는 종료된다.
impl Iterator for BookSearchIterator {
    type Item = Result<BookSearchResult, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_page() {
            Ok(result) => Some(Ok(result)),
            Err(ClientError::EndOfPages) => None,
            Err(e) => {
                self.end = true;
                Some(Err(e))
            }
        }
    }
}
