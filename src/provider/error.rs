use thiserror::Error;

/// 요청을 만드는 과정에서 발생하는 설정 에러
///
/// 빌더의 `build()` 단계에서만 반환되며 네트워크 요청은 일어나지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// 필수 매개변수가 누락됨
    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(String),

    /// 유효하지 않은 매개변수
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// API 호출 및 결과 저장 중 발생하는 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("failed to read response body: {0}")]
    ResponseTextExtractionFailed(String),

    /// 2xx 이외의 응답 코드, 응답 본문은 그대로 보관한다.
    #[error("server responded with {status}: {body}")]
    ErrorStatus { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    ResponseParseFailed(String),

    /// 업로드 파일이 허용 크기를 넘음
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("failed to read file: {0}")]
    FileReadFailed(String),

    #[error("failed to save result: {0}")]
    SaveFailed(String),

    /// 더 이상 조회할 페이지가 없음
    #[error("no more pages")]
    EndOfPages,
}

impl ClientError {
    pub fn is_end_of_pages(&self) -> bool {
        matches!(self, ClientError::EndOfPages)
    }
}
