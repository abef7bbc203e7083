//! 카카오 REST API(다음 책 검색, 번역, 얼굴 검출)를 위한 동기식 클라이언트
//!
//! ```no_run
//! use kakao_developers_client::{AuthKey, BookSearch};
//!
//! let mut books = BookSearch::new("오브젝트")
//!     .authorize_with(AuthKey::new("REST_API_KEY"))
//!     .page(1)
//!     .size(5)
//!     .build()?;
//!
//! let page = books.next_page()?;
//! println!("{}", page);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod provider;

pub use provider::daum::book::{BookResult, BookSearch, BookSearchIterator, BookSearchResult, BookSearchResults, SortOrder, Target};
pub use provider::error::{ClientError, RequestError};
pub use provider::persist::SaveAsJson;
pub use provider::translation::detect::{DetectLanguage, DetectResult};
pub use provider::translation::translate::{Translate, TranslateResult};
pub use provider::translation::Language;
pub use provider::vision::face::{FaceDetect, FaceDetectResult};
pub use provider::{AuthKey, Method};
