pub mod face;

/// 업로드 가능한 이미지 파일의 최대 크기 (2MB)
pub const MAX_IMAGE_SIZE: u64 = 2 * 1024 * 1024;

/// 비전 API에 전달할 이미지 소스
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// 공개된 이미지 URL
    Url(String),
    /// multipart로 업로드 할 로컬 JPG/PNG 파일
    File(std::path::PathBuf),
}
