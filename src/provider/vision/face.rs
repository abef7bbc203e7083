use crate::provider;
use crate::provider::error::{ClientError, RequestError};
use crate::provider::persist;
use crate::provider::vision::{ImageSource, MAX_IMAGE_SIZE};
use crate::provider::{AuthKey, KAKAO_API_HOST};
use reqwest::blocking::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 얼굴 검출 API 경로
const FACE_DETECT_PATH: &'static str = "/v2/vision/face/detect";
const DEFAULT_THRESHOLD: f64 = 0.7;
const MIN_THRESHOLD: f64 = 0.1;
const MAX_THRESHOLD: f64 = 1.0;

/// 검출된 얼굴 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub facial_attributes: FacialAttributes,
    pub facial_points: FacialPoints,
    /// 얼굴일 확률
    pub score: f64,
    pub class_idx: i32,
    /// 얼굴 영역의 좌상단 좌표와 크기, 이미지 크기에 대한 비율 (0 ~ 1.0)
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// 추정 성별/나이
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacialAttributes {
    pub gender: Gender,
    pub age: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gender {
    pub male: f64,
    pub female: f64,
}

/// 부위별 특징점 좌표 목록, 각 좌표는 이미지 크기에 대한 비율 (0 ~ 1.0)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacialPoints {
    pub jaw: Vec<Vec<f64>>,
    pub right_eyebrow: Vec<Vec<f64>>,
    pub left_eyebrow: Vec<Vec<f64>>,
    pub nose: Vec<Vec<f64>>,
    pub right_eye: Vec<Vec<f64>>,
    pub left_eye: Vec<Vec<f64>>,
    pub lip: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceResult {
    pub width: i32,
    pub height: i32,
    pub faces: Vec<Face>,
}

/// 얼굴 검출 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceDetectResult {
    pub rid: String,
    pub result: FaceResult,
}

impl Display for FaceDetectResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        persist::write_json(self, f)
    }
}

/// 이미지에서 얼굴을 검출하는 요청 빌더
///
/// 이미지는 URL 또는 JPG/PNG 파일로 전달할 수 있으며 마지막에 지정한 소스가 사용된다.
/// 자세한 사항은 <https://developers.kakao.com/docs/latest/ko/vision/dev-guide#recog-face> 참고
#[derive(Debug, Clone)]
pub struct FaceDetect {
    source: Option<ImageSource>,
    threshold: f64,
    auth: Option<AuthKey>,
    base_url: String,
}

impl FaceDetect {
    pub fn new() -> Self {
        Self {
            source: None,
            threshold: DEFAULT_THRESHOLD,
            auth: None,
            base_url: KAKAO_API_HOST.to_owned(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(ImageSource::Url(url.into()));
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(ImageSource::File(path.into()));
        self
    }

    pub fn authorize_with(mut self, key: AuthKey) -> Self {
        self.auth = Some(key);
        self
    }

    /// 얼굴로 판단할 기준값 (0.1 ~ 1.0)
    ///
    /// 값이 너무 높으면 일부 얼굴이 검출되지 않고, 너무 낮으면 얼굴이 아닌 영역이 검출될 수 있다.
    pub fn threshold_at(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> Result<FaceDetectRequest, RequestError> {
        let auth = provider::require_auth(self.auth)?;
        let source = self.source.ok_or_else(||
            RequestError::MissingRequiredParameter("image url or image file".to_string()))?;

        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.threshold) {
            return Err(RequestError::InvalidParameter(format!(
                "threshold must be between {} and {}: {}",
                MIN_THRESHOLD, MAX_THRESHOLD, self.threshold
            )));
        }

        if let ImageSource::Url(url) = &source {
            if url.trim().is_empty() {
                return Err(RequestError::InvalidParameter("image url must not be blank".to_string()));
            }
        }

        Ok(FaceDetectRequest {
            source,
            threshold: self.threshold,
            auth,
            base_url: self.base_url,
        })
    }
}

impl Default for FaceDetect {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct FaceDetectRequest {
    source: ImageSource,
    threshold: f64,
    auth: AuthKey,
    base_url: String,
}

impl FaceDetectRequest {
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 얼굴 검출을 요청한다. 파일은 크기를 먼저 확인한 뒤 업로드 된다.
    pub fn collect(&self) -> Result<FaceDetectResult, ClientError> {
        let mut url = provider::endpoint(&self.base_url, FACE_DETECT_PATH)?;
        let client = reqwest::blocking::Client::new();
        let threshold = format!("{:.6}", self.threshold);

        let request = match &self.source {
            ImageSource::Url(image_url) => {
                url.query_pairs_mut()
                    .append_pair("threshold", &threshold)
                    .append_pair("image_url", image_url);
                client.post(url)
            }
            ImageSource::File(path) => {
                let read_failed = |e: std::io::Error| ClientError::FileReadFailed(format!("{}: {}", path.display(), e));
                let file = File::open(path).map_err(read_failed)?;
                let size = file.metadata().map_err(read_failed)?.len();
                if MAX_IMAGE_SIZE < size {
                    return Err(ClientError::FileTooLarge { size, limit: MAX_IMAGE_SIZE });
                }

                debug!("이미지 파일을 업로드 합니다. => {} ({} bytes)", path.display(), size);

                // 확인한 크기만큼만 전송한다.
                let file_name = path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                let part = Part::reader_with_length(file.take(size), size)
                    .file_name(file_name)
                    .mime_str(image_mime(path))
                    .map_err(|e| ClientError::FileReadFailed(format!("{}: {}", path.display(), e)))?;
                let form = Form::new()
                    .text("threshold", threshold)
                    .part("image", part);
                client.post(url).multipart(form)
            }
        };

        provider::execute(&client, request, &self.auth)
    }
}

fn image_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::persist::SaveAsJson;
    use mockito::{Matcher, Server};
    use std::fs;
    use std::io::Write;

    const BODY: &str = r#"{
        "rid": "Q0-3d9e0d2b",
        "result": {
            "width": 640,
            "height": 480,
            "faces": [{
                "facial_attributes": { "gender": { "male": 0.91, "female": 0.09 }, "age": 31.5 },
                "facial_points": {
                    "jaw": [[0.31, 0.42], [0.32, 0.47]],
                    "right_eyebrow": [[0.35, 0.36]],
                    "left_eyebrow": [[0.45, 0.36]],
                    "nose": [[0.40, 0.45]],
                    "right_eye": [[0.36, 0.39]],
                    "left_eye": [[0.44, 0.39]],
                    "lip": [[0.38, 0.52], [0.42, 0.52]]
                },
                "score": 0.98,
                "class_idx": 0,
                "x": 0.3, "y": 0.3, "w": 0.2, "h": 0.3,
                "pitch": 1.2, "yaw": -3.4, "roll": 0.5
            }]
        }
    }"#;

    fn detect(base_url: String) -> FaceDetect {
        FaceDetect::new()
            .authorize_with(AuthKey::new("test-key"))
            .base_url(base_url)
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        for threshold in [0.0, 0.09, 1.01, f64::NAN] {
            let result = FaceDetect::new()
                .authorize_with(AuthKey::new("k"))
                .with_url("https://example.com/a.jpg")
                .threshold_at(threshold)
                .build();
            assert!(matches!(result, Err(RequestError::InvalidParameter(_))), "threshold {}", threshold);
        }
    }

    #[test]
    fn build_requires_image_source() {
        let result = FaceDetect::new().authorize_with(AuthKey::new("k")).build();
        assert!(matches!(result, Err(RequestError::MissingRequiredParameter(_))));
    }

    #[test]
    fn last_source_wins() {
        let request = FaceDetect::new()
            .authorize_with(AuthKey::new("k"))
            .with_url("https://example.com/a.jpg")
            .with_file("face.png")
            .build()
            .unwrap();
        assert_eq!(request.source(), &ImageSource::File(PathBuf::from("face.png")));
        assert_eq!(request.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn detect_by_url() {
        let mut server = Server::new();
        let mock = server.mock("POST", FACE_DETECT_PATH)
            .match_header("authorization", "KakaoAK test-key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("threshold".into(), "0.500000".into()),
                Matcher::UrlEncoded("image_url".into(), "https://example.com/a.jpg".into()),
            ]))
            .with_body(BODY)
            .create();

        let result = detect(server.url())
            .with_url("https://example.com/a.jpg")
            .threshold_at(0.5)
            .build()
            .unwrap()
            .collect()
            .unwrap();

        mock.assert();
        assert_eq!(result.result.faces.len(), 1);
        assert_eq!(result.result.faces[0].facial_points.lip.len(), 2);
        assert!(result.result.faces[0].facial_attributes.gender.male > 0.9);
    }

    #[test]
    fn detect_by_file_uploads_multipart() {
        let mut server = Server::new();
        let mock = server.mock("POST", FACE_DETECT_PATH)
            .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("name=\"threshold\"".to_string()),
                Matcher::Regex("name=\"image\"; filename=\"face.jpg\"".to_string()),
                Matcher::Regex("(?i)content-type: image/jpeg".to_string()),
                Matcher::Regex("not really a jpeg".to_string()),
            ]))
            .with_body(BODY)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.jpg");
        fs::write(&path, b"not really a jpeg").unwrap();

        let result = detect(server.url()).with_file(&path).build().unwrap().collect().unwrap();

        mock.assert();
        assert_eq!(result.rid, "Q0-3d9e0d2b");
    }

    #[test]
    fn oversized_file_fails_before_upload() {
        let mut server = Server::new();
        let mock = server.mock("POST", FACE_DETECT_PATH)
            .match_query(Matcher::Any)
            .expect(0)
            .create();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; (MAX_IMAGE_SIZE + 1) as usize]).unwrap();
        file.flush().unwrap();

        let err = detect(server.url()).with_file(file.path()).build().unwrap().collect().unwrap_err();

        mock.assert();
        assert_eq!(err, ClientError::FileTooLarge { size: MAX_IMAGE_SIZE + 1, limit: MAX_IMAGE_SIZE });
    }

    #[test]
    fn image_mime_follows_extension() {
        assert_eq!(image_mime(Path::new("a.PNG")), "image/png");
        assert_eq!(image_mime(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a")), "application/octet-stream");
    }

    #[test]
    fn missing_file_is_reported() {
        let request = detect("http://127.0.0.1:9".to_string())
            .with_file("/definitely/not/here.png")
            .build()
            .unwrap();
        assert!(matches!(request.collect(), Err(ClientError::FileReadFailed(_))));
    }

    #[test]
    fn face_result_round_trips_through_file() {
        let result: FaceDetectResult = serde_json::from_str(BODY).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.json");

        result.save_as(&path).unwrap();

        let parsed: FaceDetectResult = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn full_precision_scores_survive_json() {
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };

        let mut scores = vec![0.9856906946328695, 0.1 + 0.2, 1.0 / 3.0];
        scores.extend((0..20_000).map(|_| next()));

        for score in scores {
            let face = Face {
                score,
                x: score / 7.0,
                facial_points: FacialPoints { jaw: vec![vec![score, 1.0 - score]], ..Default::default() },
                ..Default::default()
            };
            let result = FaceDetectResult {
                rid: "rid".to_string(),
                result: FaceResult { width: 1, height: 1, faces: vec![face] },
            };

            let parsed: FaceDetectResult = serde_json::from_str(&result.to_json_pretty().unwrap()).unwrap();
            assert_eq!(parsed, result, "score {:?}", score);
        }
    }
}
