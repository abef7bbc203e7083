use crate::provider::error::ClientError;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// 결과 구조체를 들여쓰기된 JSON으로 변환하거나 파일로 저장한다.
pub trait SaveAsJson: Serialize {
    fn to_json_pretty(&self) -> Result<String, ClientError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClientError::SaveFailed(e.to_string()))
    }

    /// `path`에 결과를 JSON 파일로 저장한다. 기존 파일은 덮어쓴다.
    fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<(), ClientError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json)
            .map_err(|e| ClientError::SaveFailed(format!("{}: {}", path.display(), e)))
    }
}

impl<T: Serialize> SaveAsJson for T {}

/// `Display` 구현에서 공통으로 사용하는 JSON 출력
pub(crate) fn write_json<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}
