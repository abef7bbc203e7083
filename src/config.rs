mod api;
pub mod log;

pub use crate::config::api::API;

use serde::Deserialize;
use std::env;

/// 환경 변수로 설정을 덮어쓸 때 사용하는 접두사 (`KAKAO__API__KEY` 등)
const ENV_PREFIX: &'static str = "KAKAO";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    api: API,
    logger: Option<log::Config>,
}

impl AppConfig {
    pub fn api(&self) -> &API {
        &self.api
    }

    pub fn logger(&self) -> Option<&log::Config> {
        self.logger.as_ref()
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// `config/{RUN_MODE}.json` 파일과 `KAKAO__` 접두사의 환경 변수를 읽어 설정을 만든다.
/// 설정 파일은 없어도 되며 같은 키는 환경 변수가 우선한다.
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    let config = config::Config::builder()
        .add_source(config::File::with_name(&format!("config/{}.json", env)).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    config.try_deserialize()
}
