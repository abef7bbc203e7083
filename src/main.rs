use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kakao_developers_client::config;
use kakao_developers_client::{
    AuthKey, BookSearch, BookSearchResults, DetectLanguage, FaceDetect, Language, Method, SaveAsJson, SortOrder, Target, Translate,
};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "kakao", version, about = "카카오 REST API 클라이언트")]
struct Cli {
    /// 설정 파일 대신 사용할 REST API 키
    #[arg(long, env = "KAKAO_REST_API_KEY", global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 다음 책 검색
    Book(BookArgs),
    /// 텍스트의 언어 감지
    Detect(DetectArgs),
    /// 문장 번역
    Translate(TranslateArgs),
    /// 이미지 얼굴 검출
    Face(FaceArgs),
}

#[derive(Args)]
struct BookArgs {
    query: String,
    #[arg(long, default_value = "accuracy")]
    sort: String,
    #[arg(long, default_value_t = 1)]
    page: i32,
    #[arg(long, default_value_t = 10)]
    size: i32,
    /// title, isbn, publisher, person
    #[arg(long)]
    target: Option<String>,
    /// 가져올 최대 페이지 수
    #[arg(long, default_value_t = 1)]
    pages: usize,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct DetectArgs {
    query: String,
    #[arg(long, default_value = "GET")]
    method: String,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct TranslateArgs {
    query: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long, default_value = "GET")]
    method: String,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct FaceArgs {
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    url: Option<String>,
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long, default_value_t = 0.7)]
    threshold: f64,
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();

    let app_config = config::load_config();
    let _guard = match app_config.as_ref().ok().and_then(|c| c.logger()) {
        Some(logger) => Some(config::log::set_global_logging_config(logger)?),
        None => {
            config::log::set_stderr_logging("INFO")?;
            None
        }
    };

    let key = match (&cli.key, &app_config) {
        (Some(key), Ok(c)) => AuthKey::with_prefix(c.api().prefix(), key.as_str()),
        (Some(key), Err(_)) => AuthKey::new(key.as_str()),
        (None, Ok(c)) => c.api().auth_key(),
        (None, Err(e)) => anyhow::bail!("REST API 키가 설정 되어 있지 않습니다. ({})", e),
    };

    match cli.command {
        Command::Book(args) => run_book(key, args),
        Command::Detect(args) => run_detect(key, args),
        Command::Translate(args) => run_translate(key, args),
        Command::Face(args) => run_face(key, args),
    }
}

fn run_book(key: AuthKey, args: BookArgs) -> Result<()> {
    let mut search = BookSearch::new(args.query)
        .authorize_with(key)
        .sort_by(SortOrder::try_from(args.sort.as_str())?)
        .page(args.page)
        .size(args.size);
    if let Some(target) = args.target {
        search = search.filter(Target::try_from(target.as_str())?);
    }

    let pages = search.build()?
        .take(args.pages)
        .collect::<Result<Vec<_>, _>>()
        .context("책 검색에 실패 하였습니다.")?;
    info!("책 검색 완료 => {} 페이지", pages.len());

    output(&BookSearchResults(pages), args.out)
}

fn run_detect(key: AuthKey, args: DetectArgs) -> Result<()> {
    let result = DetectLanguage::new(args.query)
        .authorize_with(key)
        .build()?
        .request_by(Method::try_from(args.method.as_str())?)
        .context("언어 감지에 실패 하였습니다.")?;

    output(&result, args.out)
}

fn run_translate(key: AuthKey, args: TranslateArgs) -> Result<()> {
    let result = Translate::new(args.query)
        .source_lang(Language::try_from(args.from.as_str())?)
        .target_lang(Language::try_from(args.to.as_str())?)
        .authorize_with(key)
        .build()?
        .request_by(Method::try_from(args.method.as_str())?)
        .context("번역에 실패 하였습니다.")?;

    output(&result, args.out)
}

fn run_face(key: AuthKey, args: FaceArgs) -> Result<()> {
    let mut detect = FaceDetect::new().authorize_with(key).threshold_at(args.threshold);
    if let Some(url) = args.url {
        detect = detect.with_url(url);
    }
    if let Some(file) = args.file {
        detect = detect.with_file(file);
    }

    let result = detect.build()?
        .collect()
        .context("얼굴 검출에 실패 하였습니다.")?;
    info!("얼굴 검출 완료 => {}개", result.result.faces.len());

    output(&result, args.out)
}

fn output<T: Serialize + Display>(result: &T, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            result.save_as(&path)?;
            info!("결과를 저장 하였습니다. => {}", path.display());
        }
        None => println!("{}", result),
    }
    Ok(())
}
