use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use dmap_config::{AppConfig, ConfigError};
use dmap_frontend::pipeline::ImportRequest;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// 웹앱에서 만든 사진/텍스트 어노테이션을 DXF 도면에 삽입한다.
#[derive(Parser, Debug)]
#[command(name = "dmap-import", version, long_about = None)]
struct Cli {
    /// 어노테이션을 넣을 DXF 파일
    drawing: PathBuf,

    /// 웹앱이 저장한 메타데이터 JSON
    metadata: PathBuf,

    /// 사진 파일이 있는 폴더
    image_folder: PathBuf,

    /// 세 번째 이후의 위치 인수는 무시한다
    #[arg(hide = true)]
    extra: Vec<String>,

    /// 설정 파일 경로 (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 같은 위치의 같은 어노테이션이 이미 있으면 건너뛴다
    #[arg(long)]
    skip_duplicates: bool,
}

fn main() {
    let cli = parse_args();

    let loaded = load_configuration(cli.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config);
    if let Err(err) = &loaded {
        warn!(error = %err, "설정 로드 실패, 기본 설정 사용");
    }
    if !cli.extra.is_empty() {
        debug!(ignored = ?cli.extra, "추가 인수 무시");
    }

    let request = ImportRequest::new(cli.drawing, cli.metadata, cli.image_folder).with_options(
        dmap_frontend::import_options(&config, cli.skip_duplicates),
    );

    if let Err(err) = run(&request) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn run(request: &ImportRequest) -> anyhow::Result<()> {
    let summary = dmap_frontend::run_cli(request)?;
    info!(
        output = %summary.output_path.display(),
        records = summary.report.records.len(),
        failures = summary.report.failures(),
        "가져오기 종료"
    );
    Ok(())
}

fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            ErrorKind::MissingRequiredArgument => {
                print_usage();
                std::process::exit(1);
            }
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    }
}

fn print_usage() {
    eprintln!("사용법: dmap-import <DXF파일> <메타데이터JSON> <이미지폴더>");
    eprintln!();
    eprintln!("예시:");
    eprintln!("  dmap-import drawing.dxf drawing_metadata.json ./images/");
}

fn load_configuration(override_path: Option<&std::path::Path>) -> Result<AppConfig, ConfigError> {
    match override_path {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::discover(),
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // 이미 초기화된 경우는 무시
    let _ = subscriber.try_init();
}
