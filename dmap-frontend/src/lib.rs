pub mod cli;
pub mod errors;
pub mod pipeline;

use cli::ConsoleReporter;
use errors::FrontendError;
use pipeline::{ImportRequest, ImportSummary, run_import};
use tracing::info;

pub use pipeline::{import_options, validate_inputs};

/// 표준 출력에 진행 상황을 찍으며 가져오기를 실행한다.
pub fn run_cli(request: &ImportRequest) -> Result<ImportSummary, FrontendError> {
    info!(
        drawing = %request.drawing.display(),
        metadata = %request.metadata.display(),
        images = %request.image_folder.display(),
        "DMAP 어노테이션 가져오기 시작"
    );
    let mut reporter = ConsoleReporter::stdout();
    reporter.banner()?;
    run_import(request, &mut reporter)
}
