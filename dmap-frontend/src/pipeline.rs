use std::io::Write;
use std::path::PathBuf;

use dmap_config::AppConfig;
use dmap_engine::locator::ImageLocator;
use dmap_engine::report::ImportReport;
use dmap_engine::{ImportOptions, insert_annotations};
use dmap_io::{DocumentLoader, DocumentSaver, DxfFacade, annotated_output_path, load_metadata};
use tracing::{debug, info};

use crate::cli::ConsoleReporter;
use crate::errors::FrontendError;

/// 한 번의 가져오기 실행에 필요한 입력.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub drawing: PathBuf,
    pub metadata: PathBuf,
    pub image_folder: PathBuf,
    pub options: ImportOptions,
}

impl ImportRequest {
    pub fn new(
        drawing: impl Into<PathBuf>,
        metadata: impl Into<PathBuf>,
        image_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            drawing: drawing.into(),
            metadata: metadata.into(),
            image_folder: image_folder.into(),
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug)]
pub struct ImportSummary {
    pub output_path: PathBuf,
    pub report: ImportReport,
}

/// 설정 파일 값과 명령줄 플래그를 합친다. 둘 중 하나라도 켜져 있으면 중복을 건너뛴다.
pub fn import_options(config: &AppConfig, skip_duplicates: bool) -> ImportOptions {
    ImportOptions {
        skip_duplicates: skip_duplicates || config.import.skip_duplicates,
    }
}

/// 도면 파일, 메타데이터 파일, 이미지 폴더 순으로 확인한다.
pub fn validate_inputs(request: &ImportRequest) -> Result<(), FrontendError> {
    if !request.drawing.is_file() {
        return Err(FrontendError::MissingDrawing(request.drawing.clone()));
    }
    if !request.metadata.is_file() {
        return Err(FrontendError::MissingMetadata(request.metadata.clone()));
    }
    if !request.image_folder.is_dir() {
        return Err(FrontendError::MissingImageFolder(
            request.image_folder.clone(),
        ));
    }
    Ok(())
}

/// 검증, 메타데이터 로드, 도면 열기, 삽입, 저장을 한 번에 수행한다.
///
/// 검증이나 로드 단계에서 실패하면 출력 파일은 만들어지지 않는다.
pub fn run_import<W: Write>(
    request: &ImportRequest,
    reporter: &mut ConsoleReporter<W>,
) -> Result<ImportSummary, FrontendError> {
    validate_inputs(request)?;

    reporter.metadata_loading(&request.metadata)?;
    let metadata = load_metadata(&request.metadata)?;
    reporter.metadata_loaded(&metadata)?;

    let facade = DxfFacade::new();
    let mut canvas = facade.load(&request.drawing)?;
    debug!(path = %request.drawing.display(), "도면 열기 완료");

    reporter.processing_started(metadata.record_count())?;
    let locator = ImageLocator::new(&request.image_folder);
    let report = insert_annotations(&mut canvas, &metadata, &locator, &request.options)?;
    for record in &report.records {
        reporter.record(record)?;
    }

    let output_path = annotated_output_path(&request.drawing);
    facade.save(&canvas, &output_path)?;
    info!(output = %output_path.display(), "주석 도면 저장");
    reporter.finished(&report, &output_path)?;

    Ok(ImportSummary {
        output_path,
        report,
    })
}

