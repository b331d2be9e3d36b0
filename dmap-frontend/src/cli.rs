use std::io::{self, Stdout, Write};
use std::path::Path;

use dmap_core::metadata::MetadataDocument;
use dmap_engine::report::{ImportReport, RecordOutcome, RecordReport};

const MISSING_FIELD: &str = "(없음)";

/// 작업자용 콘솔 출력. 진단 로그는 `tracing`이 따로 맡는다.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "=== DMAP 어노테이션 가져오기 ===")?;
        writeln!(self.out)
    }

    pub fn metadata_loading(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "메타데이터 로드: {}", path.display())
    }

    pub fn metadata_loaded(&mut self, metadata: &MetadataDocument) -> io::Result<()> {
        writeln!(
            self.out,
            "DXF 파일: {}",
            metadata.dxf_file.as_deref().unwrap_or(MISSING_FIELD)
        )?;
        writeln!(
            self.out,
            "마지막 수정: {}",
            metadata.last_modified.as_deref().unwrap_or(MISSING_FIELD)
        )
    }

    pub fn processing_started(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{count}개의 어노테이션을 처리합니다...")
    }

    pub fn record(&mut self, record: &RecordReport) -> io::Result<()> {
        match &record.outcome {
            RecordOutcome::ImagePlaced { image_name, memo } => {
                writeln!(self.out, "✓ 이미지 삽입: {image_name}")?;
                if let Some(memo) = memo {
                    writeln!(self.out, "  메모: {memo}")?;
                }
                Ok(())
            }
            RecordOutcome::ImageMissing { searched, .. } => {
                writeln!(self.out, "✗ 이미지 파일 없음: {}", searched.display())
            }
            RecordOutcome::ImageFailed { image_name, reason } => {
                writeln!(self.out, "✗ 이미지 삽입 실패 ({image_name}): {reason}")
            }
            RecordOutcome::TextPlaced { text } => {
                writeln!(self.out, "✓ 텍스트 삽입: {text}")
            }
            RecordOutcome::TextFailed { text, reason } => {
                writeln!(self.out, "✗ 텍스트 삽입 실패 ({text}): {reason}")
            }
            RecordOutcome::Duplicate { description } => {
                writeln!(self.out, "- 중복 건너뜀: {description}")
            }
            RecordOutcome::Ignored { .. } => Ok(()),
        }
    }

    pub fn finished(&mut self, report: &ImportReport, output: &Path) -> io::Result<()> {
        write!(
            self.out,
            "\n요약: 이미지 {}, 텍스트 {}, 대체 문구 {}, 실패 {}",
            report.placed_images(),
            report.placed_texts(),
            report.placeholders(),
            report.failures()
        )?;
        if report.duplicates() > 0 {
            write!(self.out, ", 중복 {}", report.duplicates())?;
        }
        writeln!(self.out)?;
        writeln!(self.out)?;
        writeln!(self.out, "완료! 저장됨: {}", output.display())?;
        writeln!(self.out)?;
        writeln!(self.out, "AutoCAD에서 '{}' 파일을 여세요.", output.display())?;
        self.out.flush()
    }
}
