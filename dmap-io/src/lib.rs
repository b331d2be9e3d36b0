use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

mod dxf_canvas;
mod metadata;

pub use dxf_canvas::DxfCanvas;
pub use metadata::{MetadataError, load_metadata};

const OUTPUT_SUFFIX: &str = "_annotated";
const DXF_EXTENSION: &str = "dxf";

#[derive(Debug, Error)]
pub enum IoError {
    #[error("파일 {path:?} 읽기 실패: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("파일 {path:?} 쓰기 실패: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("DXF 문서 {path:?} 해석 실패: {message}")]
    InvalidDocument { path: PathBuf, message: String },
    #[error("DXF 문서 {path:?} 직렬화 실패: {message}")]
    SerializeError { path: PathBuf, message: String },
}

pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<DxfCanvas, IoError>;
}

pub trait DocumentSaver {
    fn save(&self, document: &DxfCanvas, path: &Path) -> Result<(), IoError>;
}

#[derive(Debug, Default)]
pub struct DxfFacade;

impl DxfFacade {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for DxfFacade {
    fn load(&self, path: &Path) -> Result<DxfCanvas, IoError> {
        let file = File::open(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let drawing =
            dxf::Drawing::load(&mut reader).map_err(|err| IoError::InvalidDocument {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        info!(
            path = %path.display(),
            version = ?drawing.header.version,
            "DXF 문서 로드 완료"
        );
        Ok(DxfCanvas::from_drawing(drawing))
    }
}

impl DocumentSaver for DxfFacade {
    fn save(&self, document: &DxfCanvas, path: &Path) -> Result<(), IoError> {
        let file = File::create(path).map_err(|source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        document
            .drawing()
            .save(&mut writer)
            .map_err(|err| IoError::SerializeError {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        writer.flush().map_err(|source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "DXF 문서 저장 완료");
        Ok(())
    }
}

/// 입력 도면 옆에 만들 출력 경로를 계산한다.
///
/// 확장자가 `dxf`(대소문자 무관)이면 그 앞에 `_annotated`를 넣고,
/// 그렇지 않으면 파일 이름 전체 뒤에 `_annotated.dxf`를 붙인다. 어느 쪽이든 입력 파일과 겹치지 않는다.
pub fn annotated_output_path(path: &Path) -> PathBuf {
    let has_dxf_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DXF_EXTENSION));
    let base = if has_dxf_extension {
        path.file_stem()
    } else {
        path.file_name()
    };
    let base = base
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{base}{OUTPUT_SUFFIX}.{DXF_EXTENSION}");
    match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
