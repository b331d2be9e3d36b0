use std::path::PathBuf;

use dmap_engine::errors::EngineError;
use dmap_io::{IoError, MetadataError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("DXF 파일을 찾을 수 없습니다: {}", .0.display())]
    MissingDrawing(PathBuf),
    #[error("메타데이터 파일을 찾을 수 없습니다: {}", .0.display())]
    MissingMetadata(PathBuf),
    #[error("이미지 폴더를 찾을 수 없습니다: {}", .0.display())]
    MissingImageFolder(PathBuf),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Document(#[from] IoError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("콘솔 출력 실패: {0}")]
    Console(#[from] std::io::Error),
}
