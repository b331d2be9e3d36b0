use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use dmap_core::metadata::MetadataDocument;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("메타데이터 파일 {path:?} 읽기 실패: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("메타데이터 파일 {path:?} 형식 오류: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// UTF-8 JSON 메타데이터를 스트림으로 읽어 문서로 변환한다.
pub fn load_metadata(path: &Path) -> Result<MetadataDocument, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source: serde_json::Error| MetadataError::Parse {
        path: path.to_path_buf(),
        source,
    };
    // 최상위는 객체여야 한다. 구조체 역직렬화는 배열도 위치 순으로 받아들이므로 먼저 맵으로 읽는다.
    let object: Map<String, Value> =
        serde_json::from_reader(BufReader::new(file)).map_err(parse_error)?;
    let document: MetadataDocument =
        serde_json::from_value(Value::Object(object)).map_err(parse_error)?;
    info!(
        path = %path.display(),
        records = document.record_count(),
        "메타데이터 로드 완료"
    );
    Ok(document)
}
