use std::path::PathBuf;

use tracing::trace;

/// 메타데이터의 `imageName`을 이미지 폴더 기준으로 찾는다.
#[derive(Debug, Clone)]
pub struct ImageLocator {
    root: PathBuf,
}

/// 이미지 조회 결과. 찾지 못한 경우에도 확인한 경로를 돌려준다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    Found(PathBuf),
    Missing(PathBuf),
}

impl ImageLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 일반 파일이 있을 때만 `Found`. 디렉터리는 이미지로 보지 않는다.
    pub fn locate(&self, image_name: &str) -> ImageLookup {
        let candidate = self.root.join(image_name);
        trace!(candidate = %candidate.display(), "image locator candidate");
        if candidate.is_file() {
            ImageLookup::Found(candidate)
        } else {
            ImageLookup::Missing(candidate)
        }
    }
}
