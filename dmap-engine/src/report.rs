use std::path::PathBuf;

/// 레코드 하나를 처리한 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    ImagePlaced {
        image_name: String,
        memo: Option<String>,
    },
    /// 이미지를 찾지 못해 대체 문구를 넣었다.
    ImageMissing {
        image_name: String,
        searched: PathBuf,
    },
    ImageFailed {
        image_name: String,
        reason: String,
    },
    TextPlaced {
        text: String,
    },
    TextFailed {
        text: String,
        reason: String,
    },
    Duplicate {
        description: String,
    },
    Ignored {
        kind: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordReport {
    /// 메타데이터 안에서의 0 기반 순번.
    pub index: usize,
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub layer_created: bool,
    pub records: Vec<RecordReport>,
}

impl ImportReport {
    pub(crate) fn push(&mut self, index: usize, outcome: RecordOutcome) {
        self.records.push(RecordReport { index, outcome });
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.records
            .iter()
            .filter(|record| predicate(&record.outcome))
            .count()
    }

    pub fn placed_images(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::ImagePlaced { .. }))
    }

    pub fn placed_texts(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::TextPlaced { .. }))
    }

    pub fn placeholders(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::ImageMissing { .. }))
    }

    pub fn failures(&self) -> usize {
        self.count(|outcome| {
            matches!(
                outcome,
                RecordOutcome::ImageFailed { .. } | RecordOutcome::TextFailed { .. }
            )
        })
    }

    pub fn duplicates(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::Duplicate { .. }))
    }

    pub fn ignored(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::Ignored { .. }))
    }
}
