pub mod locator;
pub mod report;

pub mod errors {
    use dmap_core::canvas::CanvasError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("어노테이션 레이어 {layer} 생성 실패: {source}")]
        LayerCreation {
            layer: String,
            #[source]
            source: CanvasError,
        },
    }
}

pub mod importer {
    use dmap_core::canvas::{AnnotationCanvas, ImagePlacement, TextLabel};
    use dmap_core::geometry::Point2;
    use dmap_core::metadata::{Annotation, MetadataDocument, PhotoAnnotation, TextAnnotation};
    use dmap_core::style;
    use tracing::{debug, info, warn};

    use crate::errors::EngineError;
    use crate::locator::{ImageLocator, ImageLookup};
    use crate::report::{ImportReport, RecordOutcome};

    #[derive(Debug, Clone, Copy, Default)]
    pub struct ImportOptions {
        /// 주석 레이어에 같은 엔티티가 이미 있으면 다시 넣지 않는다. 기본값은 항상 추가.
        pub skip_duplicates: bool,
    }

    /// 메타데이터의 레코드를 순서대로 도면에 삽입한다.
    ///
    /// 레코드 단위의 실패는 보고서에 남기고 다음 레코드로 넘어간다. 이미 넣은 엔티티는 되돌리지 않는다.
    /// 어노테이션 레이어를 만들 수 없을 때만 전체가 실패한다.
    pub fn insert_annotations<C>(
        canvas: &mut C,
        metadata: &MetadataDocument,
        locator: &ImageLocator,
        options: &ImportOptions,
    ) -> Result<ImportReport, EngineError>
    where
        C: AnnotationCanvas + ?Sized,
    {
        let mut report = ImportReport {
            layer_created: ensure_annotation_layer(canvas)?,
            ..Default::default()
        };

        for (index, record) in metadata.records().enumerate() {
            let outcome = match &record {
                Annotation::Photo(photo) => insert_photo(canvas, photo, locator, options),
                Annotation::Text(text) => insert_text(canvas, text, options),
                Annotation::Unknown { kind } => {
                    debug!(index, kind = ?kind, "알 수 없는 어노테이션 형식 무시");
                    RecordOutcome::Ignored { kind: kind.clone() }
                }
            };
            report.push(index, outcome);
        }

        info!(
            records = report.records.len(),
            images = report.placed_images(),
            texts = report.placed_texts(),
            placeholders = report.placeholders(),
            failures = report.failures(),
            duplicates = report.duplicates(),
            "어노테이션 삽입 완료"
        );
        Ok(report)
    }

    fn ensure_annotation_layer<C>(canvas: &mut C) -> Result<bool, EngineError>
    where
        C: AnnotationCanvas + ?Sized,
    {
        if canvas.has_layer(style::ANNOTATION_LAYER) {
            return Ok(false);
        }
        canvas
            .add_layer(style::ANNOTATION_LAYER, style::ANNOTATION_COLOR)
            .map_err(|source| EngineError::LayerCreation {
                layer: style::ANNOTATION_LAYER.to_string(),
                source,
            })?;
        Ok(true)
    }

    fn insert_photo<C>(
        canvas: &mut C,
        photo: &PhotoAnnotation,
        locator: &ImageLocator,
        options: &ImportOptions,
    ) -> RecordOutcome
    where
        C: AnnotationCanvas + ?Sized,
    {
        let image_name = photo.image_name.clone();
        if image_name.is_empty() {
            warn!("imageName 없는 사진 어노테이션");
            return RecordOutcome::ImageFailed {
                image_name,
                reason: "imageName이 비어 있습니다".to_string(),
            };
        }

        match locator.locate(&image_name) {
            ImageLookup::Found(file_path) => {
                let placement = ImagePlacement {
                    file_path,
                    pixel_width: style::IMAGE_PIXEL_WIDTH,
                    pixel_height: style::IMAGE_PIXEL_HEIGHT,
                    insert: photo.position,
                    size: style::IMAGE_UNIT_SIZE,
                    layer: style::ANNOTATION_LAYER.to_string(),
                };
                if options.skip_duplicates && canvas.contains_image(&placement) {
                    debug!(image = %image_name, "이미 삽입된 이미지");
                    return RecordOutcome::Duplicate {
                        description: format!("이미지 {image_name}"),
                    };
                }
                if let Err(err) = canvas.add_image(&placement) {
                    warn!(image = %image_name, error = %err, "이미지 삽입 실패");
                    return RecordOutcome::ImageFailed {
                        image_name,
                        reason: err.to_string(),
                    };
                }

                if let Some(memo) = &photo.memo {
                    let caption = annotation_text(
                        memo,
                        photo.position.translate(style::MEMO_OFFSET),
                        style::MEMO_TEXT_HEIGHT,
                    );
                    if let Err(err) = canvas.add_text(&caption) {
                        warn!(image = %image_name, error = %err, "메모 삽입 실패");
                        return RecordOutcome::ImageFailed {
                            image_name,
                            reason: err.to_string(),
                        };
                    }
                }

                RecordOutcome::ImagePlaced {
                    image_name,
                    memo: photo.memo.clone(),
                }
            }
            ImageLookup::Missing(searched) => {
                let placeholder = annotation_text(
                    &style::placeholder_text(&image_name),
                    photo.position,
                    style::LABEL_TEXT_HEIGHT,
                );
                if options.skip_duplicates && canvas.contains_text(&placeholder) {
                    return RecordOutcome::Duplicate {
                        description: placeholder.content,
                    };
                }
                match canvas.add_text(&placeholder) {
                    Ok(()) => {
                        warn!(path = %searched.display(), "이미지 파일 없음, 대체 문구 삽입");
                        RecordOutcome::ImageMissing {
                            image_name,
                            searched,
                        }
                    }
                    Err(err) => RecordOutcome::ImageFailed {
                        image_name,
                        reason: err.to_string(),
                    },
                }
            }
        }
    }

    fn insert_text<C>(canvas: &mut C, text: &TextAnnotation, options: &ImportOptions) -> RecordOutcome
    where
        C: AnnotationCanvas + ?Sized,
    {
        let label = annotation_text(&text.text, text.position, style::LABEL_TEXT_HEIGHT);
        if options.skip_duplicates && canvas.contains_text(&label) {
            return RecordOutcome::Duplicate {
                description: format!("텍스트 {}", text.text),
            };
        }
        match canvas.add_text(&label) {
            Ok(()) => RecordOutcome::TextPlaced {
                text: text.text.clone(),
            },
            Err(err) => {
                warn!(text = %text.text, error = %err, "텍스트 삽입 실패");
                RecordOutcome::TextFailed {
                    text: text.text.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }

    fn annotation_text(content: &str, insert: Point2, height: f64) -> TextLabel {
        TextLabel {
            content: content.to_string(),
            insert,
            height,
            color: style::ANNOTATION_COLOR,
            layer: style::ANNOTATION_LAYER.to_string(),
        }
    }
}

pub use importer::{ImportOptions, insert_annotations};
