pub mod geometry {
    use glam::DVec2;

    /// 도면 좌표계의 2차원 점. 내부적으로 `glam::DVec2`를 사용한다.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        /// 허용 오차 안에서 두 점이 같은지 비교한다.
        #[inline]
        pub fn approx_eq(self, other: Point2, epsilon: f64) -> bool {
            self.0.abs_diff_eq(other.0, epsilon)
        }
    }

    impl Default for Point2 {
        fn default() -> Self {
            Self::new(0.0, 0.0)
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 2차원 벡터. 오프셋과 크기 표현에 쓴다.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub const fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }
    }
}

/// 어노테이션 배치에 쓰이는 고정 값. 출력 도면에서 그대로 관찰되는 값이므로 바꾸지 않는다.
pub mod style {
    use crate::geometry::Vector2;

    pub const ANNOTATION_LAYER: &str = "DMAP_ANNOTATIONS";
    /// ACI 1 (빨강).
    pub const ANNOTATION_COLOR: u8 = 1;

    pub const IMAGE_PIXEL_WIDTH: u32 = 800;
    pub const IMAGE_PIXEL_HEIGHT: u32 = 600;
    /// 4:3 비율의 배치 크기(도면 단위).
    pub const IMAGE_UNIT_SIZE: Vector2 = Vector2::new(50.0, 37.5);

    pub const MEMO_TEXT_HEIGHT: f64 = 2.5;
    pub const MEMO_OFFSET: Vector2 = Vector2::new(0.0, -10.0);
    pub const LABEL_TEXT_HEIGHT: f64 = 3.0;

    /// 이미지 파일을 찾지 못했을 때 대신 넣는 문구.
    pub fn placeholder_text(image_name: &str) -> String {
        format!("[사진: {image_name}]")
    }
}

pub mod metadata {
    use serde::{Deserialize, Deserializer};

    use crate::geometry::Point2;

    /// 웹앱이 저장한 메타데이터 문서.
    ///
    /// `annotations` 목록이 기본 형식이며, 웹앱의 다른 저장 경로가 만드는
    /// `photos` / `texts` 목록도 함께 받아들인다.
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetadataDocument {
        #[serde(default)]
        pub dxf_file: Option<String>,
        #[serde(default)]
        pub last_modified: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        pub annotations: Vec<Annotation>,
        #[serde(default, deserialize_with = "null_as_default")]
        pub photos: Vec<PhotoEntry>,
        #[serde(default, deserialize_with = "null_as_default")]
        pub texts: Vec<TextEntry>,
    }

    impl MetadataDocument {
        /// 삽입 순서대로 레코드를 돌려준다: `annotations`, `photos`, `texts` 순.
        pub fn records(&self) -> impl Iterator<Item = Annotation> + '_ {
            self.annotations
                .iter()
                .cloned()
                .chain(self.photos.iter().map(PhotoEntry::to_annotation))
                .chain(self.texts.iter().map(TextEntry::to_annotation))
        }

        pub fn record_count(&self) -> usize {
            self.annotations.len() + self.photos.len() + self.texts.len()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct PhotoAnnotation {
        pub image_name: String,
        /// 비어 있는 메모는 `None`으로 정규화된다.
        pub memo: Option<String>,
        pub position: Point2,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct TextAnnotation {
        pub text: String,
        pub position: Point2,
    }

    /// `type` 필드로 구분되는 어노테이션 레코드.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(from = "RawAnnotation")]
    pub enum Annotation {
        Photo(PhotoAnnotation),
        Text(TextAnnotation),
        /// 알 수 없거나 누락된 `type`. 삽입 시 무시된다.
        Unknown { kind: Option<String> },
    }

    impl Annotation {
        pub fn kind(&self) -> Option<&str> {
            match self {
                Annotation::Photo(_) => Some("photo"),
                Annotation::Text(_) => Some("text"),
                Annotation::Unknown { kind } => kind.as_deref(),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RawAnnotation {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        image_name: Option<String>,
        #[serde(default)]
        memo: Option<String>,
        #[serde(default)]
        text: Option<String>,
    }

    impl From<RawAnnotation> for Annotation {
        fn from(raw: RawAnnotation) -> Self {
            let position = Point2::new(raw.x.unwrap_or(0.0), raw.y.unwrap_or(0.0));
            match raw.kind.as_deref() {
                Some("photo") => Annotation::Photo(PhotoAnnotation {
                    image_name: raw.image_name.unwrap_or_default(),
                    memo: non_empty(raw.memo),
                    position,
                }),
                Some("text") => Annotation::Text(TextAnnotation {
                    text: raw.text.unwrap_or_default(),
                    position,
                }),
                _ => Annotation::Unknown { kind: raw.kind },
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
    pub struct Position {
        #[serde(default)]
        pub x: f64,
        #[serde(default)]
        pub y: f64,
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
    pub struct Size {
        #[serde(default)]
        pub width: f64,
        #[serde(default)]
        pub height: f64,
    }

    /// `photos` 목록의 항목. `size`는 화면 표시용이라 삽입에는 쓰이지 않는다.
    /// 웹앱이 붙이는 숫자 `id` 같은 나머지 필드는 읽지 않는다.
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PhotoEntry {
        #[serde(default)]
        pub file_name: Option<String>,
        #[serde(default)]
        pub position: Option<Position>,
        #[serde(default)]
        pub size: Option<Size>,
        #[serde(default)]
        pub memo: Option<String>,
    }

    impl PhotoEntry {
        pub fn to_annotation(&self) -> Annotation {
            let position = self.position.unwrap_or_default();
            Annotation::Photo(PhotoAnnotation {
                image_name: self.file_name.clone().unwrap_or_default(),
                memo: non_empty(self.memo.clone()),
                position: Point2::new(position.x, position.y),
            })
        }
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TextEntry {
        #[serde(default)]
        pub x: Option<f64>,
        #[serde(default)]
        pub y: Option<f64>,
        #[serde(default)]
        pub text: Option<String>,
        #[serde(default)]
        pub font_size: Option<f64>,
    }

    impl TextEntry {
        pub fn to_annotation(&self) -> Annotation {
            Annotation::Text(TextAnnotation {
                text: self.text.clone().unwrap_or_default(),
                position: Point2::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0)),
            })
        }
    }

    fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|memo| !memo.is_empty())
    }

    fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// 도면 라이브러리와의 경계. 삽입 로직은 이 트레이트만 알고, 실제 DXF 처리는 `dmap-io`가 맡는다.
pub mod canvas {
    use std::path::PathBuf;

    use thiserror::Error;

    use crate::geometry::{Point2, Vector2};

    #[derive(Debug, Error)]
    pub enum CanvasError {
        #[error("지원하지 않는 기능: {0}")]
        Unsupported(String),
        #[error("엔티티 삽입 실패: {0}")]
        Insert(String),
    }

    /// 도면에 배치할 이미지 참조.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ImagePlacement {
        pub file_path: PathBuf,
        pub pixel_width: u32,
        pub pixel_height: u32,
        pub insert: Point2,
        pub size: Vector2,
        pub layer: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct TextLabel {
        pub content: String,
        pub insert: Point2,
        pub height: f64,
        pub color: u8,
        pub layer: String,
    }

    pub trait AnnotationCanvas {
        /// 레이어 이름은 대소문자를 구분하지 않는다.
        fn has_layer(&self, name: &str) -> bool;
        fn add_layer(&mut self, name: &str, color: u8) -> Result<(), CanvasError>;
        fn add_image(&mut self, placement: &ImagePlacement) -> Result<(), CanvasError>;
        fn add_text(&mut self, label: &TextLabel) -> Result<(), CanvasError>;
        fn contains_image(&self, placement: &ImagePlacement) -> bool;
        fn contains_text(&self, label: &TextLabel) -> bool;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::geometry::{Point2, Vector2};
    use crate::metadata::{Annotation, MetadataDocument};
    use crate::style;

    fn parse(value: serde_json::Value) -> MetadataDocument {
        serde_json::from_value(value).expect("메타데이터 파싱 실패")
    }

    #[test]
    fn photo_and_text_records_keep_order_and_fields() {
        let doc = parse(json!({
            "dxfFile": "plan.dxf",
            "lastModified": "2024-05-01T10:00:00Z",
            "annotations": [
                {"type": "photo", "x": 12.5, "y": 40, "imageName": "a.jpg", "memo": "균열"},
                {"type": "text", "x": 1, "y": 2, "text": "Hello", "id": "text_1"}
            ]
        }));
        assert_eq!(doc.dxf_file.as_deref(), Some("plan.dxf"));
        assert_eq!(doc.record_count(), 2);

        let records: Vec<Annotation> = doc.records().collect();
        match &records[0] {
            Annotation::Photo(photo) => {
                assert_eq!(photo.image_name, "a.jpg");
                assert_eq!(photo.memo.as_deref(), Some("균열"));
                assert_eq!(photo.position, Point2::new(12.5, 40.0));
            }
            other => panic!("사진 레코드를 기대했지만 {other:?}"),
        }
        match &records[1] {
            Annotation::Text(text) => {
                assert_eq!(text.text, "Hello");
                assert_eq!(text.position, Point2::new(1.0, 2.0));
            }
            other => panic!("텍스트 레코드를 기대했지만 {other:?}"),
        }
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let doc = parse(json!({
            "annotations": [
                {"type": "photo", "imageName": "b.png", "memo": ""},
                {"type": "text", "x": null}
            ]
        }));
        assert!(doc.dxf_file.is_none());
        assert!(doc.last_modified.is_none());

        let records: Vec<Annotation> = doc.records().collect();
        let Annotation::Photo(photo) = &records[0] else {
            panic!("사진 레코드가 아님");
        };
        assert!(photo.memo.is_none());
        assert_eq!(photo.position, Point2::default());

        let Annotation::Text(text) = &records[1] else {
            panic!("텍스트 레코드가 아님");
        };
        assert_eq!(text.text, "");
        assert_eq!(text.position, Point2::new(0.0, 0.0));
    }

    #[test]
    fn unknown_or_missing_type_is_kept_as_unknown() {
        let doc = parse(json!({
            "annotations": [
                {"type": "arrow", "x": 1, "y": 1},
                {"x": 3, "y": 4}
            ]
        }));
        let records: Vec<Annotation> = doc.records().collect();
        assert_eq!(
            records[0],
            Annotation::Unknown {
                kind: Some("arrow".to_string())
            }
        );
        assert_eq!(records[1], Annotation::Unknown { kind: None });
        assert_eq!(records[1].kind(), None);
    }

    #[test]
    fn empty_document_and_null_lists_have_no_records() {
        assert_eq!(parse(json!({})).record_count(), 0);
        assert_eq!(parse(json!({"annotations": null})).record_count(), 0);
    }

    #[test]
    fn photos_and_texts_layout_is_appended_after_annotations() {
        let doc = parse(json!({
            "dxfFile": "site.dxf",
            "annotations": [{"type": "text", "x": 0, "y": 0, "text": "first"}],
            "photos": [{
                "id": "p1",
                "fileName": "site_photo_1.jpg",
                "position": {"x": 5, "y": 6},
                "size": {"width": 100, "height": 75},
                "memo": "north wall"
            }],
            "texts": [{"id": "t1", "x": 7, "y": 8, "text": "last", "fontSize": 14}]
        }));
        let records: Vec<Annotation> = doc.records().collect();
        assert_eq!(records.len(), 3);
        assert!(matches!(&records[0], Annotation::Text(t) if t.text == "first"));
        match &records[1] {
            Annotation::Photo(photo) => {
                assert_eq!(photo.image_name, "site_photo_1.jpg");
                assert_eq!(photo.position, Point2::new(5.0, 6.0));
                assert_eq!(photo.memo.as_deref(), Some("north wall"));
            }
            other => panic!("사진 레코드를 기대했지만 {other:?}"),
        }
        assert!(matches!(&records[2], Annotation::Text(t) if t.text == "last"));
    }

    #[test]
    fn web_app_drive_save_shape_is_accepted() {
        // 웹앱은 id에 Date.now() 숫자를 쓰고, 빈 메모는 ""로 저장한다.
        let doc = parse(json!({
            "dxfFile": "site.dxf",
            "photos": [
                {
                    "id": 1718000000000u64,
                    "fileName": "site_photo_1.jpg",
                    "position": {"x": 12.5, "y": -3},
                    "size": {"width": 1, "height": 1},
                    "memo": ""
                },
                {
                    "id": 1718000000001u64,
                    "fileName": "site_photo_2.jpg",
                    "position": {"x": 0, "y": 0},
                    "size": {},
                    "memo": "창호"
                }
            ],
            "texts": [{"id": 1718000000002u64, "x": 1, "y": 2, "text": "입구", "fontSize": 16}],
            "lastModified": "2024-06-10T06:13:20.000Z"
        }));

        let records: Vec<Annotation> = doc.records().collect();
        assert_eq!(records.len(), 3);
        let Annotation::Photo(first) = &records[0] else {
            panic!("사진 레코드가 아님");
        };
        assert_eq!(first.image_name, "site_photo_1.jpg");
        assert_eq!(first.position, Point2::new(12.5, -3.0));
        assert!(first.memo.is_none());
        let Annotation::Photo(second) = &records[1] else {
            panic!("사진 레코드가 아님");
        };
        assert_eq!(second.memo.as_deref(), Some("창호"));
        assert!(matches!(&records[2], Annotation::Text(t) if t.text == "입구"));
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        let result: Result<MetadataDocument, _> = serde_json::from_value(json!({
            "annotations": [{"type": "text", "x": "ten", "y": 0}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn style_constants_match_output_contract() {
        assert_eq!(style::ANNOTATION_LAYER, "DMAP_ANNOTATIONS");
        assert_eq!(style::IMAGE_UNIT_SIZE, Vector2::new(50.0, 37.5));
        let memo_at = Point2::new(10.0, 20.0).translate(style::MEMO_OFFSET);
        assert_eq!(memo_at, Point2::new(10.0, 10.0));
        assert_eq!(style::placeholder_text("missing.png"), "[사진: missing.png]");
    }
}
