use dmap_core::canvas::{AnnotationCanvas, CanvasError, ImagePlacement, TextLabel};
use dmap_core::geometry::Point2;
use dxf::entities::{Entity, EntityType, Image, Text};
use dxf::enums::AcadVersion;
use dxf::objects::{ImageDefinition, Object, ObjectType};
use dxf::tables::Layer;
use dxf::{Color, Drawing, Point, Vector};
use tracing::{debug, trace};

const POSITION_EPSILON: f64 = 1e-9;

/// `dxf::Drawing`을 감싸 [`AnnotationCanvas`]를 구현한다.
pub struct DxfCanvas {
    drawing: Drawing,
}

impl DxfCanvas {
    pub fn from_drawing(drawing: Drawing) -> Self {
        Self { drawing }
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn into_drawing(self) -> Drawing {
        self.drawing
    }
}

impl AnnotationCanvas for DxfCanvas {
    fn has_layer(&self, name: &str) -> bool {
        self.drawing
            .layers()
            .any(|layer| layer.name.eq_ignore_ascii_case(name))
    }

    fn add_layer(&mut self, name: &str, color: u8) -> Result<(), CanvasError> {
        let layer = Layer {
            name: name.to_string(),
            color: Color::from_index(color),
            ..Default::default()
        };
        self.drawing.add_layer(layer);
        debug!(layer = name, color, "어노테이션 레이어 생성");
        Ok(())
    }

    fn add_image(&mut self, placement: &ImagePlacement) -> Result<(), CanvasError> {
        // IMAGE/IMAGEDEF는 R2000 이상에서만 기록된다.
        if self.drawing.header.version < AcadVersion::R2000 {
            return Err(CanvasError::Unsupported(format!(
                "DXF {:?} 도면에는 이미지를 넣을 수 없습니다 (R2000 이상 필요)",
                self.drawing.header.version
            )));
        }
        if placement.pixel_width == 0 || placement.pixel_height == 0 {
            return Err(CanvasError::Insert("이미지 픽셀 크기가 0입니다".to_string()));
        }

        let file_path = placement.file_path.to_string_lossy().into_owned();
        let pixel_width = f64::from(placement.pixel_width);
        let pixel_height = f64::from(placement.pixel_height);
        let definition = Object::new(ObjectType::ImageDefinition(ImageDefinition {
            file_path: file_path.clone(),
            image_width: placement.pixel_width as i32,
            image_height: placement.pixel_height as i32,
            pixel_width: 1.0,
            pixel_height: 1.0,
            ..Default::default()
        }));
        // IMAGE는 그룹 코드 340으로 IMAGEDEF 핸들을 참조한다.
        let handle = self.drawing.add_object(definition).common.handle;

        // u/v 벡터는 픽셀 하나의 도면 크기다.
        let image = Image {
            location: to_point(placement.insert),
            u_vector: Vector::new(placement.size.x() / pixel_width, 0.0, 0.0),
            v_vector: Vector::new(0.0, placement.size.y() / pixel_height, 0.0),
            image_size: Vector::new(pixel_width, pixel_height, 0.0),
            image_def_reference: format!("{:X}", handle.0),
            ..Default::default()
        };

        let mut entity = Entity::new(EntityType::Image(image));
        entity.common.layer = placement.layer.clone();
        self.drawing.add_entity(entity);
        trace!(file = %file_path, x = placement.insert.x(), y = placement.insert.y(), "IMAGE 삽입");
        Ok(())
    }

    fn add_text(&mut self, label: &TextLabel) -> Result<(), CanvasError> {
        if !label.height.is_finite() || label.height <= 0.0 {
            return Err(CanvasError::Insert(format!(
                "문자 높이 {}는 사용할 수 없습니다",
                label.height
            )));
        }
        let text = Text {
            location: to_point(label.insert),
            text_height: label.height,
            value: label.content.clone(),
            ..Default::default()
        };
        let mut entity = Entity::new(EntityType::Text(text));
        entity.common.layer = label.layer.clone();
        entity.common.color = Color::from_index(label.color);
        self.drawing.add_entity(entity);
        trace!(content = %label.content, x = label.insert.x(), y = label.insert.y(), "TEXT 삽입");
        Ok(())
    }

    /// 같은 레이어, 같은 삽입점, 같은 배치 크기의 IMAGE가 있으면 중복으로 본다.
    fn contains_image(&self, placement: &ImagePlacement) -> bool {
        let pixel_width = f64::from(placement.pixel_width.max(1));
        let pixel_height = f64::from(placement.pixel_height.max(1));
        let u_length = placement.size.x() / pixel_width;
        let v_length = placement.size.y() / pixel_height;
        self.drawing.entities().any(|entity| match &entity.specific {
            EntityType::Image(image) => {
                entity.common.layer.eq_ignore_ascii_case(&placement.layer)
                    && same_point(&image.location, placement.insert)
                    && (image.u_vector.x - u_length).abs() < POSITION_EPSILON
                    && (image.v_vector.y - v_length).abs() < POSITION_EPSILON
            }
            _ => false,
        })
    }

    fn contains_text(&self, label: &TextLabel) -> bool {
        self.drawing.entities().any(|entity| match &entity.specific {
            EntityType::Text(text) => {
                entity.common.layer.eq_ignore_ascii_case(&label.layer)
                    && text.value == label.content
                    && same_point(&text.location, label.insert)
            }
            _ => false,
        })
    }
}

fn to_point(point: Point2) -> Point {
    Point::new(point.x(), point.y(), 0.0)
}

fn same_point(point: &Point, expected: Point2) -> bool {
    Point2::new(point.x, point.y).approx_eq(expected, POSITION_EPSILON)
}
