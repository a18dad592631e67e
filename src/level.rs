//! Declarative levels from XML documents.
//!
//! A level file describes a camera and a set of colored squares:
//!
//! ```xml
//! <Level>
//!   <Camera CenterX="20" CenterY="60" Width="20"
//!           Viewport="20 40 600 300" BgColor="0 0 0.8 1" />
//!   <Square PosX="20" PosY="60" Width="2" Height="3"
//!           Rotation="0" Color="1 0 0 1" />
//! </Level>
//! ```
//!
//! [`parse`] turns the document into a plain-data [`LevelSpec`]; the
//! `build` methods turn specs into live engine objects. Rotation is in
//! degrees; `Viewport` and the color attributes are space-separated
//! four-tuples. Malformed or missing attributes fail the parse rather
//! than defaulting, so a typo in a level file is caught at scene startup
//! instead of drawing garbage. A level with no squares is legal but
//! logged, since it usually means a misspelled tag.

use crate::error::EngineError;
use crate::math::Vec2;
use crate::render::Camera;
use crate::renderable::Renderable;
use crate::resources::XmlElement;

/// Parsed `<Camera>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSpec {
    pub center: Vec2,
    pub width: f32,
    pub viewport: [f32; 4],
    pub background: [f32; 4],
}

impl CameraSpec {
    pub fn build(&self) -> Camera {
        let mut camera = Camera::new(self.center, self.width, self.viewport);
        camera.set_background(self.background);
        camera
    }
}

/// Parsed `<Square>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareSpec {
    pub position: Vec2,
    pub size: Vec2,
    pub rotation_degrees: f32,
    pub color: [f32; 4],
}

impl SquareSpec {
    pub fn build(&self) -> Renderable {
        let mut square = Renderable::flat(self.color);
        square.transform.set_position(self.position.x, self.position.y);
        square.transform.set_size(self.size.x, self.size.y);
        square.transform.set_rotation_degrees(self.rotation_degrees);
        square
    }
}

/// Everything a level file declares.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSpec {
    pub camera: CameraSpec,
    pub squares: Vec<SquareSpec>,
}

impl LevelSpec {
    pub fn build_squares(&self) -> Vec<Renderable> {
        self.squares.iter().map(SquareSpec::build).collect()
    }
}

fn four_tuple(elm: &XmlElement, name: &str) -> Result<[f32; 4], EngineError> {
    let values = elm.attr_f32_list(name)?;
    values.try_into().map_err(|_| EngineError::Parse {
        key: elm.tag.clone(),
        reason: format!("attribute '{name}' must have exactly 4 numbers"),
    })
}

/// Parse a level document rooted at `root`.
pub fn parse(root: &XmlElement) -> Result<LevelSpec, EngineError> {
    let cam = root.child("Camera").ok_or_else(|| EngineError::Parse {
        key: root.tag.clone(),
        reason: "level has no <Camera> element".to_string(),
    })?;
    let camera = CameraSpec {
        center: Vec2::new(cam.attr_f32("CenterX")?, cam.attr_f32("CenterY")?),
        width: cam.attr_f32("Width")?,
        viewport: four_tuple(cam, "Viewport")?,
        background: four_tuple(cam, "BgColor")?,
    };

    let mut squares = Vec::new();
    for elm in root.children_named("Square") {
        squares.push(SquareSpec {
            position: Vec2::new(elm.attr_f32("PosX")?, elm.attr_f32("PosY")?),
            size: Vec2::new(elm.attr_f32("Width")?, elm.attr_f32("Height")?),
            rotation_degrees: elm.attr_f32("Rotation")?,
            color: four_tuple(elm, "Color")?,
        });
    }
    if squares.is_empty() {
        log::warn!("level '{}' has no <Square> elements", root.tag);
    }

    Ok(LevelSpec { camera, squares })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::xml;
    use std::f32::consts::PI;

    const LEVEL: &str = r#"
        <Level>
            <Camera CenterX="20" CenterY="60" Width="20"
                    Viewport="20 40 600 300" BgColor="0 0 0.8 1" />
            <Square PosX="20" PosY="60" Width="2" Height="3"
                    Rotation="0" Color="1 0 0 1" />
            <Square PosX="15" PosY="60" Width="1" Height="1"
                    Rotation="90" Color="0 1 0 1" />
        </Level>"#;

    fn spec() -> LevelSpec {
        parse(&xml::parse("level.xml", LEVEL).unwrap()).unwrap()
    }

    #[test]
    fn camera_comes_from_its_element() {
        let camera = spec().camera.build();
        assert_eq!(camera.center(), Vec2::new(20.0, 60.0));
        assert_eq!(camera.width(), 20.0);
        assert_eq!(camera.viewport(), [20.0, 40.0, 600.0, 300.0]);
        assert_eq!(camera.background(), [0.0, 0.0, 0.8, 1.0]);
    }

    #[test]
    fn squares_parse_in_document_order() {
        let spec = spec();
        assert_eq!(spec.squares.len(), 2);
        assert_eq!(spec.squares[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(spec.squares[0].position, Vec2::new(20.0, 60.0));
        assert_eq!(spec.squares[0].size, Vec2::new(2.0, 3.0));

        let built = spec.build_squares();
        assert!((built[1].transform.rotation() - PI / 2.0).abs() < 1e-5);
        assert_eq!(built[0].transform.size(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn missing_camera_fails() {
        let doc = xml::parse("empty.xml", "<Level></Level>").unwrap();
        assert!(matches!(parse(&doc), Err(EngineError::Parse { .. })));
    }

    #[test]
    fn short_viewport_tuple_fails() {
        let doc = xml::parse(
            "bad.xml",
            r#"<Level><Camera CenterX="0" CenterY="0" Width="10"
                 Viewport="0 0 100" BgColor="0 0 0 1"/></Level>"#,
        )
        .unwrap();
        assert!(parse(&doc).is_err());
    }

    #[test]
    fn malformed_square_number_fails() {
        let doc = xml::parse(
            "bad.xml",
            r#"<Level>
                 <Camera CenterX="0" CenterY="0" Width="10"
                         Viewport="0 0 100 100" BgColor="0 0 0 1"/>
                 <Square PosX="oops" PosY="0" Width="1" Height="1"
                         Rotation="0" Color="1 1 1 1"/>
               </Level>"#,
        )
        .unwrap();
        assert!(parse(&doc).is_err());
    }
}
