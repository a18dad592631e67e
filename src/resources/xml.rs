//! XML resources as an owned element tree.
//!
//! `roxmltree` borrows its input string, so the worker converts the parsed
//! document into a small owned [`XmlElement`] tree once and stores that as
//! the artifact. Level files are tiny; the copy is not worth avoiding.

use crate::error::EngineError;

use super::{Codec, LoadTicket, ResourceMap};

/// One element of a parsed XML document: tag name, attributes, children.
/// Text content is not retained; the level format is attribute-driven.
#[derive(Debug, Clone)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// The value of attribute `name`, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute `name` parsed as `f32`. Fails when absent or malformed.
    pub fn attr_f32(&self, name: &str) -> Result<f32, EngineError> {
        let raw = self.attr(name).ok_or_else(|| EngineError::Parse {
            key: self.tag.clone(),
            reason: format!("missing attribute '{name}'"),
        })?;
        raw.trim().parse().map_err(|_| EngineError::Parse {
            key: self.tag.clone(),
            reason: format!("attribute '{name}' is not a number: '{raw}'"),
        })
    }

    /// Attribute `name` split on whitespace and parsed as `f32`s.
    pub fn attr_f32_list(&self, name: &str) -> Result<Vec<f32>, EngineError> {
        let raw = self.attr(name).ok_or_else(|| EngineError::Parse {
            key: self.tag.clone(),
            reason: format!("missing attribute '{name}'"),
        })?;
        raw.split_whitespace()
            .map(|part| {
                part.parse().map_err(|_| EngineError::Parse {
                    key: self.tag.clone(),
                    reason: format!("attribute '{name}' has a non-number: '{part}'"),
                })
            })
            .collect()
    }

    /// The first child element with tag `tag`.
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Every child element with tag `tag`, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.tag == tag)
    }
}

/// Parse `source` into an owned tree rooted at the document element.
pub(crate) fn parse(key: &str, source: &str) -> Result<XmlElement, EngineError> {
    let doc = roxmltree::Document::parse(source).map_err(|e| EngineError::Parse {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(convert(doc.root_element()))
}

fn convert(node: roxmltree::Node<'_, '_>) -> XmlElement {
    XmlElement {
        tag: node.tag_name().name().to_string(),
        attributes: node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect(),
        children: node
            .children()
            .filter(|c| c.is_element())
            .map(convert)
            .collect(),
    }
}

pub fn load(map: &mut ResourceMap, key: &str) -> Option<LoadTicket> {
    map.load(key, Codec::Xml)
}

/// The parsed document root for `key`, or [`EngineError::NotLoaded`].
pub fn get<'a>(map: &'a ResourceMap, key: &str) -> Result<&'a XmlElement, EngineError> {
    map.get(key)?
        .as_xml()
        .ok_or_else(|| EngineError::NotLoaded(key.to_string()))
}

pub fn unload(map: &mut ResourceMap, key: &str) -> bool {
    map.unload(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"
        <MyGameLevel>
            <Camera CenterX="20" CenterY="60" Width="20"
                    Viewport="20 40 600 300" BgColor="0 0 0.8 1" />
            <Square PosX="20" PosY="60" Width="2" Height="3"
                    Rotation="0" Color="1 0 0 1" />
            <Square PosX="15" PosY="60" Width="1" Height="1"
                    Rotation="45" Color="0 1 0 1" />
        </MyGameLevel>"#;

    #[test]
    fn parses_elements_attributes_and_children() {
        let root = parse("level.xml", LEVEL).unwrap();
        assert_eq!(root.tag, "MyGameLevel");

        let camera = root.child("Camera").unwrap();
        assert_eq!(camera.attr_f32("CenterX").unwrap(), 20.0);
        assert_eq!(
            camera.attr_f32_list("Viewport").unwrap(),
            vec![20.0, 40.0, 600.0, 300.0]
        );

        let squares: Vec<_> = root.children_named("Square").collect();
        assert_eq!(squares.len(), 2);
        assert_eq!(squares[1].attr_f32("Rotation").unwrap(), 45.0);
    }

    #[test]
    fn missing_and_malformed_attributes_fail() {
        let root = parse("level.xml", LEVEL).unwrap();
        let camera = root.child("Camera").unwrap();
        assert!(matches!(
            camera.attr_f32("Zoom"),
            Err(EngineError::Parse { .. })
        ));

        let bad = parse("bad.xml", r#"<A X="not-a-number"/>"#).unwrap();
        assert!(bad.attr_f32("X").is_err());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            parse("broken.xml", "<Open><Unclosed>"),
            Err(EngineError::Parse { .. })
        ));
    }
}
