//! Bitmap font resources.
//!
//! A font is a composite of two resources sharing a base name: the glyph
//! atlas image (`name.png`) and its descriptor (`name.fnt`, an XML file in
//! the BMFont format). [`load`] requests both; [`char_info`] joins them,
//! turning a descriptor `<char>` entry plus the atlas dimensions into UV
//! coordinates and relative sizing for one glyph.

use crate::error::EngineError;
use crate::math::Rect;

use super::{texture, xml, LoadTicket, ResourceMap, TextureUploader, XmlElement};

const IMAGE_EXT: &str = ".png";
const DESC_EXT: &str = ".fnt";

pub fn image_name(font_name: &str) -> String {
    format!("{font_name}{IMAGE_EXT}")
}

pub fn desc_name(font_name: &str) -> String {
    format!("{font_name}{DESC_EXT}")
}

/// Request both halves of the font. Returns the tickets of whichever
/// pipelines were actually started.
pub fn load(
    map: &mut ResourceMap,
    font_name: &str,
    uploader: TextureUploader,
) -> Vec<LoadTicket> {
    let mut tickets = Vec::new();
    if let Some(t) = texture::load(map, &image_name(font_name), uploader) {
        tickets.push(t);
    }
    if let Some(t) = xml::load(map, &desc_name(font_name)) {
        tickets.push(t);
    }
    tickets
}

/// Release one reference to each half. `true` when both were evicted.
pub fn unload(map: &mut ResourceMap, font_name: &str) -> bool {
    let image_gone = map.unload(&image_name(font_name));
    let desc_gone = map.unload(&desc_name(font_name));
    image_gone && desc_gone
}

pub fn has(map: &ResourceMap, font_name: &str) -> bool {
    map.has(&image_name(font_name)) && map.has(&desc_name(font_name))
}

/// Everything needed to place and texture one glyph quad.
///
/// Sizes are relative to the nominal character cell: a `width` of 1.0 means
/// the glyph's ink spans its full advance, `height` 1.0 spans the font's
/// base height. Offsets are in the same units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharInfo {
    /// The glyph's window into the atlas.
    pub uv: Rect,
    pub width: f32,
    pub height: f32,
    pub width_offset: f32,
    pub height_offset: f32,
    /// advance / base height; scales glyph quads when text is sized by height.
    pub aspect_ratio: f32,
}

/// Glyph info for `ch`, or `Ok(None)` when the font has no such glyph.
///
/// Fails with [`EngineError::NotLoaded`] if either half of the font is not
/// in the map.
pub fn char_info(
    map: &ResourceMap,
    font_name: &str,
    ch: char,
) -> Result<Option<CharInfo>, EngineError> {
    let tex = texture::get(map, &image_name(font_name))?;
    let desc = xml::get(map, &desc_name(font_name))?;
    char_info_from(desc, tex.width, tex.height, ch)
}

/// The descriptor-to-glyph math, separated from the resource lookups.
///
/// Pixel rectangles in the descriptor have a top-left origin; UVs here use
/// a bottom-left origin, so the vertical axis flips. Divisions are by
/// `dimension - 1` because both pixel endpoints are inclusive.
fn char_info_from(
    desc: &XmlElement,
    tex_w: u32,
    tex_h: u32,
    ch: char,
) -> Result<Option<CharInfo>, EngineError> {
    let common = desc.child("common").ok_or_else(|| EngineError::Parse {
        key: desc.tag.clone(),
        reason: "descriptor has no <common> element".to_string(),
    })?;
    let base_height = common.attr_f32("base")?;

    let id = (ch as u32).to_string();
    let Some(glyph) = desc
        .child("chars")
        .into_iter()
        .flat_map(|chars| chars.children_named("char"))
        .find(|c| c.attr("id") == Some(id.as_str()))
    else {
        return Ok(None);
    };

    let tex_w = (tex_w - 1) as f32;
    let tex_h = (tex_h - 1) as f32;

    let left_px = glyph.attr_f32("x")?;
    let right_px = left_px + glyph.attr_f32("width")? - 1.0;
    let top_px = tex_h - glyph.attr_f32("y")?;
    let bottom_px = top_px - glyph.attr_f32("height")? + 1.0;

    let advance = glyph.attr_f32("xadvance")?;
    Ok(Some(CharInfo {
        uv: Rect::new(
            left_px / tex_w,
            right_px / tex_w,
            bottom_px / tex_h,
            top_px / tex_h,
        ),
        width: glyph.attr_f32("width")? / advance,
        height: glyph.attr_f32("height")? / base_height,
        width_offset: glyph.attr_f32("xoffset")? / advance,
        height_offset: glyph.attr_f32("yoffset")? / base_height,
        aspect_ratio: advance / base_height,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::xml;

    const DESC: &str = r#"
        <font>
            <info face="system" size="32" />
            <common lineHeight="36" base="32" scaleW="128" scaleH="64" />
            <chars count="2">
                <char id="65" x="0" y="0" width="16" height="32"
                      xoffset="0" yoffset="0" xadvance="20" />
                <char id="66" x="16" y="0" width="12" height="30"
                      xoffset="2" yoffset="1" xadvance="16" />
            </chars>
        </font>"#;

    fn desc() -> XmlElement {
        xml::parse("system.fnt", DESC).unwrap()
    }

    #[test]
    fn glyph_uvs_flip_vertically_and_use_inclusive_endpoints() {
        let info = char_info_from(&desc(), 128, 64, 'A').unwrap().unwrap();
        assert_eq!(info.uv.left, 0.0);
        assert!((info.uv.right - 15.0 / 127.0).abs() < 1e-6);
        assert_eq!(info.uv.top, 1.0);
        assert!((info.uv.bottom - 32.0 / 63.0).abs() < 1e-6);
    }

    #[test]
    fn glyph_sizes_are_relative_to_advance_and_base() {
        let info = char_info_from(&desc(), 128, 64, 'A').unwrap().unwrap();
        assert!((info.width - 16.0 / 20.0).abs() < 1e-6);
        assert!((info.height - 1.0).abs() < 1e-6);
        assert!((info.aspect_ratio - 20.0 / 32.0).abs() < 1e-6);

        let b = char_info_from(&desc(), 128, 64, 'B').unwrap().unwrap();
        assert!((b.width_offset - 2.0 / 16.0).abs() < 1e-6);
        assert!((b.height_offset - 1.0 / 32.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_glyph_is_none() {
        assert_eq!(char_info_from(&desc(), 128, 64, 'z').unwrap(), None);
    }

    #[test]
    fn descriptor_without_common_fails() {
        let bad = xml::parse("bad.fnt", "<font><chars/></font>").unwrap();
        assert!(char_info_from(&bad, 128, 64, 'A').is_err());
    }

    #[test]
    fn composite_names() {
        assert_eq!(image_name("assets/fonts/system"), "assets/fonts/system.png");
        assert_eq!(desc_name("assets/fonts/system"), "assets/fonts/system.fnt");
    }
}
