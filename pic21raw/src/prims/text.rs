//!
//! # Text
//!
//! Block-letter text drawn in a 5x7 pixel font, one rectangle per horizontal run of pixels.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};

// Local Imports
use super::positive;
use crate::component::Component;
use crate::ctx::Ctx;
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{um, Int, Point, Rect};
use crate::layers::LayerRef;

/// Glyph rows, top to bottom. Bit 4 is the leftmost column.
type Glyph = [u8; 7];

const FONT: &[(char, Glyph)] = &[
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    ('A', [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11]),
    ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
    ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
    ('D', [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C]),
    ('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
    ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
    ('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
    ('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
    ('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
    ('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
    ('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
    ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
    ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
    ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
    ('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04]),
    ('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
    ('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
    ('_', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
];

fn glyph(c: char) -> LayoutResult<&'static Glyph> {
    let c = c.to_ascii_uppercase();
    FONT.iter()
        .find(|(k, _)| *k == c)
        .map(|(_, g)| g)
        .ok_or_else(|| LayoutError::InvalidParam(format!("No glyph for character {:?}", c)))
}

/// Horizontal text justification, relative to `position`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// # Text Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TextParams {
    pub text: String,
    /// Character height in microns
    pub size: f64,
    /// Lower-left (for left-justified text) of the first line, in microns
    pub position: (f64, f64),
    pub justify: Justify,
    pub layer: LayerRef,
}
impl Default for TextParams {
    fn default() -> Self {
        Self {
            text: "abcd".into(),
            size: 10.0,
            position: (0.0, 0.0),
            justify: Justify::Left,
            layer: "WG".into(),
        }
    }
}

/// Text, with successive lines separated by `\n` stacked downward
pub fn text(ctx: &Ctx, params: &TextParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("text", params, |ctx, comp| {
        positive("size", params.size)?;
        let layer = ctx.layer(&params.layer)?;
        let px = um(params.size / 7.0);
        let origin = Point::um(params.position.0, params.position.1);

        for (line_num, line) in params.text.split('\n').enumerate() {
            let glyphs = line.chars().map(glyph).collect::<LayoutResult<Vec<_>>>()?;
            let width = (6 * glyphs.len() as Int - 1).max(0) * px;
            let x0 = match params.justify {
                Justify::Left => origin.x,
                Justify::Center => origin.x - width / 2,
                Justify::Right => origin.x - width,
            };
            let y0 = origin.y - 9 * px * line_num as Int;
            for (idx, g) in glyphs.iter().enumerate() {
                let gx = x0 + 6 * px * idx as Int;
                for (row, bits) in g.iter().enumerate() {
                    let y = y0 + (6 - row as Int) * px;
                    let mut col = 0;
                    while col < 5 {
                        if bits & (0x10 >> col) == 0 {
                            col += 1;
                            continue;
                        }
                        let start = col;
                        while col < 5 && bits & (0x10 >> col) != 0 {
                            col += 1;
                        }
                        comp.add_rect(
                            layer,
                            Rect::new(
                                Point::new(gx + start * px, y),
                                Point::new(gx + col * px, y + px),
                            ),
                        );
                    }
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, Pdk};

    #[test]
    fn test_text_one() -> LayoutResult<()> {
        let ctx = Ctx::new(EngineConfig::default(), Pdk::generic()?)?;
        let params = TextParams {
            text: "1".into(),
            size: 7.0,
            ..Default::default()
        };
        let t = text(&ctx, &params)?;
        // Seven rows, each a single run
        assert_eq!(t.elems.len(), 7);
        let b = t.bbox();
        assert_eq!(b.p0, Point::new(1000, 0));
        assert_eq!(b.p1, Point::new(4000, 7000));
        Ok(())
    }
    #[test]
    fn test_unknown_glyph() -> LayoutResult<()> {
        let ctx = Ctx::new(EngineConfig::default(), Pdk::generic()?)?;
        let params = TextParams {
            text: "a~".into(),
            ..Default::default()
        };
        assert!(matches!(text(&ctx, &params), Err(LayoutError::InvalidParam(_))));
        Ok(())
    }
}
