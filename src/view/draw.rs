//! Geometry and the draw command list
//!
//! The viewport does not paint anything itself. Each render pass produces an
//! ordered list of `DrawCommand`s in host units (cells for the terminal host),
//! which the host paints front to back.
//!
//! Coordinates between `BeginScroll` and `EndScroll` are in content space:
//! the host maps them through the scroll offset and clips to the viewport.

use crate::primitives::styled_text::StyledLine;

/// A 2D point or size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `margin` on every side, never below zero size
    pub fn contracted_by(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            width: (self.width - 2.0 * margin).max(0.0),
            height: (self.height - 2.0 * margin).max(0.0),
        }
    }

    /// The rightmost `width` units
    pub fn right_part(&self, width: f32) -> Self {
        let width = width.min(self.width);
        Self {
            x: self.right() - width,
            width,
            ..*self
        }
    }

    /// The bottom `height` units
    pub fn bottom_part(&self, height: f32) -> Self {
        let height = height.min(self.height);
        Self {
            y: self.bottom() - height,
            height,
            ..*self
        }
    }

    /// A `width`-wide strip centered horizontally
    pub fn middle_part(&self, width: f32) -> Self {
        let width = width.min(self.width);
        Self {
            x: self.x + (self.width - width) * 0.5,
            width,
            ..*self
        }
    }

    /// Remove `height` units from the bottom
    pub fn trim_bottom(&self, height: f32) -> Self {
        Self {
            height: (self.height - height).max(0.0),
            ..*self
        }
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    pub fn intersect(&self, other: &Rect) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self {
            x,
            y,
            width: (right - x).max(0.0),
            height: (bottom - y).max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Color with straight alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }

    /// Same color with alpha multiplied by `factor`
    pub fn with_alpha(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Composite this color over an opaque `base`
    pub fn over(self, base: [u8; 3]) -> [u8; 3] {
        let mix = |top: u8, bottom: u8| -> u8 {
            let v = top as f32 * self.a + bottom as f32 * (1.0 - self.a);
            v.round().clamp(0.0, 255.0) as u8
        };
        [mix(self.r, base[0]), mix(self.g, base[1]), mix(self.b, base[2])]
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Horizontal alignment of label text inside its rect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// One step of a render pass
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    /// Rectangle outline
    StrokeRect {
        rect: Rect,
        color: Rgba,
        thickness: f32,
    },
    /// Styled lines starting at `origin`, one every `line_height`
    Code {
        origin: Vec2,
        line_height: f32,
        lines: Vec<StyledLine>,
    },
    /// Plain `\n`-separated text, one row every `line_height`
    Label {
        rect: Rect,
        text: String,
        color: Rgba,
        align: Align,
        line_height: f32,
    },
    /// Enter a scrolled region: `viewport` on screen shows `content` scrolled by `offset`
    BeginScroll {
        viewport: Rect,
        offset: Vec2,
        content: Vec2,
    },
    EndScroll,
    PushClip(Rect),
    PopClip,
    /// Floating "copy to clipboard" button
    CopyAffordance {
        rect: Rect,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_parts() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right_part(16.0), Rect::new(94.0, 20.0, 16.0, 50.0));
        assert_eq!(r.bottom_part(10.0), Rect::new(10.0, 60.0, 100.0, 10.0));
        assert_eq!(r.middle_part(20.0), Rect::new(50.0, 20.0, 20.0, 50.0));
        assert_eq!(r.contracted_by(4.0), Rect::new(14.0, 24.0, 92.0, 42.0));
        assert_eq!(r.trim_bottom(60.0).height, 0.0);
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 5.0, 5.0);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(
            a.intersect(&Rect::new(5.0, 5.0, 10.0, 10.0)),
            Rect::new(5.0, 5.0, 5.0, 5.0)
        );
    }

    #[test]
    fn test_alpha_compositing() {
        let gold = Rgba::rgb(255, 215, 0).with_alpha(0.0);
        assert_eq!(gold.over([10, 20, 30]), [10, 20, 30]);
        assert_eq!(Rgba::rgb(255, 215, 0).over([0, 0, 0]), [255, 215, 0]);
        let half = Rgba::rgb(200, 100, 0).with_alpha(0.5);
        assert_eq!(half.over([0, 0, 0]), [100, 50, 0]);
    }
}
