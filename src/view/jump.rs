//! Deferred scroll-to-match requests
//!
//! Navigation does not scroll directly. It queues a `PendingJump`, and the
//! next render pass consumes it once the viewport geometry is known. A queued
//! jump is applied at most once and is always cleared by that attempt.

use crate::view::draw::Vec2;

/// Where to scroll: a line to bring into view and/or a horizontal position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JumpTarget {
    pub line: Option<usize>,
    /// Content-space x of the match start
    pub x: Option<f32>,
}

/// One-shot jump request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PendingJump {
    #[default]
    Idle,
    Pending(JumpTarget),
    /// The last request was taken by a render pass
    Consumed,
}

impl PendingJump {
    pub fn queue(&mut self, target: JumpTarget) {
        *self = Self::Pending(target);
    }

    /// Take the pending target, if any. Leaves the state `Consumed` when a
    /// target was taken.
    pub fn take(&mut self) -> Option<JumpTarget> {
        match *self {
            Self::Pending(target) => {
                *self = Self::Consumed;
                Some(target)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Viewport geometry a jump is resolved against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpFrame {
    pub line_height: f32,
    pub visible_width: f32,
    pub visible_height: f32,
    pub content_width: f32,
    pub content_height: f32,
    /// Margin kept between the target and the viewport edge
    pub padding: f32,
}

/// Adjust `scroll` so the target is inside the padded visible band.
///
/// Vertically, a target above the band snaps to its top; a target below is
/// brought up to the bottom edge. Horizontally, a target left of the band
/// snaps to its left edge; one to the right is centered.
pub fn apply(target: &JumpTarget, scroll: &mut Vec2, frame: &JumpFrame) {
    let pad = frame.padding;

    if let Some(line) = target.line {
        if frame.visible_height > 0.0 {
            let line_top = line as f32 * frame.line_height;
            let line_bottom = line_top + frame.line_height;
            let view_top = scroll.y;
            let view_bottom = view_top + frame.visible_height;

            let inside = line_top >= view_top + pad && line_bottom <= view_bottom - pad;
            if !inside {
                scroll.y = if line_top < view_top + pad {
                    (line_top - pad).max(0.0)
                } else {
                    (frame.content_height - frame.visible_height)
                        .max(0.0)
                        .min(line_bottom + pad - frame.visible_height)
                };
            }
        }
    }

    if let Some(x) = target.x {
        if frame.visible_width > 0.0 {
            let view_left = scroll.x;
            let view_right = view_left + frame.visible_width;

            let inside = x >= view_left + pad && x <= view_right - pad;
            if !inside {
                scroll.x = if x < view_left + pad {
                    (x - pad).max(0.0)
                } else {
                    (frame.content_width - frame.visible_width)
                        .max(0.0)
                        .min(x - frame.visible_width * 0.5)
                };
            }
        }
    }
}

/// Clamp both axes to `[0, max(0, content - visible)]`
pub fn clamp_scroll(scroll: &mut Vec2, content: Vec2, visible: Vec2) {
    scroll.x = scroll.x.clamp(0.0, (content.x - visible.x).max(0.0));
    scroll.y = scroll.y.clamp(0.0, (content.y - visible.y).max(0.0));
}
