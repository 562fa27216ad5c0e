use crate::coords::Vec2;

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

impl SpreadMode {
    /// Maps an unbounded gradient parameter into [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            SpreadMode::Pad => t.clamp(0.0, 1.0),
            SpreadMode::Repeat => t - t.floor(),
            SpreadMode::Reflect => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 { 2.0 - m } else { m }
            }
        }
    }
}

/// A single gradient stop.
///
/// `t` is expected in [0, 1]; stops are expected in ascending `t` order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient definition.
///
/// Semantics:
/// - `start` and `end` are positions in the space the gradient is sampled in.
/// - Stops define premultiplied linear colors.
/// - `spread` defines out-of-range behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self {
            start,
            end,
            stops,
            spread,
        }
    }

    /// Two-stop gradient from `start_color` at `start` to `end_color` at `end`.
    pub fn two_stop(start: Vec2, start_color: Color, end: Vec2, end_color: Color) -> Self {
        Self::new(
            start,
            end,
            vec![ColorStop::new(0.0, start_color), ColorStop::new(1.0, end_color)],
            SpreadMode::Pad,
        )
    }

    /// Returns true when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }

    /// Gradient parameter of `p`: its projection onto the start→end axis,
    /// with spread applied.
    ///
    /// A degenerate axis (start == end) yields `0`.
    pub fn param_at(&self, p: Vec2) -> f32 {
        let axis = self.end - self.start;
        let len_sq = axis.dot(axis);
        if len_sq <= f32::EPSILON {
            return 0.0;
        }
        self.spread.apply((p - self.start).dot(axis) / len_sq)
    }

    /// Samples the gradient color at `p`.
    ///
    /// No stops yields transparent; a single stop is treated as solid.
    pub fn color_at(&self, p: Vec2) -> Color {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Color::TRANSPARENT,
        };

        let t = self.param_at(p);
        if t <= first.t {
            return first.color;
        }
        if t >= last.t {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.t) / span);
            }
        }

        last.color
    }
}
