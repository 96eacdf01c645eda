//! Block-letter glyph table on a 4 x 6 grid.
//!
//! Every glyph is a short list of strokes in grid units (origin bottom-left).
//! Segments become thin bars, blocks become filled rectangles; the text demo
//! turns each part into one scaled box.

use glam::Vec2;

pub const GRID_WIDTH: f32 = 4.0;
pub const GRID_HEIGHT: f32 = 6.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Stroke {
    Segment { from: Vec2, to: Vec2 },
    Block { min: Vec2, max: Vec2 },
}

/// Placed rectangle in grid units: centered, sized, rotated about Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Part {
    pub center: Vec2,
    pub size: Vec2,
    pub angle: f32,
}

impl Stroke {
    /// Segments are extended by `thickness` so adjoining bars overlap at joints.
    pub fn part(&self, thickness: f32) -> Part {
        match *self {
            Stroke::Segment { from, to } => {
                let d = to - from;
                Part {
                    center: (from + to) * 0.5,
                    size: Vec2::new(d.length() + thickness, thickness),
                    angle: d.y.atan2(d.x),
                }
            }
            Stroke::Block { min, max } => Part {
                center: (min + max) * 0.5,
                size: max - min,
                angle: 0.0,
            },
        }
    }
}

const fn s(ax: f32, ay: f32, bx: f32, by: f32) -> Stroke {
    Stroke::Segment { from: Vec2::new(ax, ay), to: Vec2::new(bx, by) }
}

/// Drawn for characters missing from the table.
pub const FALLBACK: [Stroke; 1] = [Stroke::Block { min: Vec2::new(0.5, 0.5), max: Vec2::new(3.5, 5.5) }];

const A: &[Stroke] = &[s(0., 0., 2., 6.), s(2., 6., 4., 0.), s(1., 3., 3., 3.)];
const B: &[Stroke] = &[
    s(0., 0., 0., 6.), s(0., 6., 3., 6.), s(3., 6., 3., 3.),
    s(0., 3., 4., 3.), s(4., 3., 4., 0.), s(0., 0., 4., 0.),
];
const C: &[Stroke] = &[s(4., 6., 0., 6.), s(0., 6., 0., 0.), s(0., 0., 4., 0.)];
const D: &[Stroke] = &[
    s(0., 0., 0., 6.), s(0., 6., 3., 6.), s(3., 6., 4., 4.),
    s(4., 4., 4., 2.), s(4., 2., 3., 0.), s(3., 0., 0., 0.),
];
const E: &[Stroke] = &[s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(0., 3., 3., 3.), s(0., 0., 4., 0.)];
const F: &[Stroke] = &[s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(0., 3., 3., 3.)];
const G: &[Stroke] = &[
    s(4., 6., 0., 6.), s(0., 6., 0., 0.), s(0., 0., 4., 0.),
    s(4., 0., 4., 3.), s(4., 3., 2., 3.),
];
const H: &[Stroke] = &[s(0., 0., 0., 6.), s(4., 0., 4., 6.), s(0., 3., 4., 3.)];
const I: &[Stroke] = &[s(2., 0., 2., 6.), s(1., 6., 3., 6.), s(1., 0., 3., 0.)];
const J: &[Stroke] = &[s(4., 6., 4., 0.), s(4., 0., 0., 0.), s(0., 0., 0., 2.)];
const K: &[Stroke] = &[s(0., 0., 0., 6.), s(0., 3., 4., 6.), s(0., 3., 4., 0.)];
const L: &[Stroke] = &[s(0., 6., 0., 0.), s(0., 0., 4., 0.)];
const M: &[Stroke] = &[s(0., 0., 0., 6.), s(0., 6., 2., 3.), s(2., 3., 4., 6.), s(4., 6., 4., 0.)];
const N: &[Stroke] = &[s(0., 0., 0., 6.), s(0., 6., 4., 0.), s(4., 0., 4., 6.)];
const O: &[Stroke] = &[s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(4., 6., 4., 0.), s(4., 0., 0., 0.)];
const P: &[Stroke] = &[s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(4., 6., 4., 3.), s(4., 3., 0., 3.)];
const Q: &[Stroke] = &[
    s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(4., 6., 4., 0.),
    s(4., 0., 0., 0.), s(2., 2., 4., 0.),
];
const R: &[Stroke] = &[
    s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(4., 6., 4., 3.),
    s(4., 3., 0., 3.), s(1., 3., 4., 0.),
];
const S: &[Stroke] = &[
    s(4., 6., 0., 6.), s(0., 6., 0., 3.), s(0., 3., 4., 3.),
    s(4., 3., 4., 0.), s(4., 0., 0., 0.),
];
const T: &[Stroke] = &[s(0., 6., 4., 6.), s(2., 6., 2., 0.)];
const U: &[Stroke] = &[s(0., 6., 0., 0.), s(0., 0., 4., 0.), s(4., 0., 4., 6.)];
const V: &[Stroke] = &[s(0., 6., 2., 0.), s(2., 0., 4., 6.)];
const W: &[Stroke] = &[s(0., 6., 1., 0.), s(1., 0., 2., 3.), s(2., 3., 3., 0.), s(3., 0., 4., 6.)];
const X: &[Stroke] = &[s(0., 0., 4., 6.), s(0., 6., 4., 0.)];
const Y: &[Stroke] = &[s(0., 6., 2., 3.), s(4., 6., 2., 3.), s(2., 3., 2., 0.)];
const Z: &[Stroke] = &[s(0., 6., 4., 6.), s(4., 6., 0., 0.), s(0., 0., 4., 0.)];

const D0: &[Stroke] = &[
    s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(4., 6., 4., 0.),
    s(4., 0., 0., 0.), s(0., 0., 4., 6.),
];
const D1: &[Stroke] = &[s(2., 0., 2., 6.), s(2., 6., 1., 5.), s(1., 0., 3., 0.)];
const D2: &[Stroke] = &[
    s(0., 6., 4., 6.), s(4., 6., 4., 3.), s(4., 3., 0., 3.),
    s(0., 3., 0., 0.), s(0., 0., 4., 0.),
];
const D3: &[Stroke] = &[s(0., 6., 4., 6.), s(4., 6., 4., 0.), s(4., 0., 0., 0.), s(1., 3., 4., 3.)];
const D4: &[Stroke] = &[s(0., 6., 0., 3.), s(0., 3., 4., 3.), s(4., 6., 4., 0.)];
const D6: &[Stroke] = &[
    s(4., 6., 0., 6.), s(0., 6., 0., 0.), s(0., 0., 4., 0.),
    s(4., 0., 4., 3.), s(4., 3., 0., 3.),
];
const D7: &[Stroke] = &[s(0., 6., 4., 6.), s(4., 6., 1., 0.)];
const D8: &[Stroke] = &[
    s(0., 0., 0., 6.), s(0., 6., 4., 6.), s(4., 6., 4., 0.),
    s(4., 0., 0., 0.), s(0., 3., 4., 3.),
];
const D9: &[Stroke] = &[
    s(4., 3., 0., 3.), s(0., 3., 0., 6.), s(0., 6., 4., 6.),
    s(4., 6., 4., 0.), s(4., 0., 0., 0.),
];

/// Strokes for `c`. Letters are case-insensitive; space has none.
pub fn strokes(c: char) -> &'static [Stroke] {
    match c.to_ascii_uppercase() {
        ' ' => &[],
        'A' => A,
        'B' => B,
        'C' => C,
        'D' => D,
        'E' => E,
        'F' => F,
        'G' => G,
        'H' => H,
        'I' => I,
        'J' => J,
        'K' => K,
        'L' => L,
        'M' => M,
        'N' => N,
        'O' => O,
        'P' => P,
        'Q' => Q,
        'R' => R,
        'S' | '5' => S,
        'T' => T,
        'U' => U,
        'V' => V,
        'W' => W,
        'X' => X,
        'Y' => Y,
        'Z' => Z,
        '0' => D0,
        '1' => D1,
        '2' => D2,
        '3' => D3,
        '4' => D4,
        '6' => D6,
        '7' => D7,
        '8' => D8,
        '9' => D9,
        _ => &FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_grid(p: Vec2) -> bool {
        (0.0..=GRID_WIDTH).contains(&p.x) && (0.0..=GRID_HEIGHT).contains(&p.y)
    }

    #[test]
    fn letters_and_digits_are_defined_inside_the_grid() {
        for c in ('A'..='Z').chain('0'..='9') {
            let glyph = strokes(c);
            assert!(!glyph.is_empty(), "{c} has no strokes");
            assert_ne!(glyph, &FALLBACK[..], "{c} falls back");
            for stroke in glyph {
                let (a, b) = match *stroke {
                    Stroke::Segment { from, to } => (from, to),
                    Stroke::Block { min, max } => (min, max),
                };
                assert!(in_grid(a) && in_grid(b), "{c}: {stroke:?} leaves the grid");
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(strokes('q'), strokes('Q'));
        assert!(strokes(' ').is_empty());
        assert_eq!(strokes('?'), &FALLBACK[..]);
        assert_eq!(strokes('é'), &FALLBACK[..]);
    }

    #[test]
    fn segment_part_spans_its_endpoints() {
        let part = s(0.0, 0.0, 4.0, 6.0).part(0.5);
        assert_eq!(part.center, Vec2::new(2.0, 3.0));
        assert!((part.size.x - (52.0_f32.sqrt() + 0.5)).abs() < 1e-5);
        assert_eq!(part.size.y, 0.5);
        assert!((part.angle - 6.0_f32.atan2(4.0)).abs() < 1e-6);

        let block = FALLBACK[0].part(0.5);
        assert_eq!(block.size, Vec2::new(3.0, 5.0));
        assert_eq!(block.angle, 0.0);
    }
}
