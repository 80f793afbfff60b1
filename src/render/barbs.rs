//! Wind barbs.
use crate::error::Result;
use metfor::{Knots, Quantity, WindSpdDir};
use plotters::{
    coord::types::RangedCoordf64,
    prelude::*,
};

/// A piece of a wind barb in pixel offsets from the station, y increasing downward.
#[derive(Debug, Clone, PartialEq)]
pub enum BarbPart {
    /// The shaft, a full barb, or a half barb.
    Line(Vec<(f64, f64)>),
    /// A filled 50 kt flag.
    Pennant([(f64, f64); 3]),
    /// Calm wind, a circle with this radius.
    Calm(f64),
}

/// The number of pennants, full barbs, and half barbs for a wind speed.
///
/// The speed is rounded to the nearest 5 knots first.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::render::barb_counts;
/// use metfor::Knots;
///
/// assert_eq!(barb_counts(Knots(65.0)), (1, 1, 1));
/// assert_eq!(barb_counts(Knots(23.0)), (0, 2, 1));
/// assert_eq!(barb_counts(Knots(2.0)), (0, 0, 0));
/// ```
pub fn barb_counts(speed: Knots) -> (u32, u32, u32) {
    let rounded = ((speed.unpack() / 5.0).round().max(0.0) * 5.0) as u32;

    let pennants = rounded / 50;
    let barbs = (rounded % 50) / 10;
    let half = (rounded % 10) / 5;

    (pennants, barbs, half)
}

/// Geometry of a barb with a shaft `length` pixels long.
///
/// The shaft points toward the direction the wind is coming from and the flags sit on the
/// clockwise side of it.
pub fn barb_parts(wind: WindSpdDir<Knots>, length: f64) -> Vec<BarbPart> {
    let (pennants, barbs, half) = barb_counts(wind.speed);
    if pennants + barbs + half == 0 {
        return vec![BarbPart::Calm(length / 5.0)];
    }

    let dir = wind.direction.to_radians();
    // Unit vector along the shaft and perpendicular to it, in screen coordinates.
    let (sx, sy) = (dir.sin(), -dir.cos());
    let (nx, ny) = (dir.cos(), dir.sin());

    let flag = length * 0.4;
    let spacing = length * 0.15;
    let along = |d: f64| (sx * d, sy * d);
    let out = |(x, y): (f64, f64), d: f64, back: f64| {
        (x + nx * d - sx * back, y + ny * d - sy * back)
    };

    let mut parts = vec![BarbPart::Line(vec![(0.0, 0.0), along(length)])];
    let mut pos = length;

    for _ in 0..pennants {
        let base = along(pos);
        let tail = along(pos - spacing);
        parts.push(BarbPart::Pennant([base, out(base, flag, spacing * 0.5), tail]));
        pos -= spacing * 1.25;
    }

    for _ in 0..barbs {
        let base = along(pos);
        parts.push(BarbPart::Line(vec![base, out(base, flag, -spacing * 0.5)]));
        pos -= spacing;
    }

    if half > 0 {
        // A lone half barb sits away from the end of the shaft.
        if pennants + barbs == 0 {
            pos -= spacing;
        }
        let base = along(pos);
        parts.push(BarbPart::Line(vec![base, out(base, flag * 0.5, -spacing * 0.25)]));
    }

    parts
}

fn to_pixels(pnt: (f64, f64)) -> (i32, i32) {
    (pnt.0.round() as i32, pnt.1.round() as i32)
}

/// Draw barbs anchored at chart coordinates.
pub(super) fn draw_barbs<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    levels: &[((f64, f64), WindSpdDir<Knots>)],
    length: f64,
) -> Result<()> {
    for &(anchor, wind) in levels {
        for part in barb_parts(wind, length) {
            match part {
                BarbPart::Line(pnts) => {
                    let pnts: Vec<(i32, i32)> = pnts.into_iter().map(to_pixels).collect();
                    chart.draw_series(std::iter::once(
                        EmptyElement::at(anchor) + PathElement::new(pnts, BLACK.stroke_width(1)),
                    ))?;
                }
                BarbPart::Pennant(pnts) => {
                    let pnts: Vec<(i32, i32)> = pnts.iter().copied().map(to_pixels).collect();
                    chart.draw_series(std::iter::once(
                        EmptyElement::at(anchor) + Polygon::new(pnts, BLACK.filled()),
                    ))?;
                }
                BarbPart::Calm(radius) => {
                    chart.draw_series(std::iter::once(
                        EmptyElement::at(anchor)
                            + Circle::new((0, 0), radius.round() as i32, BLACK.stroke_width(1)),
                    ))?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn wind(direction: f64, speed: f64) -> WindSpdDir<Knots> {
        WindSpdDir {
            speed: Knots(speed),
            direction,
        }
    }

    #[test]
    fn test_barb_counts() {
        assert_eq!(barb_counts(Knots(0.0)), (0, 0, 0));
        assert_eq!(barb_counts(Knots(5.0)), (0, 0, 1));
        assert_eq!(barb_counts(Knots(12.4)), (0, 1, 0));
        assert_eq!(barb_counts(Knots(12.5)), (0, 1, 1));
        assert_eq!(barb_counts(Knots(50.0)), (1, 0, 0));
        assert_eq!(barb_counts(Knots(147.0)), (2, 4, 1));
    }

    #[test]
    fn test_calm() {
        assert_eq!(barb_parts(wind(0.0, 1.0), 20.0), vec![BarbPart::Calm(4.0)]);
    }

    #[test]
    fn test_barb_geometry() {
        // A westerly at 65 kt: shaft, one pennant, one barb, one half barb.
        let parts = barb_parts(wind(270.0, 65.0), 20.0);
        assert_eq!(parts.len(), 4);

        match &parts[0] {
            BarbPart::Line(pnts) => {
                // The shaft points west, toward where the wind comes from.
                let (x, y) = pnts[1];
                assert!((x - -20.0).abs() < 1.0e-9);
                assert!(y.abs() < 1.0e-9);
            }
            other => panic!("unexpected {:?}", other),
        }

        match &parts[1] {
            BarbPart::Pennant(pnts) => {
                // Flags go on the north side, up on the screen.
                assert!(pnts[1].1 < 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(parts[2], BarbPart::Line(_)));
        assert!(matches!(parts[3], BarbPart::Line(_)));
    }
}
