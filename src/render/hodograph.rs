//! Hodograph colored by height.
use super::text_style;
use crate::{analysis::Analysis, error::Result};
use metfor::{Knots, Meters, Quantity, WindUV};
use optional::Optioned;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

/// Only winds below this height are plotted.
pub const HODOGRAPH_TOP: Meters = Meters(10_000.0);

/// Height bands, bottom and top in meters, and their colors.
pub const HEIGHT_BANDS: [(f64, f64, RGBColor); 4] = [
    (0.0, 1_000.0, RGBColor(255, 0, 0)),
    (1_000.0, 3_000.0, RGBColor(0, 255, 0)),
    (3_000.0, 5_000.0, RGBColor(0, 128, 0)),
    (5_000.0, 10_000.0, RGBColor(148, 0, 211)),
];

const MAX_SPEED: f64 = 50.0;
const RING_SPACING: f64 = 10.0;

/// A piece of the hodograph trace within a single height band.
#[derive(Debug, Clone, PartialEq)]
pub struct HodographSegment {
    /// Index into `HEIGHT_BANDS`.
    pub band: usize,
    /// The (u, v) points in knots.
    pub points: Vec<(f64, f64)>,
}

/// Which levels are low enough to plot on the hodograph.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::render::hodograph_mask;
/// use metfor::Meters;
/// use optional::{none, some};
///
/// let hgt = vec![some(Meters(300.0)), none(), some(Meters(9_999.0)), some(Meters(10_000.0))];
/// assert_eq!(hodograph_mask(&hgt), vec![true, false, true, false]);
/// ```
pub fn hodograph_mask(heights: &[Optioned<Meters>]) -> Vec<bool> {
    heights
        .iter()
        .map(|h| h.into_option().map_or(false, |h| h < HODOGRAPH_TOP))
        .collect()
}

fn band_of(height: f64) -> Option<usize> {
    if height < 0.0 {
        return Some(0);
    }
    HEIGHT_BANDS
        .iter()
        .position(|&(bottom, top, _)| height >= bottom && height < top)
}

/// Split the trace into pieces by height band.
///
/// Where the trace crosses a band boundary a point is interpolated onto the boundary and shared
/// by the pieces on either side of it.
pub fn colormapped_segments(levels: &[(Meters, WindUV<Knots>)]) -> Vec<HodographSegment> {
    let mut segments: Vec<HodographSegment> = vec![];

    let mut push = |band: usize, start: (f64, f64), end: (f64, f64)| match segments.last_mut() {
        Some(seg) if seg.band == band && seg.points.last() == Some(&start) => seg.points.push(end),
        _ => segments.push(HodographSegment {
            band,
            points: vec![start, end],
        }),
    };

    for pair in levels.windows(2) {
        let (h0, w0) = pair[0];
        let (h1, w1) = pair[1];
        let (h0, h1) = (h0.unpack(), h1.unpack());
        let p0 = (w0.u.unpack(), w0.v.unpack());
        let p1 = (w1.u.unpack(), w1.v.unpack());

        // Band boundaries strictly between the two heights, in order from h0 to h1.
        let mut cuts: Vec<f64> = HEIGHT_BANDS
            .iter()
            .map(|&(_, top, _)| top)
            .filter(|&b| (b > h0.min(h1)) && (b < h0.max(h1)))
            .collect();
        if h1 < h0 {
            cuts.reverse();
        }

        let mut start = p0;
        let mut start_h = h0;
        for cut in cuts.into_iter().chain(std::iter::once(h1)) {
            let frac = if h1 == h0 { 1.0 } else { (cut - h0) / (h1 - h0) };
            let end = if cut == h1 {
                p1
            } else {
                (p0.0 + frac * (p1.0 - p0.0), p0.1 + frac * (p1.1 - p0.1))
            };

            if let Some(band) = band_of((start_h + cut) / 2.0) {
                push(band, start, end);
            }

            start = end;
            start_h = cut;
        }
    }

    segments
}

/// Levels to plot: masked by height and with both a height and a wind.
fn hodograph_levels(anal: &Analysis) -> Vec<(Meters, WindUV<Knots>)> {
    let snd = anal.sounding();
    let heights = snd.height_profile();

    heights
        .iter()
        .zip(hodograph_mask(heights))
        .zip(anal.wind_components())
        .filter(|((_, keep), _)| *keep)
        .filter_map(|((h, _), uv)| h.into_option().zip(*uv))
        .collect()
}

fn ring(radius: f64) -> Vec<(f64, f64)> {
    (0..=72)
        .map(|i| f64::from(i) * 5.0_f64.to_radians())
        .map(|a| (radius * a.cos(), radius * a.sin()))
        .collect()
}

pub(super) fn draw_hodograph<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    anal: &Analysis,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(25)
        .build_cartesian_2d(-MAX_SPEED..MAX_SPEED, -MAX_SPEED..MAX_SPEED)?;

    let grid = RGBColor(170, 170, 170);
    let rings = (1..=(MAX_SPEED / RING_SPACING) as i32).map(|i| f64::from(i) * RING_SPACING);
    chart.draw_series(rings.clone().map(|r| PathElement::new(ring(r), grid.stroke_width(1))))?;
    chart.draw_series([
        PathElement::new(vec![(-MAX_SPEED, 0.0), (MAX_SPEED, 0.0)], grid.stroke_width(1)),
        PathElement::new(vec![(0.0, -MAX_SPEED), (0.0, MAX_SPEED)], grid.stroke_width(1)),
    ])?;

    let label_style = text_style(12.0, &RGBColor(90, 90, 90), Pos::new(HPos::Left, VPos::Top));
    for r in rings {
        let offset = r * std::f64::consts::FRAC_1_SQRT_2;
        let (x, y) = chart.backend_coord(&(offset, -offset));
        root.draw(&Text::new(format!("{} kt", r), (x + 2, y + 2), label_style.clone()))?;
    }

    for seg in colormapped_segments(&hodograph_levels(anal)) {
        let (_, _, color) = HEIGHT_BANDS[seg.band];
        chart.draw_series(std::iter::once(PathElement::new(
            seg.points,
            color.stroke_width(2),
        )))?;
    }

    let (x0, y0) = area.get_base_pixel();
    root.draw(&Text::new(
        "Hodograph (kt)",
        (x0 + 10, y0 + 5),
        text_style(16.0, &BLACK, Pos::new(HPos::Left, VPos::Top)),
    ))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use optional::{none, some};

    fn level(h: f64, u: f64, v: f64) -> (Meters, WindUV<Knots>) {
        (
            Meters(h),
            WindUV {
                u: Knots(u),
                v: Knots(v),
            },
        )
    }

    #[test]
    fn test_hodograph_mask() {
        let hgt: Vec<Optioned<Meters>> = vec![
            some(Meters(100.0)),
            some(Meters(5_000.0)),
            some(Meters(9_999.9)),
            some(Meters(10_000.0)),
            none(),
            some(Meters(15_000.0)),
        ];

        assert_eq!(
            hodograph_mask(&hgt),
            vec![true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_segments_split_at_band_boundaries() {
        let levels = vec![
            level(0.0, 0.0, 0.0),
            level(2_000.0, 20.0, 0.0),
            level(4_000.0, 20.0, 20.0),
        ];

        let segs = colormapped_segments(&levels);
        let bands: Vec<usize> = segs.iter().map(|s| s.band).collect();
        assert_eq!(bands, vec![0, 1, 2]);

        // 1 km is halfway to the second level.
        assert_eq!(segs[0].points, vec![(0.0, 0.0), (10.0, 0.0)]);
        // The 1-3 km band includes the 2 km level.
        assert_eq!(
            segs[1].points,
            vec![(10.0, 0.0), (20.0, 0.0), (20.0, 10.0)]
        );
        assert_eq!(segs[2].points, vec![(20.0, 10.0), (20.0, 20.0)]);
    }

    #[test]
    fn test_segments_within_a_band() {
        let levels = vec![
            level(5_500.0, 0.0, 0.0),
            level(6_000.0, 10.0, 0.0),
            level(7_000.0, 20.0, 0.0),
        ];

        let segs = colormapped_segments(&levels);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].band, 3);
        assert_eq!(segs[0].points.len(), 3);

        assert!(colormapped_segments(&levels[..1]).is_empty());
    }
}
