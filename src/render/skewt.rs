//! Skew-T log-P diagram.
use super::{barbs, left_top, text_style};
use crate::{analysis::Analysis, error::Result};
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};
use optional::Optioned;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

/// Pressure at the bottom of the diagram.
pub const BOTTOM_PRESSURE: HectoPascal = HectoPascal(1020.0);
/// Pressure at the top of the diagram.
pub const TOP_PRESSURE: HectoPascal = HectoPascal(100.0);
/// Wind barbs are only drawn at pressures greater than this, so they stay clear of the title.
pub const BARB_CUTOFF: HectoPascal = HectoPascal(105.0);

const MIN_T: f64 = -50.0;
const MAX_T: f64 = 50.0;

const ISOBARS: [f64; 9] = [1000.0, 925.0, 850.0, 700.0, 500.0, 400.0, 300.0, 200.0, 100.0];
const MIXING_RATIOS: [f64; 8] = [0.4, 1.0, 2.0, 4.0, 7.0, 10.0, 16.0, 24.0];

/// Which levels get a wind barb.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::render::barb_mask;
/// use metfor::HectoPascal;
/// use optional::{none, some};
///
/// let pressure = vec![
///     some(HectoPascal(1000.0)),
///     some(HectoPascal(105.0)),
///     none(),
///     some(HectoPascal(100.0)),
/// ];
/// assert_eq!(barb_mask(&pressure), vec![true, false, false, false]);
/// ```
pub fn barb_mask(pressure: &[Optioned<HectoPascal>]) -> Vec<bool> {
    pressure
        .iter()
        .map(|p| p.into_option().map_or(false, |p| p > BARB_CUTOFF))
        .collect()
}

/// Map pressure and temperature to diagram coordinates.
///
/// The vertical coordinate is `ln(p_bottom / p)` and the horizontal coordinate is the temperature
/// shifted to the right in proportion to the vertical coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewTransform {
    skew: f64,
}

impl SkewTransform {
    /// Choose the skew so isotherms are drawn at 45 degrees on a plot of this size in pixels.
    pub fn for_pixels(width: u32, height: u32) -> Self {
        let x_span = MAX_T - MIN_T;
        let y_span = Self::y_top();
        let skew = if width == 0 {
            0.0
        } else {
            x_span * f64::from(height) / (f64::from(width) * y_span)
        };

        SkewTransform { skew }
    }

    /// Vertical coordinate of the top of the diagram.
    pub fn y_top() -> f64 {
        (BOTTOM_PRESSURE.unpack() / TOP_PRESSURE.unpack()).ln()
    }

    /// Horizontal range of the diagram.
    pub fn x_range() -> std::ops::Range<f64> {
        MIN_T..MAX_T
    }

    /// Convert a pressure and temperature into diagram coordinates.
    pub fn to_xy(&self, p: HectoPascal, t: Celsius) -> (f64, f64) {
        let y = log_p(p);
        (t.unpack() + self.skew * y, y)
    }
}

fn log_p(p: HectoPascal) -> f64 {
    (BOTTOM_PRESSURE.unpack() / p.unpack()).ln()
}

/// Clip a line to a box, splitting it into pieces where it leaves and re-enters.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::render::clip_polyline;
///
/// let line = vec![(-2.0, 0.5), (0.5, 0.5), (0.5, 2.0)];
/// let pieces = clip_polyline(&line, (0.0, 1.0), (0.0, 1.0));
///
/// assert_eq!(pieces, vec![vec![(0.0, 0.5), (0.5, 0.5), (0.5, 1.0)]]);
/// ```
pub fn clip_polyline(
    points: &[(f64, f64)],
    x_lim: (f64, f64),
    y_lim: (f64, f64),
) -> Vec<Vec<(f64, f64)>> {
    let mut pieces: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], x_lim, y_lim) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    if current.len() > 1 {
                        pieces.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(start);
                }
                current.push(end);
            }
            None => {
                if current.len() > 1 {
                    pieces.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }

    if current.len() > 1 {
        pieces.push(current);
    }

    pieces
}

#[derive(Clone, Copy)]
enum Edge {
    X(f64),
    Y(f64),
}

// Liang-Barsky, points where the segment is cut land exactly on the edge of the box.
fn clip_segment(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    (xmin, xmax): (f64, f64),
    (ymin, ymax): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = x1 - x0;
    let dy = y1 - y0;

    let mut t0 = (0.0f64, None);
    let mut t1 = (1.0f64, None);

    for (p, q, edge) in [
        (-dx, x0 - xmin, Edge::X(xmin)),
        (dx, xmax - x0, Edge::X(xmax)),
        (-dy, y0 - ymin, Edge::Y(ymin)),
        (dy, ymax - y0, Edge::Y(ymax)),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 && r > t0.0 {
                t0 = (r, Some(edge));
            } else if p > 0.0 && r < t1.0 {
                t1 = (r, Some(edge));
            }
        }
    }

    if t0.0 > t1.0 {
        return None;
    }

    let at = |(t, edge): (f64, Option<Edge>)| {
        let (x, y) = if t == 0.0 {
            (x0, y0)
        } else if t == 1.0 {
            (x1, y1)
        } else {
            (x0 + t * dx, y0 + t * dy)
        };

        match edge {
            Some(Edge::X(x)) => (x, y),
            Some(Edge::Y(y)) => (x, y),
            None => (x, y),
        }
    };

    Some((at(t0), at(t1)))
}

/// Pressures from the bottom of the diagram to `top` every 10 hPa.
fn pressure_levels(top: HectoPascal) -> impl Iterator<Item = HectoPascal> {
    let bottom = BOTTOM_PRESSURE.unpack() as i32;
    let top = top.unpack() as i32;
    (top..=bottom)
        .rev()
        .step_by(10)
        .map(|p| HectoPascal(f64::from(p)))
}

fn dry_adiabats() -> Vec<Vec<(HectoPascal, Celsius)>> {
    (-4..=21)
        .map(|i| Kelvin::from(Celsius(f64::from(i) * 10.0)))
        .map(|theta| {
            pressure_levels(TOP_PRESSURE)
                .map(|p| (p, Celsius::from(metfor::temperature_from_pot_temp(theta, p))))
                .collect()
        })
        .collect()
}

fn moist_adiabats() -> Vec<Vec<(HectoPascal, Celsius)>> {
    (-5..=10)
        .map(|i| Celsius(f64::from(i) * 4.0))
        .filter_map(|t| metfor::equiv_pot_temperature(t, t, HectoPascal(1000.0)))
        .map(|theta_e| {
            pressure_levels(HectoPascal(200.0))
                .filter_map(|p| {
                    metfor::temperature_from_equiv_pot_temp_saturated_and_pressure(p, theta_e)
                        .map(|t| (p, Celsius::from(t)))
                })
                .collect()
        })
        .collect()
}

fn mixing_lines() -> Vec<Vec<(HectoPascal, Celsius)>> {
    MIXING_RATIOS
        .iter()
        .map(|&mw| {
            pressure_levels(HectoPascal(600.0))
                .filter_map(|p| metfor::dew_point_from_p_and_mw(p, mw / 1000.0).map(|dp| (p, dp)))
                .collect()
        })
        .collect()
}

fn isotherms() -> Vec<Vec<(HectoPascal, Celsius)>> {
    (-16..=5)
        .map(|i| Celsius(f64::from(i) * 10.0))
        .map(|t| vec![(BOTTOM_PRESSURE, t), (TOP_PRESSURE, t)])
        .collect()
}

/// Split a profile into connected pieces at the missing values.
fn profile_pieces(
    pressure: &[Optioned<HectoPascal>],
    values: &[Optioned<Celsius>],
) -> Vec<Vec<(HectoPascal, Celsius)>> {
    let mut pieces = vec![];
    let mut current = vec![];

    for (p, t) in pressure.iter().zip(values) {
        match p.into_option().zip(t.into_option()) {
            Some(pnt) => current.push(pnt),
            None if !current.is_empty() => pieces.push(std::mem::take(&mut current)),
            None => {}
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

pub(super) fn draw_skewt<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    anal: &Analysis,
) -> Result<()> {
    let snd = anal.sounding();

    let mut chart = ChartBuilder::on(area)
        .margin_top(50)
        .margin_left(50)
        .margin_bottom(35)
        .margin_right(15)
        .build_cartesian_2d(SkewTransform::x_range(), 0.0..SkewTransform::y_top())?;

    let (width, height) = chart.plotting_area().dim_in_pixel();
    let xform = SkewTransform::for_pixels(width, height);
    let x_lim = (MIN_T, MAX_T);
    let y_lim = (0.0, SkewTransform::y_top());

    let to_pieces = |line: &[(HectoPascal, Celsius)]| -> Vec<Vec<(f64, f64)>> {
        let xy: Vec<(f64, f64)> = line.iter().map(|&(p, t)| xform.to_xy(p, t)).collect();
        clip_polyline(&xy, x_lim, y_lim)
    };

    let background = [
        (isotherms(), RGBColor(190, 190, 190)),
        (dry_adiabats(), RGBColor(230, 170, 120)),
        (moist_adiabats(), RGBColor(120, 180, 120)),
        (mixing_lines(), RGBColor(150, 150, 230)),
    ];
    for (lines, color) in background.iter() {
        let style = color.stroke_width(1);
        chart.draw_series(
            lines
                .iter()
                .flat_map(|line| to_pieces(&line[..]))
                .map(|piece| PathElement::new(piece, style)),
        )?;
    }

    // Isobars and their labels
    let label_style = text_style(14.0, &BLACK, Pos::new(HPos::Right, VPos::Center));
    for &p in ISOBARS.iter() {
        let y = log_p(HectoPascal(p));
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(MIN_T, y), (MAX_T, y)],
            RGBColor(160, 160, 160).stroke_width(1),
        )))?;
        let (x_px, y_px) = chart.backend_coord(&(MIN_T, y));
        root.draw(&Text::new(
            format!("{}", p),
            (x_px - 5, y_px),
            label_style.clone(),
        ))?;
    }

    let label_style = text_style(14.0, &BLACK, Pos::new(HPos::Center, VPos::Top));
    for t in (MIN_T as i32..=MAX_T as i32).step_by(10) {
        let (x_px, y_px) = chart.backend_coord(&(f64::from(t), 0.0));
        root.draw(&Text::new(
            format!("{}", t),
            (x_px, y_px + 5),
            label_style.clone(),
        ))?;
    }

    // Zero isotherm, dashed.
    let zero = to_pieces(&[(BOTTOM_PRESSURE, Celsius(0.0)), (TOP_PRESSURE, Celsius(0.0))][..]);
    chart.draw_series(
        zero.iter()
            .flat_map(|piece| dashes(piece, 0.8))
            .map(|dash| PathElement::new(dash, CYAN.stroke_width(2))),
    )?;

    let pressure = snd.pressure_profile();
    for (values, color) in [
        (snd.temperature_profile(), RED),
        (snd.dew_point_profile(), GREEN),
    ] {
        chart.draw_series(
            profile_pieces(pressure, values)
                .iter()
                .flat_map(|line| to_pieces(&line[..]))
                .map(|piece| PathElement::new(piece, color.stroke_width(2))),
        )?;
    }

    chart.draw_series(
        to_pieces(anal.parcel_trajectory())
            .into_iter()
            .map(|piece| PathElement::new(piece, BLACK.stroke_width(2))),
    )?;

    chart.draw_series(
        anal.level_markers()
            .into_iter()
            .map(|(p, t)| xform.to_xy(p, t))
            .filter(|&(x, y)| x >= MIN_T && x <= MAX_T && y >= 0.0 && y <= y_lim.1)
            .map(|pnt| Circle::new(pnt, 5, BLACK.filled())),
    )?;

    // Wind barbs along the right edge.
    let barb_x = MAX_T - 6.0;
    let mask = barb_mask(pressure);
    let barb_levels: Vec<_> = pressure
        .iter()
        .zip(snd.wind_profile())
        .zip(mask)
        .filter(|(_, keep)| *keep)
        .filter_map(|((p, w), _)| p.into_option().zip(w.into_option()))
        .map(|(p, w)| ((barb_x, log_p(p)), w))
        .collect();
    barbs::draw_barbs(&mut chart, &barb_levels, 30.0)?;

    // Titles
    let (area_width, _) = area.dim_in_pixel();
    let (x0, y0) = area.get_base_pixel();
    let station = snd
        .station_info()
        .station_id()
        .map(str::to_owned)
        .or_else(|| snd.station_info().station_num().into_option().map(|n| n.to_string()))
        .unwrap_or_default();
    root.draw(&Text::new(
        format!("{} Sounding", station),
        (x0 + 10, y0 + 12),
        text_style(20.0, &BLACK, left_top()),
    ))?;
    let valid = snd
        .valid_time()
        .map(|vt| vt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "--".to_owned());
    root.draw(&Text::new(
        format!("Valid Time: {}", valid),
        (x0 + area_width as i32 - 10, y0 + 12),
        text_style(20.0, &BLACK, Pos::new(HPos::Right, VPos::Top)),
    ))?;

    Ok(())
}

/// Break a line into dashes of length `dash` in data units with equal gaps.
fn dashes(line: &[(f64, f64)], dash: f64) -> Vec<Vec<(f64, f64)>> {
    let mut out = vec![];

    for pair in line.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        if len == 0.0 {
            continue;
        }

        let mut start = 0.0;
        while start < len {
            let end = (start + dash).min(len);
            let a = start / len;
            let b = end / len;
            out.push(vec![
                (x0 + a * (x1 - x0), y0 + a * (y1 - y0)),
                (x0 + b * (x1 - x0), y0 + b * (y1 - y0)),
            ]);
            start += 2.0 * dash;
        }
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;
    use optional::{none, some};

    #[test]
    fn test_barb_mask() {
        let pressure: Vec<Optioned<HectoPascal>> = vec![
            some(HectoPascal(1000.0)),
            some(HectoPascal(500.0)),
            some(HectoPascal(105.1)),
            some(HectoPascal(105.0)),
            none(),
            some(HectoPascal(50.0)),
        ];

        assert_eq!(
            barb_mask(&pressure),
            vec![true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_skew_transform() {
        let xform = SkewTransform::for_pixels(100, 100);

        // Bottom of the chart is not shifted.
        let (x, y) = xform.to_xy(BOTTOM_PRESSURE, Celsius(10.0));
        assert!((x - 10.0).abs() < 1.0e-12);
        assert!(y.abs() < 1.0e-12);

        // Isotherms run at 45 degrees on a square plot: crossing the whole height moves the
        // x coordinate across the whole width.
        let (x, y) = xform.to_xy(TOP_PRESSURE, Celsius(MIN_T));
        assert!((y - SkewTransform::y_top()).abs() < 1.0e-12);
        assert!((x - MAX_T).abs() < 1.0e-9);
    }

    #[test]
    fn test_clip_polyline() {
        let lim = (0.0, 10.0);

        // Entirely inside
        let inside = vec![(1.0, 1.0), (2.0, 2.0), (3.0, 1.0)];
        assert_eq!(clip_polyline(&inside, lim, lim), vec![inside.clone()]);

        // Entirely outside
        assert!(clip_polyline(&[(-5.0, -5.0), (-1.0, 20.0)], lim, lim).is_empty());

        // Leaves through the top and comes back in.
        let pieces = clip_polyline(
            &[(1.0, 5.0), (1.0, 15.0), (5.0, 15.0), (5.0, 5.0)],
            lim,
            lim,
        );
        assert_eq!(
            pieces,
            vec![vec![(1.0, 5.0), (1.0, 10.0)], vec![(5.0, 10.0), (5.0, 5.0)]]
        );
    }

    #[test]
    fn test_background_lines() {
        assert_eq!(isotherms().len(), 22);
        assert!(dry_adiabats().iter().all(|line| line.len() == 93));
        assert_eq!(mixing_lines().len(), MIXING_RATIOS.len());

        // Moist adiabats cool with height.
        for line in moist_adiabats() {
            for pair in line.windows(2) {
                assert!(pair[1].1 < pair[0].1);
            }
        }
    }

    #[test]
    fn test_profile_pieces() {
        let p: Vec<Optioned<HectoPascal>> = vec![
            some(HectoPascal(1000.0)),
            some(HectoPascal(900.0)),
            some(HectoPascal(800.0)),
            some(HectoPascal(700.0)),
        ];
        let t: Vec<Optioned<Celsius>> = vec![
            some(Celsius(20.0)),
            none(),
            some(Celsius(10.0)),
            some(Celsius(5.0)),
        ];

        let pieces = profile_pieces(&p, &t);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].len(), 1);
        assert_eq!(pieces[1].len(), 2);
    }

    #[test]
    fn test_dashes() {
        let d = dashes(&[(0.0, 0.0), (10.0, 0.0)], 1.0);
        assert_eq!(d.len(), 5);
        assert_eq!(d[1], vec![(2.0, 0.0), (3.0, 0.0)]);
    }
}
