//! Storm track map on a plain latitude/longitude grid.
use super::{left_top, text_style};
use crate::{
    error::Result,
    tracks::{SaffirSimpson, Storm, TrackPoint},
};
use metfor::Quantity;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use strum::IntoEnumIterator;

/// Fixed properties of the track map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackMapProps {
    /// Dots per inch, scales the whole figure.
    pub dpi: u32,
    /// Width of the track line in points.
    pub line_width: f64,
}

impl Default for TrackMapProps {
    fn default() -> Self {
        TrackMapProps {
            dpi: 90,
            line_width: 1.0,
        }
    }
}

impl TrackMapProps {
    const WIDTH_INCHES: u32 = 12;
    const HEIGHT_INCHES: u32 = 8;

    /// Size of the figure in pixels.
    pub fn figure_size(&self) -> (u32, u32) {
        (
            Self::WIDTH_INCHES * self.dpi.max(1),
            Self::HEIGHT_INCHES * self.dpi.max(1),
        )
    }

    /// Track line width in pixels, at least one.
    fn line_width_px(&self) -> u32 {
        (self.line_width * f64::from(self.dpi) / 72.0).round().max(1.0) as u32
    }

    fn scale(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }
}

/// Color of a track point by intensity, gray when the system is not tropical.
pub fn category_color(pnt: &TrackPoint) -> RGBColor {
    if !pnt.is_tropical() {
        return RGBColor(128, 128, 128);
    }

    match pnt.vmax.into_option().map(SaffirSimpson::from_wind) {
        None => RGBColor(128, 128, 128),
        Some(cat) => saffir_simpson_color(cat),
    }
}

fn saffir_simpson_color(cat: SaffirSimpson) -> RGBColor {
    use SaffirSimpson::*;

    match cat {
        TropicalDepression => RGBColor(94, 186, 255),
        TropicalStorm => RGBColor(0, 250, 244),
        Category1 => RGBColor(255, 247, 149),
        Category2 => RGBColor(255, 216, 33),
        Category3 => RGBColor(255, 143, 32),
        Category4 => RGBColor(255, 96, 96),
        Category5 => RGBColor(196, 100, 217),
    }
}

/// Remove jumps across the dateline so the track is continuous.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::render::unwrap_longitudes;
///
/// assert_eq!(unwrap_longitudes(&[178.0, -179.0, -176.0]), vec![178.0, 181.0, 184.0]);
/// assert_eq!(unwrap_longitudes(&[-179.0, 179.0]), vec![-179.0, -181.0]);
/// ```
pub fn unwrap_longitudes(lons: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(lons.len());

    for &lon in lons {
        let next = match out.last() {
            Some(&prev) => {
                let mut lon = lon;
                while lon - prev > 180.0 {
                    lon -= 360.0;
                }
                while prev - lon > 180.0 {
                    lon += 360.0;
                }
                lon
            }
            None => lon,
        };
        out.push(next);
    }

    out
}

/// Map extent around the track, padded and snapped to whole multiples of 5 degrees.
///
/// Returns the longitude and latitude ranges.
pub fn map_bounds(lons: &[f64], lats: &[f64]) -> ((f64, f64), (f64, f64)) {
    const PAD: f64 = 5.0;

    let min_max = |vals: &[f64]| {
        vals.iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
    };

    let (lon_lo, lon_hi) = min_max(lons).unwrap_or((-100.0, -20.0));
    let (lat_lo, lat_hi) = min_max(lats).unwrap_or((0.0, 50.0));

    let snap_down = |v: f64| ((v - PAD) / 5.0).floor() * 5.0;
    let snap_up = |v: f64| ((v + PAD) / 5.0).ceil() * 5.0;

    (
        (snap_down(lon_lo), snap_up(lon_hi)),
        (snap_down(lat_lo).max(-90.0), snap_up(lat_hi).min(90.0)),
    )
}

/// Title lines for a storm map.
///
/// The first line has the name and season, the second the peak intensity and ACE.
pub fn map_title(storm: &Storm) -> (String, String) {
    let first = format!("{} ({})", storm.name, storm.season);

    let wind = storm
        .max_wind()
        .map(|w| format!("{:.0} kt", w.unpack()))
        .unwrap_or_else(|| "--".to_owned());
    let pres = storm
        .min_pressure()
        .map(|p| format!("{:.0} hPa", p.unpack()))
        .unwrap_or_else(|| "--".to_owned());
    let cat = storm
        .peak_category()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "--".to_owned());

    let second = format!(
        "Peak: {}, {} ({})   ACE: {:.1}",
        wind,
        pres,
        cat,
        storm.ace()
    );

    (first, second)
}

fn lon_label(lon: f64) -> String {
    let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if lon < 0.0 {
        format!("{:.0}°W", -lon)
    } else if lon > 0.0 && lon < 180.0 {
        format!("{:.0}°E", lon)
    } else {
        format!("{:.0}°", lon.abs())
    }
}

fn lat_label(lat: f64) -> String {
    if lat < 0.0 {
        format!("{:.0}°S", -lat)
    } else if lat > 0.0 {
        format!("{:.0}°N", lat)
    } else {
        "0°".to_owned()
    }
}

fn grid_step(span: f64) -> f64 {
    if span > 60.0 {
        10.0
    } else {
        5.0
    }
}

pub(super) fn draw_track_map<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    storm: &Storm,
    props: &TrackMapProps,
) -> Result<()> {
    root.fill(&WHITE)?;

    let lons = unwrap_longitudes(&storm.points.iter().map(|p| p.lon).collect::<Vec<_>>());
    let lats: Vec<f64> = storm.points.iter().map(|p| p.lat).collect();
    let ((x0, x1), (y0, y1)) = map_bounds(&lons, &lats);

    let margin = props.scale(40.0) as i32;
    let mut chart = ChartBuilder::on(root)
        .margin_top(props.scale(60.0) as i32)
        .margin_left(margin)
        .margin_right(margin)
        .margin_bottom(margin)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    // Graticule
    let grid = RGBColor(200, 200, 200).stroke_width(1);
    let font_size = props.scale(10.0);
    let step = grid_step((x1 - x0).max(y1 - y0));

    let mut lon = (x0 / step).ceil() * step;
    while lon <= x1 {
        chart.draw_series(std::iter::once(PathElement::new(vec![(lon, y0), (lon, y1)], grid)))?;
        let (px, py) = chart.backend_coord(&(lon, y0));
        root.draw(&Text::new(
            lon_label(lon),
            (px, py + 4),
            text_style(font_size, &BLACK, Pos::new(HPos::Center, VPos::Top)),
        ))?;
        lon += step;
    }

    let mut lat = (y0 / step).ceil() * step;
    while lat <= y1 {
        chart.draw_series(std::iter::once(PathElement::new(vec![(x0, lat), (x1, lat)], grid)))?;
        let (px, py) = chart.backend_coord(&(x0, lat));
        root.draw(&Text::new(
            lat_label(lat),
            (px - 4, py),
            text_style(font_size, &BLACK, Pos::new(HPos::Right, VPos::Center)),
        ))?;
        lat += step;
    }

    // Track
    let track: Vec<(f64, f64)> = lons.iter().copied().zip(lats.iter().copied()).collect();
    chart.draw_series(std::iter::once(PathElement::new(
        track.clone(),
        BLACK.stroke_width(props.line_width_px()),
    )))?;

    let radius = props.scale(4.0).round().max(2.0) as i32;
    chart.draw_series(
        storm
            .points
            .iter()
            .zip(track.iter())
            .map(|(pnt, &xy)| Circle::new(xy, radius, category_color(pnt).filled())),
    )?;
    chart.draw_series(
        storm
            .points
            .iter()
            .zip(track.iter())
            .filter(|(pnt, _)| pnt.landfall)
            .map(|(_, &xy)| Circle::new(xy, radius + 2, BLACK.stroke_width(1))),
    )?;

    // Legend along the top right.
    let (width, _) = root.dim_in_pixel();
    let key_size = props.scale(8.0) as i32;
    let mut key_x = width as i32 - margin;
    let categories: Vec<SaffirSimpson> = SaffirSimpson::iter().collect();
    for cat in categories.into_iter().rev() {
        let label = cat.to_string();
        key_x -= key_size * 4;
        let key_y = props.scale(40.0) as i32;
        root.draw(&Rectangle::new(
            [(key_x, key_y), (key_x + key_size, key_y + key_size)],
            saffir_simpson_color(cat).filled(),
        ))?;
        root.draw(&Text::new(
            label,
            (key_x + key_size + 3, key_y),
            text_style(font_size, &BLACK, left_top()),
        ))?;
    }

    let (title, subtitle) = map_title(storm);
    root.draw(&Text::new(
        title,
        (margin, props.scale(8.0) as i32),
        text_style(props.scale(16.0), &BLACK, left_top()),
    ))?;
    root.draw(&Text::new(
        subtitle,
        (margin, props.scale(30.0) as i32),
        text_style(props.scale(11.0), &BLACK, left_top()),
    ))?;

    Ok(())
}
