//! Draw the sounding figure and storm track maps.
//!
//! Figures are written to image files, PNG or SVG, in an output directory. All drawing is generic
//! over the `plotters` backend so both formats share the same code.
use crate::{analysis::Analysis, error::Result, tracks::Storm};
use log::info;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use std::path::{Path, PathBuf};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub use self::{
    barbs::{barb_counts, barb_parts, BarbPart},
    hodograph::{colormapped_segments, hodograph_mask, HodographSegment, HEIGHT_BANDS},
    panel::panel_lines,
    skewt::{barb_mask, clip_polyline, SkewTransform, BARB_CUTOFF},
    track_map::{category_color, map_bounds, map_title, unwrap_longitudes, TrackMapProps},
};

/// Image file formats figures can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ImageFormat {
    /// Portable network graphics
    Png,
    /// Scalable vector graphics
    Svg,
}

impl ImageFormat {
    /// File name extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Where and how to write figures.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory the figures are written into, created if needed.
    pub output_dir: PathBuf,
    /// Image format.
    pub format: ImageFormat,
    /// Width of the sounding figure in pixels.
    pub width: u32,
    /// Height of the sounding figure in pixels.
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            output_dir: PathBuf::from("."),
            format: ImageFormat::Png,
            width: 1100,
            height: 1100,
        }
    }
}

impl RenderOptions {
    /// Path of a figure file named after `stem`.
    ///
    /// Characters that don't belong in a file name are replaced with underscores.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::render::{ImageFormat, RenderOptions};
    /// use std::path::PathBuf;
    ///
    /// let opts = RenderOptions {
    ///     output_dir: PathBuf::from("out"),
    ///     format: ImageFormat::Svg,
    ///     ..RenderOptions::default()
    /// };
    ///
    /// assert_eq!(opts.figure_path("OUN 2019/05/20"), PathBuf::from("out/OUN_2019_05_20.svg"));
    /// ```
    pub fn figure_path(&self, stem: &str) -> PathBuf {
        let stem: String = stem
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        self.output_dir
            .join(format!("{}.{}", stem, self.format.extension()))
    }
}

/// Draw the skew-T, hodograph, and text panel for an analysis and save it.
///
/// Returns the path of the new file.
pub fn render_sounding(anal: &Analysis, opts: &RenderOptions) -> Result<PathBuf> {
    let snd = anal.sounding();
    let station = snd
        .station_info()
        .station_id()
        .map(str::to_owned)
        .or_else(|| snd.station_info().station_num().into_option().map(|n| n.to_string()))
        .unwrap_or_else(|| "sounding".to_owned());
    let stem = match snd.valid_time() {
        Some(vt) => format!("{}_{}", station, vt.format("%Y%m%d_%HZ")),
        None => station,
    };

    let path = opts.figure_path(&stem);
    write_figure(&path, opts.format, (opts.width, opts.height), &SoundingFigure(anal))?;

    Ok(path)
}

/// Draw the track map of a storm and save it.
///
/// Returns the path of the new file.
pub fn render_track(storm: &Storm, props: &TrackMapProps, opts: &RenderOptions) -> Result<PathBuf> {
    let path = opts.figure_path(&format!("{}_{}", storm.name, storm.id));
    let figure = TrackFigure { storm, props };
    write_figure(&path, opts.format, props.figure_size(), &figure)?;

    Ok(path)
}

/// Something that can be drawn on any backend.
trait Figure {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

struct SoundingFigure<'a>(&'a Analysis);

impl Figure for SoundingFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let anal = self.0;
        root.fill(&WHITE)?;

        let (width, _) = root.dim_in_pixel();
        let (skewt_area, side_area) = root.split_horizontally(width * 62 / 100);
        let (_, side_height) = side_area.dim_in_pixel();
        let (hodo_area, panel_area) = side_area.split_vertically(side_height / 2);

        skewt::draw_skewt(root, &skewt_area, anal)?;
        hodograph::draw_hodograph(root, &hodo_area, anal)?;
        panel::draw_panel(&panel_area, anal)?;

        Ok(())
    }
}

struct TrackFigure<'a> {
    storm: &'a Storm,
    props: &'a TrackMapProps,
}

impl Figure for TrackFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        track_map::draw_track_map(root, self.storm, self.props)
    }
}

fn write_figure<F: Figure>(
    path: &Path,
    format: ImageFormat,
    size: (u32, u32),
    figure: &F,
) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    match format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present()?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present()?;
        }
    }

    info!("wrote {}", path.display());
    Ok(())
}

/// Text style anchored at the given position.
fn text_style(size: f64, color: &RGBColor, pos: Pos) -> TextStyle<'static> {
    ("sans-serif", size).into_font().color(color).pos(pos)
}

fn left_top() -> Pos {
    Pos::new(HPos::Left, VPos::Top)
}

mod barbs;
mod hodograph;
mod panel;
mod skewt;
mod track_map;
