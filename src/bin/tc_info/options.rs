use clap::Parser;
use std::path::PathBuf;
use wx_viewer::{
    render::{ImageFormat, RenderOptions, TrackMapProps},
    tracks::{DEFAULT_HURDAT_ATLANTIC_URL, DEFAULT_HURDAT_PACIFIC_URL, DEFAULT_IBTRACS_URL},
    ViewerOptions,
};

/// Look up tropical cyclones in the HURDAT2 and IBTrACS archives and map their tracks.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Directory the figures are saved in.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Image format, png or svg.
    #[arg(long, default_value = "png")]
    pub format: ImageFormat,

    /// Don't wait for the enter key after each figure.
    #[arg(long)]
    pub no_pause: bool,

    /// Stop at the first error instead of reporting it and asking again.
    #[arg(long)]
    pub fail_fast: bool,

    /// HURDAT2 file for the Atlantic basin.
    #[arg(long, default_value = DEFAULT_HURDAT_ATLANTIC_URL)]
    pub hurdat_url_atlantic: String,

    /// HURDAT2 file for the East and Central Pacific basin.
    #[arg(long, default_value = DEFAULT_HURDAT_PACIFIC_URL)]
    pub hurdat_url_pacific: String,

    /// Directory holding the IBTrACS per basin CSV files.
    #[arg(long, default_value = DEFAULT_IBTRACS_URL)]
    pub ibtracs_url: String,

    /// Map resolution in dots per inch.
    #[arg(long, default_value_t = 90)]
    pub dpi: u32,

    /// Track line width in points.
    #[arg(long, default_value_t = 1.0)]
    pub line_width: f64,
}

impl Cli {
    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            render: RenderOptions {
                output_dir: self.output_dir.clone(),
                format: self.format,
                ..RenderOptions::default()
            },
            pause: !self.no_pause,
            fail_fast: self.fail_fast,
        }
    }

    pub fn map_props(&self) -> TrackMapProps {
        TrackMapProps {
            dpi: self.dpi,
            line_width: self.line_width,
        }
    }
}
