use clap::Parser;
use std::path::PathBuf;
use wx_viewer::{
    render::{ImageFormat, RenderOptions},
    wyoming::DEFAULT_BASE_URL,
    ViewerOptions,
};

/// Look up University of Wyoming upper air soundings and draw them.
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

    /// Address of the sounding service.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Figure width in pixels.
    #[arg(long, default_value_t = 1100)]
    pub width: u32,

    /// Figure height in pixels.
    #[arg(long, default_value_t = 1100)]
    pub height: u32,
}

impl Cli {
    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            render: RenderOptions {
                output_dir: self.output_dir.clone(),
                format: self.format,
                width: self.width,
                height: self.height,
            },
            pause: !self.no_pause,
            fail_fast: self.fail_fast,
        }
    }
}
