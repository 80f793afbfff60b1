mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use options::Cli;
use wx_viewer::{Prompt, SoundingViewer, WyomingUpperAir};

fn main() -> Result<(), AnyError> {
    env_logger::init();

    let cli = Cli::parse();
    let source = WyomingUpperAir::new(cli.base_url.clone());
    let viewer = SoundingViewer::new(source, cli.viewer_options());

    let stdin = std::io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), std::io::stdout());
    let figures = viewer.run(&mut prompt)?;

    log::info!("{} figures written", figures);
    Ok(())
}
