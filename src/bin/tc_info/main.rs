mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use options::Cli;
use wx_viewer::{tracks::TrackArchiveClient, CycloneViewer, Prompt};

fn main() -> Result<(), AnyError> {
    env_logger::init();

    let cli = Cli::parse();
    let archive = TrackArchiveClient::new(
        cli.hurdat_url_atlantic.as_str(),
        cli.hurdat_url_pacific.as_str(),
        cli.ibtracs_url.as_str(),
    );
    let viewer = CycloneViewer::new(archive, cli.map_props(), cli.viewer_options());

    let stdin = std::io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), std::io::stdout());
    let figures = viewer.run(&mut prompt)?;

    log::info!("{} figures written", figures);
    Ok(())
}
