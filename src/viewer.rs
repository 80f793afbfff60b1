//! The interactive request, compute, and render loops.
//!
//! Each loop keeps asking for input until the input runs out. A failed iteration is reported and
//! the loop moves on to the next one, unless the viewer is set to fail fast, in which case the
//! first error ends the loop and is returned.
use crate::{
    analysis::Analysis,
    error::{Error, Result},
    prompt::Prompt,
    render::{render_sounding, render_track, RenderOptions, TrackMapProps},
    tracks::{BasinSelection, TrackArchive, TrackDataset, BASIN_MENU},
    wyoming::{parse_valid_time, UpperAirSource},
};
use log::{error, info, warn};
use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

const SOUNDING_BANNER: &str = "==== WYOMING SOUNDINGS SEARCH TOOL ====";
const CYCLONE_BANNER: &str = "==== TROPICAL CYCLONE QUERY TOOL (HURDAT/IBTRACS) ====";
const PAUSE_PROMPT: &str = "Press Enter to continue...";

/// Settings shared by both viewers.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Where and how figures are written.
    pub render: RenderOptions,
    /// Wait for the enter key after each figure.
    pub pause: bool,
    /// Stop at the first failed iteration instead of reporting it and continuing.
    pub fail_fast: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        ViewerOptions {
            render: RenderOptions::default(),
            pause: true,
            fail_fast: false,
        }
    }
}

enum Step {
    Figure(PathBuf),
    EndOfInput,
}

/// Report the outcome of an iteration and count the figure, if there was one. Returns `Ok(false)`
/// when the loop should end.
fn finish_step<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    opts: &ViewerOptions,
    step: Result<Step>,
    figures: &mut usize,
) -> Result<bool> {
    match step {
        Ok(Step::Figure(path)) => {
            info!("wrote {}", path.display());
            prompt.say(&format!("Figure saved to {}", path.display()))?;
            *figures += 1;
            if opts.pause {
                return prompt.pause(PAUSE_PROMPT);
            }
            Ok(true)
        }
        Ok(Step::EndOfInput) => Ok(false),
        Err(err) if opts.fail_fast => Err(err),
        Err(err) => {
            error!("{}", err);
            prompt.say(&format!("Error: {}", err))?;
            Ok(true)
        }
    }
}

/// Read an hour like `12`, `12z`, or `00Z`.
fn parse_hour(input: &str) -> Result<u32> {
    input
        .trim()
        .trim_end_matches(|c| c == 'z' || c == 'Z')
        .parse()
        .map_err(|_| Error::BadInput {
            input: input.to_owned(),
            expected: "an hour such as 00 or 12",
        })
}

/// Look up soundings and draw them.
#[derive(Debug)]
pub struct SoundingViewer<S> {
    source: S,
    opts: ViewerOptions,
}

impl<S: UpperAirSource> SoundingViewer<S> {
    /// Create a viewer that fetches from `source`.
    pub fn new(source: S, opts: ViewerOptions) -> Self {
        SoundingViewer { source, opts }
    }

    /// Fetch, analyze, and draw one sounding.
    pub fn view(&self, station: &str, date: &str, hour: u32) -> Result<PathBuf> {
        let valid_time = parse_valid_time(date, hour)?;
        let snd = self.source.request_data(valid_time, station)?;
        let anal = Analysis::analyze(snd)?;
        render_sounding(&anal, &self.opts.render)
    }

    fn step<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> Result<Step> {
        let station = match prompt.ask("Enter station:")? {
            Some(station) => station,
            None => return Ok(Step::EndOfInput),
        };
        let date = match prompt.ask("Enter date (DD-MM-YYYY):")? {
            Some(date) => date,
            None => return Ok(Step::EndOfInput),
        };
        let hour = match prompt.ask("Enter time (XXz):")? {
            Some(hour) => parse_hour(&hour)?,
            None => return Ok(Step::EndOfInput),
        };

        info!("sounding request {} {} {}z", station, date, hour);
        self.view(&station, &date, hour).map(Step::Figure)
    }

    /// Run the loop until the input runs out. Returns the number of figures written.
    pub fn run<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> Result<usize> {
        let mut figures = 0;

        prompt.say(SOUNDING_BANNER)?;
        loop {
            prompt.say(" ")?;
            let step = self.step(prompt);
            if !finish_step(prompt, &self.opts, step, &mut figures)? {
                break;
            }
        }

        Ok(figures)
    }
}

/// Look up tropical cyclones in a basin and draw their tracks.
#[derive(Debug)]
pub struct CycloneViewer<A> {
    archive: A,
    props: TrackMapProps,
    opts: ViewerOptions,
}

impl<A: TrackArchive> CycloneViewer<A> {
    /// Create a viewer that loads tracks from `archive`.
    pub fn new(archive: A, props: TrackMapProps, opts: ViewerOptions) -> Self {
        CycloneViewer {
            archive,
            props,
            opts,
        }
    }

    /// Load the dataset for a menu option.
    ///
    /// An option outside the menu loads nothing, every later query will fail.
    pub fn select_basin(&self, option: i64) -> Result<Option<TrackDataset>> {
        match BasinSelection::from_option(option) {
            Some(selection) => {
                info!("loading {} from {}", selection.basin, selection.source);
                self.archive.load(selection).map(Some)
            }
            None => {
                warn!("basin option {} is not on the menu", option);
                Ok(None)
            }
        }
    }

    /// Find a storm in the dataset and draw its track.
    pub fn view(&self, dataset: Option<&TrackDataset>, name: &str, year: i32) -> Result<PathBuf> {
        let storm = dataset.ok_or(Error::NoDataset)?.get_storm(name, year)?;
        render_track(storm, &self.props, &self.opts.render)
    }

    fn step<R: BufRead, W: Write>(
        &self,
        prompt: &mut Prompt<R, W>,
        dataset: Option<&TrackDataset>,
    ) -> Result<Step> {
        let name = match prompt.ask("Enter name:")? {
            Some(name) => name,
            None => return Ok(Step::EndOfInput),
        };
        let year: i32 = match prompt.ask_parsed("Enter year of occurrence:", "a year")? {
            Some(year) => year,
            None => return Ok(Step::EndOfInput),
        };

        self.view(dataset, &name, year).map(Step::Figure)
    }

    fn menu<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> Result<()> {
        prompt.say(CYCLONE_BANNER)?;
        prompt.say(" ")?;
        prompt.say("<<Select a basin>>")?;
        prompt.say(" ")?;
        for (i, (_, label)) in BASIN_MENU.iter().enumerate() {
            prompt.say(&format!("{} - {}", i, label))?;
        }
        prompt.say(" ")
    }

    /// Run the loop until the input runs out. Returns the number of figures written.
    pub fn run<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> Result<usize> {
        let mut figures = 0;

        self.menu(prompt)?;
        let selected = match prompt.ask("Choose an option:")? {
            Some(answer) => answer
                .parse::<i64>()
                .map_err(|_| Error::BadInput {
                    input: answer.clone(),
                    expected: "a menu option",
                })
                .and_then(|option| self.select_basin(option)),
            None => return Ok(figures),
        };

        let dataset = match selected {
            Ok(dataset) => dataset,
            Err(err) if self.opts.fail_fast => return Err(err),
            Err(err) => {
                error!("{}", err);
                prompt.say(&format!("Error: {}", err))?;
                None
            }
        };

        loop {
            prompt.say(" ")?;
            let step = self.step(prompt, dataset.as_ref());
            if !finish_step(prompt, &self.opts, step, &mut figures)? {
                break;
            }
        }

        Ok(figures)
    }
}
