#![allow(dead_code)] // Each test binary uses a different subset of these.

use chrono::{NaiveDate, NaiveDateTime};
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};
use wx_viewer::{
    tracks::{parse_hurdat2, parse_ibtracs, BasinSelection, TrackArchive, TrackDataset, TrackSource},
    wyoming::parse_response,
    Result, Sounding, UpperAirSource,
};

pub fn fixture_path(fname: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(fname);
    path
}

pub fn load_fixture(fname: &str) -> String {
    let path = fixture_path(fname);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("Error reading {:?}: {}", path, err))
}

pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}

/// An empty directory for a test to write figures into.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wx-viewer-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

pub fn oun_valid_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2013, 5, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn oun_sounding() -> Sounding {
    parse_response(
        &load_fixture("oun_2013052012.html"),
        "OUN",
        oun_valid_time(),
    )
    .unwrap()
}

/// Serves the saved OUN page for OUN at 12Z 20 May 2013, and the "no data" page for anything
/// else.
pub struct FixtureUpperAir {
    page: String,
    pub requests: RefCell<Vec<(NaiveDateTime, String)>>,
}

impl FixtureUpperAir {
    pub fn new() -> Self {
        FixtureUpperAir {
            page: load_fixture("oun_2013052012.html"),
            requests: RefCell::new(vec![]),
        }
    }
}

impl UpperAirSource for FixtureUpperAir {
    fn request_data(&self, time: NaiveDateTime, station: &str) -> Result<Sounding> {
        self.requests.borrow_mut().push((time, station.to_owned()));

        if station.eq_ignore_ascii_case("OUN") && time == oun_valid_time() {
            parse_response(&self.page, station, time)
        } else {
            let page = format!(
                "<HTML><BODY>Can't get {} Observations at {}.</BODY></HTML>",
                station, time
            );
            parse_response(&page, station, time)
        }
    }
}

/// Loads the HURDAT2 excerpt for every HURDAT selection and the West Pacific IBTrACS excerpt for
/// every IBTrACS selection.
pub struct FixtureArchive {
    hurdat: String,
    ibtracs: String,
    pub loads: RefCell<Vec<BasinSelection>>,
}

impl FixtureArchive {
    pub fn new() -> Self {
        FixtureArchive {
            hurdat: load_fixture("hurdat2_excerpt.txt"),
            ibtracs: load_fixture("ibtracs_wp_excerpt.csv"),
            loads: RefCell::new(vec![]),
        }
    }
}

impl TrackArchive for FixtureArchive {
    fn load(&self, selection: BasinSelection) -> Result<TrackDataset> {
        self.loads.borrow_mut().push(selection);

        let storms = match selection.source {
            TrackSource::Hurdat => parse_hurdat2(&self.hurdat)?,
            TrackSource::Ibtracs => parse_ibtracs(self.ibtracs.as_bytes())?,
        };

        Ok(TrackDataset::new(selection, storms))
    }
}
