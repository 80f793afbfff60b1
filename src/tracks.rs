//! Tropical cyclone track archives.
//!
//! A `TrackDataset` is loaded once for a basin from either the HURDAT2 best track files published
//! by the National Hurricane Center, or the IBTrACS global archive. Storms are then looked up by
//! name and season.
use crate::error::{Error, Result};
use chrono::{NaiveDateTime, Timelike};
use log::{debug, info};
use metfor::{HectoPascal, Knots, Quantity};
use optional::Optioned;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub use self::{
    hurdat::parse_hurdat2,
    ibtracs::{ibtracs_file_name, parse_ibtracs},
};

/// Ocean basins that can be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Basin {
    /// North Atlantic
    NorthAtlantic,
    /// North Atlantic and the East/Central Pacific together.
    Both,
    /// East and Central Pacific
    EastPacific,
    /// West Pacific
    WestPacific,
    /// North Indian Ocean
    NorthIndian,
    /// South Indian Ocean
    SouthIndian,
}

/// Archives the tracks are loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum TrackSource {
    /// NHC HURDAT2 best tracks, Atlantic and East/Central Pacific.
    Hurdat,
    /// International Best Track Archive for Climate Stewardship.
    Ibtracs,
}

/// A basin and the archive to load it from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasinSelection {
    /// Basin to load.
    pub basin: Basin,
    /// Where to load it from.
    pub source: TrackSource,
}

/// Menu options for selecting a basin, in order.
pub const BASIN_MENU: [(Basin, &str); 6] = [
    (Basin::NorthAtlantic, "North Atlantic"),
    (
        Basin::Both,
        "North Atlantic + East/Central Pacific (2019 and older)",
    ),
    (Basin::EastPacific, "East/Central Pacific"),
    (Basin::WestPacific, "West Pacific"),
    (Basin::NorthIndian, "North Indian Ocean"),
    (Basin::SouthIndian, "South Indian Ocean"),
];

impl BasinSelection {
    /// Map a numbered menu option to a basin selection.
    ///
    /// Options 0 through 2 load from HURDAT, options 3 through 5 from IBTrACS, anything else is
    /// not a valid selection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::tracks::{Basin, BasinSelection, TrackSource};
    ///
    /// let sel = BasinSelection::from_option(1).unwrap();
    /// assert_eq!(sel.basin, Basin::Both);
    /// assert_eq!(sel.source, TrackSource::Hurdat);
    ///
    /// assert_eq!(BasinSelection::from_option(4).unwrap().source, TrackSource::Ibtracs);
    /// assert!(BasinSelection::from_option(6).is_none());
    /// assert!(BasinSelection::from_option(-1).is_none());
    /// ```
    pub fn from_option(option: i64) -> Option<Self> {
        let idx = usize::try_from(option).ok()?;
        let (basin, _) = BASIN_MENU.get(idx)?;
        let source = if idx <= 2 {
            TrackSource::Hurdat
        } else {
            TrackSource::Ibtracs
        };

        Some(BasinSelection {
            basin: *basin,
            source,
        })
    }
}

/// Saffir-Simpson hurricane wind scale, extended with the tropical depression and tropical storm
/// classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum SaffirSimpson {
    /// Below 34 kt
    #[strum(to_string = "TD")]
    TropicalDepression,
    /// 34 to 63 kt
    #[strum(to_string = "TS")]
    TropicalStorm,
    /// 64 to 82 kt
    #[strum(to_string = "C1")]
    Category1,
    /// 83 to 95 kt
    #[strum(to_string = "C2")]
    Category2,
    /// 96 to 112 kt
    #[strum(to_string = "C3")]
    Category3,
    /// 113 to 136 kt
    #[strum(to_string = "C4")]
    Category4,
    /// 137 kt and above
    #[strum(to_string = "C5")]
    Category5,
}

impl SaffirSimpson {
    /// Classify a maximum sustained wind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::tracks::SaffirSimpson;
    /// use metfor::Knots;
    ///
    /// assert_eq!(SaffirSimpson::from_wind(Knots(33.0)), SaffirSimpson::TropicalDepression);
    /// assert_eq!(SaffirSimpson::from_wind(Knots(34.0)), SaffirSimpson::TropicalStorm);
    /// assert_eq!(SaffirSimpson::from_wind(Knots(137.0)), SaffirSimpson::Category5);
    /// ```
    pub fn from_wind(vmax: Knots) -> Self {
        use SaffirSimpson::*;

        match vmax.unpack() {
            v if v < 34.0 => TropicalDepression,
            v if v < 64.0 => TropicalStorm,
            v if v < 83.0 => Category1,
            v if v < 96.0 => Category2,
            v if v < 113.0 => Category3,
            v if v < 137.0 => Category4,
            _ => Category5,
        }
    }
}

/// One fix along a storm track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    /// Valid time (UTC)
    pub time: NaiveDateTime,
    /// Latitude in degrees north
    pub lat: f64,
    /// Longitude in degrees east
    pub lon: f64,
    /// Maximum sustained wind
    pub vmax: Optioned<Knots>,
    /// Minimum sea level pressure
    pub mslp: Optioned<HectoPascal>,
    /// System status, e.g. TD, TS, HU, EX.
    pub status: String,
    /// Whether this fix is a landfall.
    pub landfall: bool,
}

impl TrackPoint {
    /// True for a tropical or subtropical system status.
    pub fn is_tropical(&self) -> bool {
        matches!(self.status.as_str(), "TD" | "TS" | "HU" | "SD" | "SS")
    }

    fn counts_for_ace(&self) -> bool {
        self.time.minute() == 0
            && self.time.hour() % 6 == 0
            && matches!(self.status.as_str(), "TS" | "HU" | "SS")
            && self.vmax.into_option().map_or(false, |v| v >= Knots(34.0))
    }
}

/// A storm and its track.
#[derive(Debug, Clone, PartialEq)]
pub struct Storm {
    /// Archive identifier, e.g. AL092011
    pub id: String,
    /// Storm name as listed in the archive.
    pub name: String,
    /// Season (year) of the storm.
    pub season: i32,
    /// Track points in time order.
    pub points: Vec<TrackPoint>,
}

impl Storm {
    /// Maximum sustained wind over the life of the storm.
    pub fn max_wind(&self) -> Option<Knots> {
        self.points
            .iter()
            .filter_map(|pnt| pnt.vmax.into_option())
            .fold(None, |acc: Option<Knots>, v| match acc {
                Some(max) if max >= v => acc,
                _ => Some(v),
            })
    }

    /// Minimum sea level pressure over the life of the storm.
    pub fn min_pressure(&self) -> Option<HectoPascal> {
        self.points
            .iter()
            .filter_map(|pnt| pnt.mslp.into_option())
            .fold(None, |acc: Option<HectoPascal>, p| match acc {
                Some(min) if min <= p => acc,
                _ => Some(p),
            })
    }

    /// Peak classification while the storm was tropical or subtropical.
    pub fn peak_category(&self) -> Option<SaffirSimpson> {
        self.points
            .iter()
            .filter(|pnt| pnt.is_tropical())
            .filter_map(|pnt| pnt.vmax.into_option())
            .map(SaffirSimpson::from_wind)
            .max()
    }

    /// Accumulated cyclone energy (10^4 kt^2).
    ///
    /// Sum of the squared maximum winds at the synoptic times while the storm is tropical or
    /// subtropical with at least tropical storm strength.
    pub fn ace(&self) -> f64 {
        self.points
            .iter()
            .filter(|pnt| pnt.counts_for_ace())
            .filter_map(|pnt| pnt.vmax.into_option())
            .map(|v| v.unpack() * v.unpack())
            .sum::<f64>()
            * 1.0e-4
    }
}

/// All the storms of a basin.
#[derive(Debug, Clone)]
pub struct TrackDataset {
    selection: BasinSelection,
    storms: Vec<Storm>,
}

impl TrackDataset {
    /// Wrap a list of storms.
    pub fn new(selection: BasinSelection, storms: Vec<Storm>) -> Self {
        info!(
            "loaded {} storms for {} from {}",
            storms.len(),
            selection.basin,
            selection.source
        );
        TrackDataset { selection, storms }
    }

    /// The basin and source this was loaded for.
    pub fn selection(&self) -> BasinSelection {
        self.selection
    }

    /// All the storms.
    pub fn storms(&self) -> &[Storm] {
        &self.storms
    }

    /// Find a storm by name and season. Names are not case sensitive.
    pub fn get_storm(&self, name: &str, year: i32) -> Result<&Storm> {
        let name = name.trim();
        let matches: Vec<&Storm> = self
            .storms
            .iter()
            .filter(|storm| storm.season == year && storm.name.eq_ignore_ascii_case(name))
            .collect();
        debug!("{} storms match {} {}", matches.len(), name, year);

        match matches.as_slice() {
            [storm] => Ok(*storm),
            [] => Err(Error::StormNotFound {
                name: name.to_owned(),
                year,
            }),
            _ => Err(Error::AmbiguousStorm {
                name: name.to_owned(),
                year,
                ids: matches.iter().map(|storm| storm.id.clone()).collect(),
            }),
        }
    }
}

/// A place to load track datasets from.
pub trait TrackArchive {
    /// Load every storm in the selected basin.
    fn load(&self, selection: BasinSelection) -> Result<TrackDataset>;
}

/// Default HURDAT2 file for the Atlantic.
pub const DEFAULT_HURDAT_ATLANTIC_URL: &str =
    "https://www.nhc.noaa.gov/data/hurdat/hurdat2-1851-2023-051124.txt";
/// Default HURDAT2 file for the East and Central Pacific.
pub const DEFAULT_HURDAT_PACIFIC_URL: &str =
    "https://www.nhc.noaa.gov/data/hurdat/hurdat2-nepac-1949-2023-042624.txt";
/// Default directory of the IBTrACS per-basin CSV files.
pub const DEFAULT_IBTRACS_URL: &str = "https://www.ncei.noaa.gov/data/\
    international-best-track-archive-for-climate-stewardship-ibtracs/v04r01/access/csv/";

/// Download track archives over HTTP.
#[derive(Debug, Clone)]
pub struct TrackArchiveClient {
    client: reqwest::blocking::Client,
    hurdat_atlantic_url: String,
    hurdat_pacific_url: String,
    ibtracs_url: String,
}

impl Default for TrackArchiveClient {
    fn default() -> Self {
        Self::new(
            DEFAULT_HURDAT_ATLANTIC_URL,
            DEFAULT_HURDAT_PACIFIC_URL,
            DEFAULT_IBTRACS_URL,
        )
    }
}

impl TrackArchiveClient {
    /// Create a client with the locations of the archives.
    pub fn new<S: Into<String>>(
        hurdat_atlantic_url: S,
        hurdat_pacific_url: S,
        ibtracs_url: S,
    ) -> Self {
        TrackArchiveClient {
            client: reqwest::blocking::Client::new(),
            hurdat_atlantic_url: hurdat_atlantic_url.into(),
            hurdat_pacific_url: hurdat_pacific_url.into(),
            ibtracs_url: ibtracs_url.into(),
        }
    }

    fn fetch(&self, url: &str) -> Result<String> {
        info!("requesting {}", url);
        let text = self.client.get(url).send()?.error_for_status()?.text()?;
        debug!("received {} bytes", text.len());
        Ok(text)
    }

    fn load_hurdat(&self, basin: Basin) -> Result<Vec<Storm>> {
        let urls: &[&str] = match basin {
            Basin::NorthAtlantic => &[self.hurdat_atlantic_url.as_str()],
            Basin::EastPacific => &[self.hurdat_pacific_url.as_str()],
            Basin::Both => &[
                self.hurdat_atlantic_url.as_str(),
                self.hurdat_pacific_url.as_str(),
            ],
            _ => return Err(Error::InvalidInput),
        };

        let mut storms = Vec::new();
        for url in urls {
            storms.extend(parse_hurdat2(&self.fetch(url)?)?);
        }

        Ok(storms)
    }

    fn load_ibtracs(&self, basin: Basin) -> Result<Vec<Storm>> {
        let file_name = ibtracs_file_name(basin).ok_or(Error::InvalidInput)?;
        let url = format!("{}/{}", self.ibtracs_url.trim_end_matches('/'), file_name);
        parse_ibtracs(self.fetch(&url)?.as_bytes())
    }
}

impl TrackArchive for TrackArchiveClient {
    fn load(&self, selection: BasinSelection) -> Result<TrackDataset> {
        let storms = match selection.source {
            TrackSource::Hurdat => self.load_hurdat(selection.basin)?,
            TrackSource::Ibtracs => self.load_ibtracs(selection.basin)?,
        };

        Ok(TrackDataset::new(selection, storms))
    }
}

mod hurdat;
mod ibtracs;
