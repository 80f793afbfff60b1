//! Fetch upper air soundings from the University of Wyoming sounding archive.
//!
//! The archive serves an HTML page with two `<pre>` blocks. The first is a fixed width table of
//! the reported levels, the second is a list of `key: value` lines describing the station and
//! some indexes computed by the archive.
use crate::{
    error::{Error, Result},
    sounding::{Sounding, StationInfo},
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, info};
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use optional::Optioned;
use regex::Regex;
use std::sync::LazyLock;

/// Default address of the sounding service.
pub const DEFAULT_BASE_URL: &str = "http://weather.uwyo.edu/cgi-bin/sounding";

/// Width of the columns in the text table.
const COLUMN_WIDTH: usize = 7;

static PRE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre>(.*?)</pre>").expect("static regex is valid")
});

/// A source of upper air soundings.
pub trait UpperAirSource {
    /// Retrieve the sounding for a station at a time.
    fn request_data(&self, time: NaiveDateTime, station: &str) -> Result<Sounding>;
}

/// Client for the University of Wyoming upper air archive.
#[derive(Debug, Clone)]
pub struct WyomingUpperAir {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WyomingUpperAir {
    /// Create a client for the service at `base_url`.
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        WyomingUpperAir {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The query parameters for a station and time.
    pub fn query(time: NaiveDateTime, station: &str) -> Vec<(&'static str, String)> {
        let day_hour = format!("{:02}{:02}", time.day(), time.hour());
        vec![
            ("region", "naconf".to_owned()),
            ("TYPE", "TEXT:LIST".to_owned()),
            ("YEAR", format!("{:04}", time.year())),
            ("MONTH", format!("{:02}", time.month())),
            ("FROM", day_hour.clone()),
            ("TO", day_hour),
            ("STNM", station.to_owned()),
        ]
    }
}

impl Default for WyomingUpperAir {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl UpperAirSource for WyomingUpperAir {
    fn request_data(&self, time: NaiveDateTime, station: &str) -> Result<Sounding> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&Self::query(time, station))
            .build()?;
        info!("requesting {}", request.url());

        let body = self.client.execute(request)?.error_for_status()?.text()?;
        debug!("received {} bytes", body.len());

        parse_response(&body, station, time)
    }
}

/// Build the valid time of a sounding from a `DD-MM-YYYY` date and an hour of the day.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::parse_valid_time;
/// use chrono::NaiveDate;
///
/// let vt = parse_valid_time("20-05-2013", 12).unwrap();
/// assert_eq!(vt, NaiveDate::from_ymd_opt(2013, 5, 20).unwrap().and_hms_opt(12, 0, 0).unwrap());
///
/// assert!(parse_valid_time("2013-05-20", 12).is_err());
/// assert!(parse_valid_time("20-05-2013", 24).is_err());
/// ```
pub fn parse_valid_time(date: &str, hour: u32) -> Result<NaiveDateTime> {
    let date_str = date.trim();
    let day = NaiveDate::parse_from_str(date_str, "%d-%m-%Y")
        .map_err(|_| Error::BadDate(date_str.to_owned()))?;

    day.and_hms_opt(hour, 0, 0).ok_or_else(|| Error::BadInput {
        input: hour.to_string(),
        expected: "an hour between 0 and 23",
    })
}

/// A level of the text table before units are attached.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawLevel {
    /// Pressure (hPa)
    pub pressure: Option<f64>,
    /// Geopotential height (m)
    pub height: Option<f64>,
    /// Temperature (C)
    pub temperature: Option<f64>,
    /// Dew point (C)
    pub dew_point: Option<f64>,
    /// Wind direction (degrees)
    pub direction: Option<f64>,
    /// Wind speed (knots)
    pub speed: Option<f64>,
}

impl RawLevel {
    /// True if temperature, dew point, wind direction, and wind speed are all missing.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.dew_point.is_none()
            && self.direction.is_none()
            && self.speed.is_none()
    }
}

/// Remove levels that have no temperature, dew point, or wind data. Order is preserved.
pub fn drop_empty_levels(levels: Vec<RawLevel>) -> Vec<RawLevel> {
    let before = levels.len();
    let levels: Vec<RawLevel> = levels.into_iter().filter(|lvl| !lvl.is_empty()).collect();
    debug!("kept {} of {} levels", levels.len(), before);
    levels
}

/// Parse the page returned by the service into a sounding.
///
/// The requested station and time are used when the page does not report them.
pub fn parse_response(body: &str, station: &str, time: NaiveDateTime) -> Result<Sounding> {
    if body.contains("Can't get") {
        return Err(Error::NoSounding {
            station: station.to_owned(),
            time,
        });
    }

    let mut blocks = PRE_BLOCK_RE
        .captures_iter(body)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str());

    let table = blocks.next().ok_or_else(|| Error::Parse {
        what: "sounding page",
        detail: "no data table found".to_owned(),
    })?;
    let levels = drop_empty_levels(parse_table(table)?);
    if levels.is_empty() {
        return Err(Error::NoSounding {
            station: station.to_owned(),
            time,
        });
    }

    let (station_info, valid_time) = match blocks.next() {
        Some(meta) => parse_station_block(meta)?,
        None => (StationInfo::new(), None),
    };

    let unnamed = station_info.station_id().is_none() && station_info.station_num().is_none();
    let station_info = if unnamed {
        station_info.with_station_id(station.to_owned())
    } else {
        station_info
    };

    Ok(into_sounding(levels)
        .with_source_description("University of Wyoming".to_owned())
        .with_station_info(station_info)
        .with_valid_time(valid_time.unwrap_or(time)))
}

/// Parse the fixed width table of levels.
///
/// The data rows follow the second line of dashes, the lines before that are headers.
pub fn parse_table(table: &str) -> Result<Vec<RawLevel>> {
    let mut lines = table.lines();

    let mut rules = 0;
    for line in lines.by_ref() {
        if line.trim_start().starts_with("---") {
            rules += 1;
            if rules == 2 {
                break;
            }
        }
    }

    if rules < 2 {
        return Err(Error::Parse {
            what: "data table",
            detail: "missing header".to_owned(),
        });
    }

    Ok(lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| RawLevel {
            pressure: column(line, 0),
            height: column(line, 1),
            temperature: column(line, 2),
            dew_point: column(line, 3),
            direction: column(line, 6),
            speed: column(line, 7),
        })
        .collect())
}

fn column(line: &str, idx: usize) -> Option<f64> {
    let start = idx * COLUMN_WIDTH;
    let end = (start + COLUMN_WIDTH).min(line.len());
    line.get(start..end)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Parse the station description block into station info and the observation time.
fn parse_station_block(meta: &str) -> Result<(StationInfo, Option<NaiveDateTime>)> {
    let mut info = StationInfo::new();
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;
    let mut valid_time = None;

    let parse_num = |key: &'static str, val: &str| -> Result<f64> {
        val.parse().map_err(|_| Error::Parse {
            what: key,
            detail: val.to_owned(),
        })
    };

    for (key, val) in meta
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, val)| (key.trim(), val.trim()))
    {
        match key {
            "Station identifier" => info = info.with_station_id(val.to_owned()),
            "Station number" => info = info.with_station(parse_num("station number", val)? as i32),
            "Observation time" => {
                valid_time = Some(NaiveDateTime::parse_from_str(val, "%y%m%d/%H%M").map_err(
                    |_| Error::Parse {
                        what: "observation time",
                        detail: val.to_owned(),
                    },
                )?)
            }
            "Station latitude" => lat = Some(parse_num("station latitude", val)?),
            "Station longitude" => lon = Some(parse_num("station longitude", val)?),
            "Station elevation" => {
                info = info.with_elevation(Meters(parse_num("station elevation", val)?))
            }
            _ => {}
        }
    }

    let info = info.with_lat_lon(lat.zip(lon));

    Ok((info, valid_time))
}

fn into_sounding(levels: Vec<RawLevel>) -> Sounding {
    let pressure = levels
        .iter()
        .map(|lvl| Optioned::from(lvl.pressure.map(HectoPascal)))
        .collect();
    let height = levels
        .iter()
        .map(|lvl| Optioned::from(lvl.height.map(Meters)))
        .collect();
    let temperature = levels
        .iter()
        .map(|lvl| Optioned::from(lvl.temperature.map(Celsius)))
        .collect();
    let dew_point = levels
        .iter()
        .map(|lvl| Optioned::from(lvl.dew_point.map(Celsius)))
        .collect();
    let wind = levels
        .iter()
        .map(|lvl| {
            Optioned::from(lvl.direction.zip(lvl.speed).map(|(direction, speed)| WindSpdDir {
                speed: Knots(speed),
                direction,
            }))
        })
        .collect();

    Sounding::new()
        .with_pressure_profile(pressure)
        .with_height_profile(height)
        .with_temperature_profile(temperature)
        .with_dew_point_profile(dew_point)
        .with_wind_profile(wind)
}

#[cfg(test)]
mod test {
    use super::*;

    const TABLE: &str = "
-----------------------------------------------------------------------------
   PRES   HGHT   TEMP   DWPT   RELH   MIXR   DRCT   SKNT   THTA   THTE   THTV
    hPa     m      C      C      %    g/kg    deg   knot     K      K      K
-----------------------------------------------------------------------------
 1000.0     94
  965.0    357   26.4   17.4     58  13.07    160     12  302.5  341.3  304.9
  950.0    494   25.2   16.2     57  12.25    165     21  302.6  339.2  304.9
  925.0    725                                180     25
  900.0    964   21.0   12.5     58  10.20                302.6  333.1  304.5
";

    fn time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2013, 5, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_table() {
        let levels = parse_table(TABLE).unwrap();
        assert_eq!(levels.len(), 5);

        assert_eq!(levels[0].pressure, Some(1000.0));
        assert_eq!(levels[0].height, Some(94.0));
        assert!(levels[0].is_empty());

        assert_eq!(
            levels[1],
            RawLevel {
                pressure: Some(965.0),
                height: Some(357.0),
                temperature: Some(26.4),
                dew_point: Some(17.4),
                direction: Some(160.0),
                speed: Some(12.0),
            }
        );

        // Wind only
        assert!(!levels[3].is_empty());
        assert_eq!(levels[3].speed, Some(25.0));

        // No wind
        assert_eq!(levels[4].direction, None);
    }

    #[test]
    fn test_drop_empty_levels() {
        let levels = drop_empty_levels(parse_table(TABLE).unwrap());
        let pressures: Vec<_> = levels.iter().filter_map(|lvl| lvl.pressure).collect();
        assert_eq!(pressures, vec![965.0, 950.0, 925.0, 900.0]);
    }

    #[test]
    fn test_no_data() {
        let body = "<HTML><BODY>Can't get 72357 OUN Norman Observations at 12Z 20 May 2013.\
                    </BODY></HTML>";
        match parse_response(body, "OUN", time()) {
            Err(Error::NoSounding { station, .. }) => assert_eq!(station, "OUN"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_missing_table() {
        assert!(matches!(
            parse_response("<HTML>busy, try again</HTML>", "OUN", time()),
            Err(Error::Parse { .. })
        ));
        assert!(parse_table("no header here").is_err());
    }

    #[test]
    fn test_query() {
        let query = WyomingUpperAir::query(time(), "OUN");
        assert!(query.contains(&("FROM", "2012".to_owned())));
        assert!(query.contains(&("TO", "2012".to_owned())));
        assert!(query.contains(&("YEAR", "2013".to_owned())));
        assert!(query.contains(&("MONTH", "05".to_owned())));
        assert!(query.contains(&("STNM", "OUN".to_owned())));
    }
}
