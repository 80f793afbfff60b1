//! Parse the IBTrACS per-basin CSV files.
//!
//! The files have a header row followed by a row of units, then one row per track point. Rows for
//! the same storm are consecutive and share a storm identifier.
use super::{Basin, SaffirSimpson, Storm, TrackPoint};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use log::debug;
use metfor::{HectoPascal, Knots};
use optional::Optioned;
use serde::Deserialize;
use std::io::Read;

/// Name of the IBTrACS file holding a basin, if IBTrACS is the source for that basin.
pub fn ibtracs_file_name(basin: Basin) -> Option<&'static str> {
    match basin {
        Basin::WestPacific => Some("ibtracs.WP.list.v04r01.csv"),
        Basin::NorthIndian => Some("ibtracs.NI.list.v04r01.csv"),
        Basin::SouthIndian => Some("ibtracs.SI.list.v04r01.csv"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct IbtracsRow {
    sid: String,
    season: i32,
    name: String,
    iso_time: String,
    nature: String,
    lat: f64,
    lon: f64,
    wmo_wind: Option<f64>,
    wmo_pres: Option<f64>,
    usa_wind: Option<f64>,
    usa_pres: Option<f64>,
    #[serde(default)]
    usa_record: Option<String>,
}

impl IbtracsRow {
    fn into_point(self) -> Result<TrackPoint> {
        let time = NaiveDateTime::parse_from_str(&self.iso_time, "%Y-%m-%d %H:%M:%S").map_err(
            |_| Error::Parse {
                what: "IBTrACS time",
                detail: self.iso_time.clone(),
            },
        )?;

        for (what, val) in [("IBTrACS latitude", self.lat), ("IBTrACS longitude", self.lon)] {
            if !val.is_finite() {
                return Err(Error::Parse {
                    what,
                    detail: format!("{} at {} for {}", val, self.iso_time, self.sid),
                });
            }
        }

        let vmax = self.usa_wind.or(self.wmo_wind).map(Knots);
        let mslp = self.usa_pres.or(self.wmo_pres).map(HectoPascal);

        Ok(TrackPoint {
            time,
            lat: self.lat,
            lon: self.lon,
            vmax: Optioned::from(vmax),
            mslp: Optioned::from(mslp),
            status: status(&self.nature, vmax),
            landfall: self.usa_record.as_deref() == Some("L"),
        })
    }
}

// IBTrACS only says "TS" for tropical systems, refine that by intensity.
fn status(nature: &str, vmax: Option<Knots>) -> String {
    match (nature, vmax.map(SaffirSimpson::from_wind)) {
        ("TS", Some(SaffirSimpson::TropicalDepression)) => "TD".to_owned(),
        ("TS", Some(SaffirSimpson::TropicalStorm)) | ("TS", None) => "TS".to_owned(),
        ("TS", Some(_)) => "HU".to_owned(),
        (other, _) => other.to_owned(),
    }
}

/// Parse an IBTrACS CSV file.
pub fn parse_ibtracs<R: Read>(rdr: R) -> Result<Vec<Storm>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);
    let headers = reader.headers()?.clone();

    let mut storms: Vec<Storm> = Vec::new();
    // The first record is the units row.
    for record in reader.records().skip(1) {
        let row: IbtracsRow = record?.deserialize(Some(&headers))?;

        let is_new_storm = storms.last().map_or(true, |storm| storm.id != row.sid);
        if is_new_storm {
            storms.push(Storm {
                id: row.sid.clone(),
                name: row.name.clone(),
                season: row.season,
                points: Vec::new(),
            });
        }

        let point = row.into_point()?;
        if let Some(storm) = storms.last_mut() {
            storm.points.push(point);
        }
    }

    debug!("parsed {} IBTrACS storms", storms.len());
    Ok(storms)
}
