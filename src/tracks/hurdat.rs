//! Parse the NHC HURDAT2 best track format.
//!
//! Each storm starts with a header line `ID, NAME, N,` and is followed by N data lines of
//! `YYYYMMDD, HHMM, record, status, lat, lon, vmax, mslp, ...` where -999 marks a missing value.
use super::{Storm, TrackPoint};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use log::debug;
use metfor::{HectoPascal, Knots};
use optional::{none, some, Optioned};

/// Parse a whole HURDAT2 file.
pub fn parse_hurdat2(text: &str) -> Result<Vec<Storm>> {
    let mut storms = Vec::new();
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    while let Some(header) = lines.next() {
        let fields = split_fields(header);
        let (id, name, count) = match fields.as_slice() {
            [id, name, count, ..] => (*id, *name, *count),
            _ => return Err(parse_error("HURDAT2 header", header)),
        };

        let count: usize = count
            .parse()
            .map_err(|_| parse_error("HURDAT2 header", header))?;
        let season: i32 = id
            .get(4..8)
            .and_then(|year| year.parse().ok())
            .ok_or_else(|| parse_error("HURDAT2 storm id", id))?;

        let points = lines
            .by_ref()
            .take(count)
            .map(parse_data_line)
            .collect::<Result<Vec<TrackPoint>>>()?;

        if points.len() != count {
            return Err(parse_error("HURDAT2 storm", id));
        }

        storms.push(Storm {
            id: id.to_owned(),
            name: name.to_owned(),
            season,
            points,
        });
    }

    debug!("parsed {} HURDAT2 storms", storms.len());
    Ok(storms)
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn parse_error(what: &'static str, detail: &str) -> Error {
    Error::Parse {
        what,
        detail: detail.to_owned(),
    }
}

fn parse_data_line(line: &str) -> Result<TrackPoint> {
    let fields = split_fields(line);
    if fields.len() < 8 {
        return Err(parse_error("HURDAT2 data line", line));
    }

    let time = NaiveDateTime::parse_from_str(&format!("{}{}", fields[0], fields[1]), "%Y%m%d%H%M")
        .map_err(|_| parse_error("HURDAT2 time", line))?;
    let lat = parse_coordinate(fields[4], 'N', 'S').ok_or_else(|| parse_error("latitude", line))?;
    let lon = parse_coordinate(fields[5], 'E', 'W').ok_or_else(|| parse_error("longitude", line))?;

    Ok(TrackPoint {
        time,
        lat,
        lon,
        vmax: parse_value(fields[6]).map_t(Knots),
        mslp: parse_value(fields[7]).map_t(HectoPascal),
        status: fields[3].to_owned(),
        landfall: fields[2] == "L",
    })
}

/// Parse values like `28.0N` or `94.8W` into signed degrees.
fn parse_coordinate(val: &str, positive: char, negative: char) -> Option<f64> {
    let hemisphere = val.chars().last()?;
    let number: f64 = val[..val.len() - hemisphere.len_utf8()].trim().parse().ok()?;
    if !number.is_finite() {
        return None;
    }

    if hemisphere == positive {
        Some(number)
    } else if hemisphere == negative {
        Some(-number)
    } else {
        None
    }
}

fn parse_value(val: &str) -> Optioned<f64> {
    match val.parse::<f64>() {
        Ok(v) if v > -999.0 => some(v),
        _ => none(),
    }
}
