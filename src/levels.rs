//! This module finds significant levels by height. Levels related to parcel analysis, such as the
//! LCL or LFC, are found in the `parcel_profile` module.
use crate::{
    error::{Error, Result},
    interpolation::linear_interpolate_sounding_at_height,
    sounding::{DataRow, Sounding},
};
use metfor::Meters;

/// A level in the atmosphere is described by a `DataRow` from a sounding.
pub type Level = DataRow;

/// Interpolate the sounding at a geopotential height above sea level.
pub fn height_level(tgt_height: Meters, snd: &Sounding) -> Result<Level> {
    if snd.height_profile().is_empty() || snd.pressure_profile().is_empty() {
        return Err(Error::MissingProfile);
    }

    linear_interpolate_sounding_at_height(snd, tgt_height)
}

/// Interpolate the sounding at a height above ground level.
///
/// The ground is the station elevation, or the lowest reported height when the elevation is
/// unknown.
pub fn height_level_agl(meters_agl: Meters, snd: &Sounding) -> Result<Level> {
    let ground = snd.ground_elevation().ok_or(Error::MissingValue)?;
    height_level(ground + meters_agl, snd)
}
