use super::Layer;
use crate::{
    error::{Error, Result},
    levels::height_level_agl,
    sounding::{DataRow, Sounding},
};
use metfor::Meters;

/// Get a layer from the ground up to a certain depth, like 1km or 6km.
///
/// The bottom of the layer is the lowest level that reports a wind, the top is interpolated.
#[inline]
pub fn layer_agl(snd: &Sounding, meters_agl: Meters) -> Result<Layer> {
    let bottom: DataRow = snd
        .bottom_up()
        .find(|row| row.pressure.is_some() && row.wind.is_some())
        .ok_or(Error::MissingValue)?;

    let top = height_level_agl(meters_agl, snd)?;
    Ok(Layer { bottom, top })
}
