//! Wind components and bulk shear.
use crate::{
    error::Result,
    layers::{self, Layer},
    sounding::Sounding,
};
use metfor::{Knots, Meters, WindSpdDir, WindUV};

/// Decompose every level of the wind profile into u and v components in knots.
///
/// Levels without a reported wind are `None`, so the result stays parallel to the other profiles.
pub fn wind_components(snd: &Sounding) -> Vec<Option<WindUV<Knots>>> {
    snd.wind_profile()
        .iter()
        .map(|w| w.into_option().map(WindUV::<Knots>::from))
        .collect()
}

/// Bulk shear from the lowest reported wind to `depth` meters above ground level.
pub fn bulk_shear(snd: &Sounding, depth: Meters) -> Result<WindSpdDir<Knots>> {
    let layer: Layer = layers::layer_agl(snd, depth)?;
    layer.wind_shear()
}
