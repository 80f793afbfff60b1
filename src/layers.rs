//! This module finds layers of the atmosphere and the bulk properties of a layer.
use crate::{
    error::{Error, Result},
    sounding::DataRow,
};
use metfor::{Knots, Quantity, WindSpdDir, WindUV};

/// A layer in the atmosphere described by the values at the top and bottom.
#[derive(Debug, Clone, Copy)]
pub struct Layer {
    /// Sounding values at the bottom of the layer.
    pub bottom: DataRow,
    /// Sounding values at the top of the layer.
    pub top: DataRow,
}

impl Layer {
    /// Get the bulk wind shear, the vector difference between the winds at the top and bottom.
    pub fn wind_shear(&self) -> Result<WindSpdDir<Knots>> {
        let top = self.top.wind.ok_or(Error::MissingValue)?;
        let bottom = self.bottom.wind.ok_or(Error::MissingValue)?;

        let top = WindUV::<Knots>::from(top);
        let bottom = WindUV::<Knots>::from(bottom);

        let shear = WindUV {
            u: Knots(top.u.unpack() - bottom.u.unpack()),
            v: Knots(top.v.unpack() - bottom.v.unpack()),
        };

        Ok(WindSpdDir::from(shear))
    }
}


mod height_pressure;
pub use height_pressure::layer_agl;
