//! Functions for doing parcel analysis on a sounding, specifically related to convection.
//!
use crate::{
    error::{Error, Result},
    interpolation::linear_interpolate_sounding,
    sounding::{DataRow, Sounding},
};
use itertools::{izip, Itertools};
use metfor::{self, Celsius, HectoPascal, Kelvin, Quantity};

/// Variables defining a parcel as used in parcel analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parcel {
    /// Temperature in C
    pub temperature: Celsius,
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Dew point in C
    pub dew_point: Celsius,
}

impl Parcel {
    /// Get the potential temperature of the parcel
    pub fn theta(&self) -> Kelvin {
        metfor::potential_temperature(self.pressure, self.temperature)
    }

    /// Get the equivalent potential temperature of the parcel
    pub fn theta_e(&self) -> Result<Kelvin> {
        metfor::equiv_pot_temperature(self.temperature, self.dew_point, self.pressure)
            .ok_or(Error::MetForError)
    }

    /// Get the mixing ratio of the parcel.
    pub fn mixing_ratio(&self) -> Result<f64> {
        metfor::mixing_ratio(self.dew_point, self.pressure).ok_or(Error::MetForError)
    }

    /// Get the virtual temperature of the parcel
    pub fn virtual_temperature(&self) -> Result<Kelvin> {
        metfor::virtual_temperature(self.temperature, self.dew_point, self.pressure)
            .ok_or(Error::MetForError)
    }

    /// Try to convert a `DataRow` to a `Parcel`.
    pub fn from_datarow(dr: DataRow) -> Option<Self> {
        let temperature = dr.temperature.into_option()?;
        let pressure = dr.pressure.into_option()?;
        let dew_point = dr.dew_point.into_option()?;

        Some(Parcel {
            temperature,
            pressure,
            dew_point,
        })
    }
}

/// Depth of the mixed layer above the surface.
const MIXED_LAYER_DEPTH: HectoPascal = HectoPascal(100.0);
/// Depth above the surface searched for the most unstable parcel.
const MOST_UNSTABLE_DEPTH: HectoPascal = HectoPascal(300.0);

/// Get a surface parcel, the lowest level with a pressure, temperature, and dew point.
pub fn surface_parcel(snd: &Sounding) -> Result<Parcel> {
    if snd.pressure_profile().is_empty()
        || snd.temperature_profile().is_empty()
        || snd.dew_point_profile().is_empty()
    {
        return Err(Error::MissingProfile);
    }

    snd.bottom_up()
        .find_map(Parcel::from_datarow)
        .ok_or(Error::NoDataProfile)
}

/// Create a mixed layer parcel.
///
/// The potential temperature and mixing ratio are the pressure weighted means over the lowest
/// 100 hPa of the sounding. The parcel starts at the surface pressure.
pub fn mixed_layer_parcel(snd: &Sounding) -> Result<Parcel> {
    let sfc = surface_parcel(snd)?;
    let bottom_p = sfc.pressure;
    let top_p = bottom_p - MIXED_LAYER_DEPTH;

    let top = linear_interpolate_sounding(snd, top_p)
        .ok()
        .and_then(Parcel::from_datarow)
        .ok_or(Error::NotEnoughData)?;

    let (sum_theta, sum_mw, sum_dp) = izip!(
        snd.pressure_profile(),
        snd.temperature_profile(),
        snd.dew_point_profile()
    )
    .filter(|(p, t, dp)| p.is_some() && t.is_some() && dp.is_some())
    .map(|(p, t, dp)| Parcel {
        pressure: p.unpack(),
        temperature: t.unpack(),
        dew_point: dp.unpack(),
    })
    .skip_while(|pcl| pcl.pressure > bottom_p)
    .take_while(|pcl| pcl.pressure > top_p)
    .chain(std::iter::once(top))
    .filter_map(|pcl| {
        pcl.mixing_ratio()
            .ok()
            .map(|mw| (pcl.pressure, pcl.theta(), mw))
    })
    .tuple_windows::<(_, _)>()
    .fold(
        (0.0, 0.0, 0.0),
        |(mut sum_theta, mut sum_mw, mut sum_dp), ((p0, th0, mw0), (p1, th1, mw1))| {
            let dp = (p0 - p1).unpack();
            sum_theta += (th0.unpack() + th1.unpack()) * dp;
            sum_mw += (mw0 + mw1) * dp;
            sum_dp += dp;
            (sum_theta, sum_mw, sum_dp)
        },
    );

    if sum_dp <= 0.0 {
        return Err(Error::NotEnoughData);
    }

    let theta = Kelvin(sum_theta / sum_dp / 2.0);
    let mw = sum_mw / sum_dp / 2.0;

    let temperature = Celsius::from(metfor::temperature_from_pot_temp(theta, bottom_p));
    let dew_point = metfor::dew_point_from_p_and_mw(bottom_p, mw).ok_or(Error::MetForError)?;
    // Supersaturation from averaging a saturated layer.
    let dew_point = if dew_point > temperature {
        temperature
    } else {
        dew_point
    };

    Ok(Parcel {
        temperature,
        pressure: bottom_p,
        dew_point,
    })
}

/// Get the most unstable parcel.
///
/// This is defined as the parcel in the lowest 300 hPa of the sounding with the highest equivalent
/// potential temperature.
pub fn most_unstable_parcel(snd: &Sounding) -> Result<Parcel> {
    let bottom_p = surface_parcel(snd)?.pressure;
    let top_p = bottom_p - MOST_UNSTABLE_DEPTH;

    snd.bottom_up()
        .filter_map(Parcel::from_datarow)
        .take_while(|pcl| pcl.pressure >= top_p)
        .filter_map(|pcl| pcl.theta_e().ok().map(|theta_e| (pcl, theta_e)))
        .fold(None, |best: Option<(Parcel, Kelvin)>, (pcl, theta_e)| match best {
            Some((_, max_theta_e)) if max_theta_e >= theta_e => best,
            _ => Some((pcl, theta_e)),
        })
        .map(|(pcl, _)| pcl)
        .ok_or(Error::NotEnoughData)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sounding::doctest::make_test_sounding;

    #[test]
    fn test_surface_parcel() {
        let snd = make_test_sounding();
        let pcl = surface_parcel(&snd).unwrap();

        assert_eq!(pcl.pressure, HectoPascal(1000.0));
        assert_eq!(pcl.temperature, Celsius(30.0));
        assert_eq!(pcl.dew_point, Celsius(22.0));

        assert!(surface_parcel(&Sounding::new()).is_err());
    }

    #[test]
    fn test_mixed_layer_parcel() {
        let snd = make_test_sounding();
        let sfc = surface_parcel(&snd).unwrap();
        let ml = mixed_layer_parcel(&snd).unwrap();

        assert_eq!(ml.pressure, sfc.pressure);
        assert!(ml.dew_point <= ml.temperature);
        // Mixing dries out the moist surface layer.
        assert!(ml.dew_point < sfc.dew_point);
        assert!(ml.mixing_ratio().unwrap() < sfc.mixing_ratio().unwrap());
    }

    #[test]
    fn test_most_unstable_parcel() {
        let snd = make_test_sounding();
        let mu = most_unstable_parcel(&snd).unwrap();
        let mu_theta_e = mu.theta_e().unwrap();

        assert!(mu.pressure >= HectoPascal(700.0));
        for pcl in snd.bottom_up().filter_map(Parcel::from_datarow) {
            if pcl.pressure >= HectoPascal(700.0) {
                assert!(pcl.theta_e().unwrap() <= mu_theta_e);
            }
        }
    }
}
