//! Create and analyze a profile from lifting a parcel.
use crate::{
    error::{Error, Result},
    interpolation::linear_interpolate_sounding,
    parcel::Parcel,
    sounding::{DataRow, Sounding},
};
use metfor::{self, Celsius, HectoPascal, JpKg};
use optional::Optioned;

mod lift;

/// Parcel analysis, this is a way to package the analysis of a parcel.
///
/// These are done by converting the profiles to virtual temperature. It is assumed the reason for
/// lifting the parcel and doing the analysis is related to bouyancy and convection.
#[derive(Debug, Clone)]
pub struct ParcelAscentAnalysis {
    // The orginal parcel
    parcel: Parcel,

    // Indicies from analysis
    cape: JpKg,
    cin: JpKg,
    lcl_pressure: HectoPascal,           // plotting on skew-t
    lcl_temperature: Celsius,            // plotting on skew-t
    lfc_pressure: Optioned<HectoPascal>, // plotting on skew-t
    lfc_temperature: Optioned<Celsius>,  // plotting on skew-t
    el_pressure: Optioned<HectoPascal>,  // plotting on skew-t
    el_temperature: Optioned<Celsius>,   // plotting on skew-t
}

impl ParcelAscentAnalysis {
    /// Get the CAPE.
    pub fn cape(&self) -> JpKg {
        self.cape
    }

    /// Get the CIN, this is zero or negative.
    pub fn cin(&self) -> JpKg {
        self.cin
    }

    /// Get the LCL pressure level.
    pub fn lcl_pressure(&self) -> HectoPascal {
        self.lcl_pressure
    }

    /// Get the parcel temperature at the LCL.
    pub fn lcl_temperature(&self) -> Celsius {
        self.lcl_temperature
    }

    /// Get the pressure at the LFC.
    pub fn lfc_pressure(&self) -> Optioned<HectoPascal> {
        self.lfc_pressure
    }

    /// Get the temperature at the LFC.
    pub fn lfc_temperature(&self) -> Optioned<Celsius> {
        self.lfc_temperature
    }

    /// Get the pressure at the equilibrium level.
    pub fn el_pressure(&self) -> Optioned<HectoPascal> {
        self.el_pressure
    }

    /// Get the temperature at the equilibrium level.
    pub fn el_temperature(&self) -> Optioned<Celsius> {
        self.el_temperature
    }

    /// Retrieve the original parcel.
    #[inline]
    pub fn parcel(&self) -> &Parcel {
        &self.parcel
    }
}

/// Lift a parcel for a convective parcel analysis.
///
/// The analysis is based off of virtual temperatures. The parcel is lifted through every level of
/// the sounding above its starting point. If the parcel never reaches a level of free convection
/// then the CAPE and CIN are both zero.
pub fn lift_parcel(parcel: Parcel, snd: &Sounding) -> Result<ParcelAscentAnalysis> {
    lift::lift_parcel(parcel, snd)
}

/// The temperature of a lifted parcel at every level of the sounding, for display.
///
/// The parcel follows a dry adiabat up to the LCL and a saturated adiabat above it. The result
/// includes the starting level, every sounding level above it, and the LCL, ordered by decreasing
/// pressure. These are actual temperatures, not virtual temperatures.
pub fn parcel_trajectory(parcel: &Parcel, snd: &Sounding) -> Result<Vec<(HectoPascal, Celsius)>> {
    let (lcl_pressure, lcl_temperature) = lift::parcel_lcl(parcel)?;
    let calc_t = lift::create_parcel_calc_t(*parcel, lcl_pressure, false)?;

    let mut trajectory = Vec::with_capacity(snd.len() + 2);
    trajectory.push((parcel.pressure, parcel.temperature));

    let mut lcl_added = lcl_pressure >= parcel.pressure;
    for p in snd
        .pressure_profile()
        .iter()
        .filter_map(|p| p.into_option())
        .filter(|&p| p < parcel.pressure)
    {
        if !lcl_added && p <= lcl_pressure {
            trajectory.push((lcl_pressure, lcl_temperature));
            lcl_added = true;
        }

        trajectory.push((p, calc_t(p)));
    }

    Ok(trajectory)
}

/// In order for parcel lifting to work and create a parallel environmental profile, we need to
/// start at a level in the sounding with pressure, height, temperature, and dew point. Otherwise
/// we end up with too much missing data in the sounding.
pub(crate) fn find_parcel_start_data(snd: &Sounding, parcel: &Parcel) -> Result<(DataRow, Parcel)> {
    let good_row = |row: &DataRow| -> bool {
        row.temperature.is_some()
            && row.dew_point.is_some()
            && row.pressure.is_some()
            && row.height.is_some()
    };

    if let Ok(first_guess) = linear_interpolate_sounding(snd, parcel.pressure) {
        if good_row(&first_guess) {
            return Ok((first_guess, *parcel));
        }
    }

    let second_guess = snd
        .bottom_up()
        .find(good_row)
        .ok_or(Error::NotEnoughData)?;

    // Move the parcel to the new level, conserving potential temperature and mixing ratio.
    let pressure = second_guess.pressure.ok_or(Error::InvalidInput)?;
    let temperature = Celsius::from(metfor::temperature_from_pot_temp(parcel.theta(), pressure));
    let mw = parcel.mixing_ratio()?;
    let dew_point = metfor::dew_point_from_p_and_mw(pressure, mw).ok_or(Error::MetForError)?;
    let new_parcel = Parcel {
        pressure,
        temperature,
        dew_point,
    };

    Ok((second_guess, new_parcel))
}
