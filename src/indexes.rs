//! Indexes that are specific to a sounding, but not a particular parcel analysis of that sounding.

use crate::{
    error::{Error, Result},
    sounding::Sounding,
};
use itertools::{izip, Itertools};
use metfor::{mixing_ratio, Mm, Quantity};

/// Precipitable water (mm), the trapezoid integral of the mixing ratio over the whole column.
#[inline]
pub fn precipitable_water(snd: &Sounding) -> Result<Mm> {
    let p_profile = snd.pressure_profile();
    let dp_profile = snd.dew_point_profile();

    if p_profile.is_empty() || dp_profile.is_empty() {
        return Err(Error::MissingProfile);
    }

    let (integrated_mw, layers) = izip!(p_profile, dp_profile)
        // Remove levels with missing data
        .filter(|(p, dp)| p.is_some() && dp.is_some())
        .map(|(p, dp)| (p.unpack(), dp.unpack()))
        // Convert dew point to mixing ratio, removing failed levels.
        .filter_map(|(p, dp)| mixing_ratio(dp, p).map(|mw| (p, mw)))
        .tuple_windows::<(_, _)>()
        .fold((0.0, 0usize), |(mut acc_mw, count), ((p0, mw0), (p1, mw1))| {
            let dp = p0 - p1;
            acc_mw += (mw0 + mw1) * dp.unpack();

            (acc_mw, count + 1)
        });

    if layers == 0 {
        return Err(Error::NotEnoughData);
    }

    Ok(Mm(integrated_mw / 9.81 / 997.0 * 100_000.0 / 2.0))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sounding::doctest::make_test_sounding;
    use metfor::{Celsius, HectoPascal};
    use optional::some;

    #[test]
    fn test_precipitable_water() {
        let pw = precipitable_water(&make_test_sounding()).unwrap();

        // A warm, moist sounding.
        assert!(pw > Mm(35.0));
        assert!(pw < Mm(70.0));
    }

    #[test]
    fn test_precipitable_water_single_level() {
        let snd = Sounding::new()
            .with_pressure_profile(vec![some(HectoPascal(1000.0))])
            .with_dew_point_profile(vec![some(Celsius(10.0))]);

        assert!(precipitable_water(&snd).is_err());
        assert!(precipitable_water(&Sounding::new()).is_err());
    }
}
