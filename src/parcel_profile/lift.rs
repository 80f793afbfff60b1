use super::{find_parcel_start_data, ParcelAscentAnalysis};
use crate::{
    error::{Error, Result},
    interpolation::{linear_interp, linear_interpolate, linear_interpolate_sounding},
    parcel::Parcel,
    sounding::Sounding,
};
use itertools::{izip, Itertools};
use metfor::{self, Celsius, CelsiusDiff, HectoPascal, JpKg, Kelvin, Meters, Quantity};
use optional::{none, some, Optioned};

pub(super) fn lift_parcel(parcel: Parcel, snd: &Sounding) -> Result<ParcelAscentAnalysis> {
    let (parcel, lcl_pressure, lcl_temperature, levels) = analysis_levels(parcel, snd)?;

    let (lfc, el) = find_lfc_el(&levels, lcl_pressure);

    let (cape, cin) = match lfc {
        Some(lfc) => cape_cin(&levels, lfc.pressure, el.map(|el| el.pressure)),
        None => (JpKg(0.0), JpKg(0.0)),
    };

    let env_temperature_at = |p: HectoPascal| -> Optioned<Celsius> {
        linear_interpolate(snd.pressure_profile(), snd.temperature_profile(), p)
    };

    let (lfc_pressure, lfc_temperature) = lfc
        .map(|lvl| (some(lvl.pressure), env_temperature_at(lvl.pressure)))
        .unwrap_or((none(), none()));
    let (el_pressure, el_temperature) = el
        .map(|lvl| (some(lvl.pressure), env_temperature_at(lvl.pressure)))
        .unwrap_or((none(), none()));

    Ok(ParcelAscentAnalysis {
        parcel,
        cape,
        cin,
        lcl_pressure,
        lcl_temperature,
        lfc_pressure,
        lfc_temperature,
        el_pressure,
        el_temperature,
    })
}

// The parcel and environment at the starting level, every complete sounding level above it, the
// LCL, and the points where they cross. Also returns the parcel as moved to the starting level and
// its LCL.
fn analysis_levels(
    parcel: Parcel,
    snd: &Sounding,
) -> Result<(Parcel, HectoPascal, Celsius, Vec<AnalLevel>)> {
    let (lcl_pressure, lcl_temperature) = parcel_lcl(&parcel)?;

    // The starting level to lift the parcel from
    let (parcel_start_data, parcel) = find_parcel_start_data(snd, &parcel)?;

    let parcel_calc_vt = create_parcel_calc_t(parcel, lcl_pressure, true)?;

    // Start by adding the parcel level
    let p0 = parcel.pressure;
    let h0 = parcel_start_data.height.ok_or(Error::InvalidInput)?;
    let env_t0 = parcel_start_data.temperature.ok_or(Error::InterpolationError)?;
    let env_dp0 = parcel_start_data.dew_point.ok_or(Error::InterpolationError)?;
    let start = AnalLevel {
        pressure: p0,
        height: h0,
        pcl_virt_t: parcel.virtual_temperature().map(Celsius::from)?,
        env_virt_t: env_virtual_t(env_t0, env_dp0, p0),
    };

    let lcl_level = lcl_anal_level(snd, lcl_pressure, lcl_temperature, p0);

    // Get the environment data to iterate over. We want the parcel profile to have all the same
    // pressure levels as the environmental sounding, plus the LCL and any crossing points.
    let env_levels = izip!(
        snd.pressure_profile(),
        snd.height_profile(),
        snd.temperature_profile(),
        snd.dew_point_profile()
    )
    .filter(|(p, h, t, dp)| p.is_some() && h.is_some() && t.is_some() && dp.is_some())
    .map(|(p, h, t, dp)| (p.unpack(), h.unpack(), t.unpack(), dp.unpack()))
    .filter(|(p, _, _, _)| *p < p0)
    .map(|(p, h, env_t, env_dp)| AnalLevel {
        pressure: p,
        height: h,
        pcl_virt_t: parcel_calc_vt(p),
        env_virt_t: env_virtual_t(env_t, env_dp, p),
    });

    // Merge in the LCL, keeping decreasing pressure order.
    let mut levels: Vec<AnalLevel> = Vec::with_capacity(snd.len() + 5);
    levels.push(start);
    let mut pending_lcl = lcl_level;
    for lvl in env_levels {
        if let Some(lcl) = pending_lcl {
            if lcl.pressure >= lvl.pressure {
                if lcl.pressure > lvl.pressure {
                    levels.push(lcl);
                }
                pending_lcl = None;
            }
        }
        levels.push(lvl);
    }

    // Insert the points where the parcel and environment cross each other.
    let levels: Vec<AnalLevel> = levels
        .iter()
        .tuple_windows::<(_, _)>()
        .flat_map(|(&lvl0, &lvl1)| std::iter::once(lvl0).chain(crossing_level(lvl0, lvl1)))
        .chain(levels.last().copied())
        .collect();

    Ok((parcel, lcl_pressure, lcl_temperature, levels))
}

// A level in the analysis
#[derive(Clone, Copy, Debug)]
struct AnalLevel {
    pressure: HectoPascal,
    height: Meters,
    pcl_virt_t: Celsius,
    env_virt_t: Celsius,
}

impl AnalLevel {
    fn buoyancy(&self) -> CelsiusDiff {
        self.pcl_virt_t - self.env_virt_t
    }
}

pub(super) fn parcel_lcl(parcel: &Parcel) -> Result<(HectoPascal, Celsius)> {
    let (pressure, temperature) = metfor::pressure_and_temperature_at_lcl(
        parcel.temperature,
        parcel.dew_point,
        parcel.pressure,
    )
    .ok_or(Error::MetForError)?;

    Ok((pressure, Celsius::from(temperature)))
}

fn env_virtual_t(t: Celsius, dp: Celsius, p: HectoPascal) -> Celsius {
    // Dew points colder than the vapor pressure formulas allow carry no moisture.
    metfor::virtual_temperature(t, dp, p)
        .map(Celsius::from)
        .unwrap_or(t)
}

// The LCL as an analysis level, if it is above the starting level and inside the sounding.
fn lcl_anal_level(
    snd: &Sounding,
    lcl_pressure: HectoPascal,
    lcl_temperature: Celsius,
    start_pressure: HectoPascal,
) -> Option<AnalLevel> {
    if lcl_pressure >= start_pressure {
        return None;
    }

    let lcl_env = linear_interpolate_sounding(snd, lcl_pressure).ok()?;
    let height = lcl_env.height.into_option()?;
    let env_virt_t = env_virtual_t(
        lcl_env.temperature.into_option()?,
        lcl_env.dew_point.into_option()?,
        lcl_pressure,
    );
    let pcl_virt_t = env_virtual_t(lcl_temperature, lcl_temperature, lcl_pressure);

    Some(AnalLevel {
        pressure: lcl_pressure,
        height,
        pcl_virt_t,
        env_virt_t,
    })
}

/// How to calculate a parcel temperature for a given pressure level, either the actual
/// temperature or the virtual temperature.
///
/// Above the range of the saturated adiabat solver the parcel follows the dry adiabat, with its
/// equivalent potential temperature as the potential temperature.
pub(super) fn create_parcel_calc_t(
    parcel: Parcel,
    lcl_pressure: HectoPascal,
    virtual_t: bool,
) -> Result<impl Fn(HectoPascal) -> Celsius> {
    let theta = parcel.theta();
    let theta_e = parcel.theta_e()?;
    let dry_mw = parcel.mixing_ratio()?;

    let to_virtual = move |t: Celsius, dp: Option<Celsius>, p: HectoPascal| -> Celsius {
        if virtual_t {
            dp.and_then(|dp| metfor::virtual_temperature(t, dp, p))
                .map(Celsius::from)
                .unwrap_or(t)
        } else {
            t
        }
    };

    Ok(move |tgt_pres: HectoPascal| {
        if tgt_pres > lcl_pressure {
            // Dry adiabatic lifting
            let t = Celsius::from(metfor::temperature_from_pot_temp(theta, tgt_pres));
            to_virtual(t, metfor::dew_point_from_p_and_mw(tgt_pres, dry_mw), tgt_pres)
        } else {
            // Moist adiabatic lifting
            let t = metfor::temperature_from_equiv_pot_temp_saturated_and_pressure(
                tgt_pres, theta_e,
            )
            .map(Celsius::from)
            .unwrap_or_else(|| {
                Celsius::from(metfor::temperature_from_pot_temp(theta_e, tgt_pres))
            });
            to_virtual(t, Some(t), tgt_pres)
        }
    })
}

// The level between two levels where the parcel and environment have the same virtual
// temperature, if they cross.
fn crossing_level(lvl0: AnalLevel, lvl1: AnalLevel) -> Option<AnalLevel> {
    let (b0, b1) = (lvl0.buoyancy(), lvl1.buoyancy());
    let zero = CelsiusDiff(0.0);

    if (b0 < zero && b1 > zero) || (b0 > zero && b1 < zero) {
        let pressure = linear_interp(zero, b0, b1, lvl0.pressure, lvl1.pressure);
        let height = linear_interp(zero, b0, b1, lvl0.height, lvl1.height);
        let virt_t = linear_interp(zero, b0, b1, lvl0.env_virt_t, lvl1.env_virt_t);

        Some(AnalLevel {
            pressure,
            height,
            pcl_virt_t: virt_t,
            env_virt_t: virt_t,
        })
    } else {
        None
    }
}

// The LFC is the first level at or above the LCL where the parcel is at least as warm as the
// environment. The EL is the last level above the LFC where the parcel becomes cooler than the
// environment.
fn find_lfc_el(
    levels: &[AnalLevel],
    lcl_pressure: HectoPascal,
) -> (Option<AnalLevel>, Option<AnalLevel>) {
    let zero = CelsiusDiff(0.0);

    let lfc_idx = match levels
        .iter()
        .position(|lvl| lvl.pressure <= lcl_pressure && lvl.buoyancy() >= zero)
    {
        Some(idx) => idx,
        None => return (None, None),
    };

    let el = levels[lfc_idx..]
        .iter()
        .tuple_windows::<(_, _)>()
        .filter(|(lvl0, lvl1)| lvl0.buoyancy() >= zero && lvl1.buoyancy() < zero)
        .map(|(lvl0, _)| *lvl0)
        .last();

    (Some(levels[lfc_idx]), el)
}

/// Convective available potential energy and convective inhibition of a parcel in J/kg.
///
/// Assumes the levels are virtual temperatures. CAPE is the positive area between the LFC and the
/// EL, or the top of the profile if there is no EL. CIN is the negative area below the LFC.
fn cape_cin(
    levels: &[AnalLevel],
    lfc: HectoPascal,
    el: Option<HectoPascal>,
) -> (JpKg, JpKg) {
    let (cape, cin) = levels
        .iter()
        .take_while(|lvl| el.map(|el| lvl.pressure >= el).unwrap_or(true))
        .map(|lvl| {
            let (pt, et) = (Kelvin::from(lvl.pcl_virt_t), Kelvin::from(lvl.env_virt_t));
            (lvl.pressure, lvl.height, (pt - et).unpack() / et.unpack())
        })
        .tuple_windows::<(_, _)>()
        .fold((0.0, 0.0), |(mut cape, mut cin), ((_, h0, b0), (p1, h1, b1))| {
            let dz = (h1 - h0).unpack();
            if dz <= 0.0 {
                return (cape, cin);
            }

            let buoyancy = (b0 + b1) * dz;
            if p1 <= lfc {
                if buoyancy > 0.0 {
                    cape += buoyancy;
                }
            } else if buoyancy < 0.0 {
                cin += buoyancy;
            }

            (cape, cin)
        });

    let g = metfor::g.abs();
    (JpKg(cape / 2.0 * g), JpKg(cin / 2.0 * g))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        parcel::{mixed_layer_parcel, most_unstable_parcel, surface_parcel},
        wyoming::parse_response,
    };
    use chrono::NaiveDate;

    fn level(p: f64, h: f64, pt: f64, et: f64) -> AnalLevel {
        AnalLevel {
            pressure: HectoPascal(p),
            height: Meters(h),
            pcl_virt_t: Celsius(pt),
            env_virt_t: Celsius(et),
        }
    }

    #[test]
    fn test_crossing_level() {
        let cross = crossing_level(level(900.0, 1000.0, 10.0, 12.0), level(800.0, 2000.0, 6.0, 4.0))
            .unwrap();
        assert!((cross.pressure.unpack() - 850.0).abs() < 1.0e-9);
        assert!((cross.height.unpack() - 1500.0).abs() < 1.0e-9);
        assert_eq!(cross.buoyancy(), CelsiusDiff(0.0));

        assert!(
            crossing_level(level(900.0, 1000.0, 10.0, 12.0), level(800.0, 2000.0, 3.0, 4.0))
                .is_none()
        );
    }

    #[test]
    fn test_lfc_el() {
        let levels = [
            level(1000.0, 100.0, 30.0, 30.0),
            level(900.0, 1000.0, 20.0, 22.0), // LCL at 900
            level(850.0, 1500.0, 18.0, 18.0), // LFC
            level(500.0, 5800.0, -5.0, -10.0),
            level(200.0, 12000.0, -55.0, -55.0), // EL
            level(150.0, 14000.0, -65.0, -58.0),
        ];

        let (lfc, el) = find_lfc_el(&levels, HectoPascal(900.0));
        assert_eq!(lfc.unwrap().pressure, HectoPascal(850.0));
        assert_eq!(el.unwrap().pressure, HectoPascal(200.0));

        let (cape, cin) = cape_cin(&levels, HectoPascal(850.0), Some(HectoPascal(200.0)));
        assert!(cape.unpack() > 0.0);
        assert!(cin.unpack() < 0.0);

        // Never buoyant above the LCL
        let (lfc, el) = find_lfc_el(&levels[..2], HectoPascal(900.0));
        assert!(lfc.is_none());
        assert!(el.is_none());
    }

    #[test]
    fn test_lifting_covers_every_level() {
        let time = NaiveDate::from_ymd_opt(2013, 5, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let page = include_str!("../../tests/data/oun_2013052012.html");
        let snd = parse_response(page, "OUN", time).unwrap();

        for pcl in [
            surface_parcel(&snd).unwrap(),
            mixed_layer_parcel(&snd).unwrap(),
            most_unstable_parcel(&snd).unwrap(),
        ] {
            let (start, _, _, levels) = analysis_levels(pcl, &snd).unwrap();

            let env_pressures: Vec<HectoPascal> = snd
                .pressure_profile()
                .iter()
                .filter_map(|p| p.into_option())
                .filter(|&p| p < start.pressure)
                .collect();
            assert!(!env_pressures.is_empty());

            for p in env_pressures {
                assert!(levels.iter().any(|lvl| lvl.pressure == p), "{:?} missing", p);
            }

            assert_eq!(levels.last().unwrap().pressure, HectoPascal(100.0));
            assert!(levels.windows(2).all(|w| w[0].pressure > w[1].pressure));
        }
    }
}
