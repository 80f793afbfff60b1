//! Data type and methods for building and describing an analysis.
//!
//! The analysis bundles every derived quantity needed to draw one sounding figure.
use crate::{
    error::Result,
    indexes::precipitable_water,
    parcel::{mixed_layer_parcel, most_unstable_parcel, surface_parcel},
    parcel_profile::{lift_parcel, parcel_trajectory, ParcelAscentAnalysis},
    sounding::Sounding,
    wind::{bulk_shear, wind_components},
};
use log::warn;
use metfor::{Celsius, HectoPascal, JpKg, Knots, Meters, Mm, Quantity, WindUV};

/// Convenient package for the derived values of a sounding.
///
/// Surface based parcel values (LCL, LFC, EL and the parcel trajectory) are required, every other
/// value is optional and displayed as missing when it could not be computed.
#[derive(Debug, Clone)]
pub struct Analysis {
    // Sounding used to make the analysis
    sounding: Sounding,

    wind_components: Vec<Option<WindUV<Knots>>>,
    parcel_trajectory: Vec<(HectoPascal, Celsius)>,

    // Parcel analysis
    surface: ParcelAscentAnalysis,
    mixed_layer: Option<ParcelAscentAnalysis>,
    most_unstable: Option<ParcelAscentAnalysis>,

    // Profile specific indicies
    precipitable_water: Option<Mm>,
    shear_0_1km: Option<Knots>,
    shear_0_6km: Option<Knots>,
}

/// One line of the text panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry {
    /// Description, like "LCL:".
    pub label: &'static str,
    /// The formatted value with units.
    pub value: String,
}

impl Analysis {
    /// Analyze the sounding.
    ///
    /// Fails if there is no surface parcel to lift. Other quantities that fail are logged and
    /// left missing.
    pub fn analyze(snd: Sounding) -> Result<Self> {
        let sfc_parcel = surface_parcel(&snd)?;
        let surface = lift_parcel(sfc_parcel, &snd)?;
        let parcel_trajectory = parcel_trajectory(&sfc_parcel, &snd)?;

        let mixed_layer = tolerate(
            "mixed layer parcel",
            mixed_layer_parcel(&snd).and_then(|pcl| lift_parcel(pcl, &snd)),
        );
        let most_unstable = tolerate(
            "most unstable parcel",
            most_unstable_parcel(&snd).and_then(|pcl| lift_parcel(pcl, &snd)),
        );
        let precipitable_water = tolerate("precipitable water", precipitable_water(&snd));
        let shear_0_1km = tolerate("0-1 km shear", bulk_shear(&snd, Meters(1000.0)))
            .map(|shear| shear.speed);
        let shear_0_6km = tolerate("0-6 km shear", bulk_shear(&snd, Meters(6000.0)))
            .map(|shear| shear.speed);

        Ok(Analysis {
            wind_components: wind_components(&snd),
            sounding: snd,
            parcel_trajectory,
            surface,
            mixed_layer,
            most_unstable,
            precipitable_water,
            shear_0_1km,
            shear_0_6km,
        })
    }

    /// Get a reference to the sounding.
    pub fn sounding(&self) -> &Sounding {
        &self.sounding
    }

    /// Wind components in knots, parallel to the sounding profiles.
    pub fn wind_components(&self) -> &[Option<WindUV<Knots>>] {
        &self.wind_components
    }

    /// Temperature of the surface parcel as it is lifted, for display.
    pub fn parcel_trajectory(&self) -> &[(HectoPascal, Celsius)] {
        &self.parcel_trajectory
    }

    /// Surface based parcel analysis.
    pub fn surface_parcel_analysis(&self) -> &ParcelAscentAnalysis {
        &self.surface
    }

    /// Mixed layer parcel analysis.
    pub fn mixed_layer_parcel_analysis(&self) -> Option<&ParcelAscentAnalysis> {
        self.mixed_layer.as_ref()
    }

    /// Most unstable parcel analysis.
    pub fn most_unstable_parcel_analysis(&self) -> Option<&ParcelAscentAnalysis> {
        self.most_unstable.as_ref()
    }

    /// Precipitable water.
    pub fn precipitable_water(&self) -> Option<Mm> {
        self.precipitable_water
    }

    /// Magnitude of the 0-1 km bulk shear.
    pub fn shear_0_1km(&self) -> Option<Knots> {
        self.shear_0_1km
    }

    /// Magnitude of the 0-6 km bulk shear.
    pub fn shear_0_6km(&self) -> Option<Knots> {
        self.shear_0_6km
    }

    /// The (pressure, temperature) points marking the LCL, LFC, and EL of the surface parcel.
    pub fn level_markers(&self) -> Vec<(HectoPascal, Celsius)> {
        let sfc = &self.surface;

        std::iter::once(Some((sfc.lcl_pressure(), sfc.lcl_temperature())))
            .chain(std::iter::once(
                sfc.lfc_pressure()
                    .into_option()
                    .zip(sfc.lfc_temperature().into_option()),
            ))
            .chain(std::iter::once(
                sfc.el_pressure()
                    .into_option()
                    .zip(sfc.el_temperature().into_option()),
            ))
            .flatten()
            .collect()
    }

    /// The lines of the text panel, every derived quantity rounded to one decimal place.
    pub fn panel_entries(&self) -> Vec<PanelEntry> {
        let stn = self.sounding.station_info();
        let (lat, lon) = stn.location().unzip();
        let sfc = &self.surface;
        let mu = self.most_unstable.as_ref();
        let ml = self.mixed_layer.as_ref();

        let hpa = |p: Option<HectoPascal>| format_quantity(p.map(|p| p.unpack()), "hPa");
        let jpkg = |e: Option<JpKg>| format_quantity(e.map(|e| e.unpack()), "J/kg");

        let entry = |label: &'static str, value: String| PanelEntry { label, value };

        vec![
            entry("Latitude:", format_plain(lat)),
            entry("Longitude:", format_plain(lon)),
            entry(
                "Height ASL:",
                format_quantity(stn.elevation().into_option().map(|e| e.unpack()), "m"),
            ),
            entry("LCL:", hpa(Some(sfc.lcl_pressure()))),
            entry("LFC:", hpa(sfc.lfc_pressure().into_option())),
            entry("EL:", hpa(sfc.el_pressure().into_option())),
            entry("Most unstable parcel:", hpa(mu.map(|a| a.parcel().pressure))),
            entry("MUCAPE:", jpkg(mu.map(|a| a.cape()))),
            entry("MUCIN:", jpkg(mu.map(|a| a.cin()))),
            entry("SBCAPE:", jpkg(Some(sfc.cape()))),
            entry("SBCIN:", jpkg(Some(sfc.cin()))),
            entry("MLCAPE:", jpkg(ml.map(|a| a.cape()))),
            entry("MLCIN:", jpkg(ml.map(|a| a.cin()))),
            entry(
                "Shear (0-1 km):",
                format_quantity(self.shear_0_1km.map(|s| s.unpack()), "kt"),
            ),
            entry(
                "Shear (0-6 km):",
                format_quantity(self.shear_0_6km.map(|s| s.unpack()), "kt"),
            ),
            entry(
                "Precipitable water:",
                format_quantity(self.precipitable_water.map(|pw| pw.unpack()), "mm"),
            ),
        ]
    }
}

fn tolerate<T>(what: &str, res: Result<T>) -> Option<T> {
    match res {
        Ok(val) => Some(val),
        Err(err) => {
            warn!("unable to compute {}: {}", what, err);
            None
        }
    }
}

/// Round a value to one decimal place.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::round_to_tenth;
///
/// assert_eq!(round_to_tenth(1234.56), 1234.6);
/// assert_eq!(round_to_tenth(-0.04), 0.0);
/// ```
pub fn round_to_tenth(val: f64) -> f64 {
    let rounded = (val * 10.0).round() / 10.0;
    // No negative zeros on the display
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format an optional value rounded to one decimal place with its unit abbreviation.
///
/// # Examples
///
/// ```rust
/// use wx_viewer::format_quantity;
///
/// assert_eq!(format_quantity(Some(912.345), "hPa"), "912.3 hPa");
/// assert_eq!(format_quantity(None, "J/kg"), "--");
/// ```
pub fn format_quantity(val: Option<f64>, units: &str) -> String {
    match val {
        Some(v) => format!("{:.1} {}", round_to_tenth(v), units),
        None => "--".to_owned(),
    }
}

fn format_plain(val: Option<f64>) -> String {
    val.map(|v| v.to_string()).unwrap_or_else(|| "--".to_owned())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sounding::doctest::make_test_sounding;

    #[test]
    fn test_analyze() {
        let anal = Analysis::analyze(make_test_sounding()).unwrap();

        assert!(anal.mixed_layer_parcel_analysis().is_some());
        assert!(anal.most_unstable_parcel_analysis().is_some());
        assert!(anal.precipitable_water().is_some());
        assert!(anal.shear_0_1km().is_some());
        assert!(anal.shear_0_6km().is_some());
        assert_eq!(anal.wind_components().len(), anal.sounding().len());
        assert_eq!(anal.level_markers().len(), 3);
    }

    #[test]
    fn test_panel_entries() {
        let anal = Analysis::analyze(make_test_sounding()).unwrap();
        let entries = anal.panel_entries();

        let labels: Vec<&str> = entries.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "Latitude:",
                "Longitude:",
                "Height ASL:",
                "LCL:",
                "LFC:",
                "EL:",
                "Most unstable parcel:",
                "MUCAPE:",
                "MUCIN:",
                "SBCAPE:",
                "SBCIN:",
                "MLCAPE:",
                "MLCIN:",
                "Shear (0-1 km):",
                "Shear (0-6 km):",
                "Precipitable water:",
            ]
        );

        assert_eq!(entries[0].value, "35.2");
        assert_eq!(entries[1].value, "-97.4");
        assert_eq!(entries[2].value, "110.0 m");
        assert_eq!(entries[6].value, "1000.0 hPa");

        // Every derived value is rounded to one decimal with a unit.
        for entry in &entries[3..] {
            let number = entry.value.split(' ').next().unwrap();
            let decimals = number.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 1, "{:?}", entry);
        }
    }

    #[test]
    fn test_missing_analysis() {
        assert!(Analysis::analyze(Sounding::new()).is_err());
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(0.05), 0.1);
        assert_eq!(round_to_tenth(-12.34), -12.3);
        assert_eq!(format_quantity(Some(-0.01), "J/kg"), "0.0 J/kg");
    }
}
