//! Data type and methods to store an upper-air sounding.

use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use optional::Optioned;

pub use self::{data_row::DataRow, station_info::StationInfo};

/// All the variables stored in the sounding.
///
/// The upper air profile variables are stored in parallel vectors ordered by decreasing pressure,
/// so the first row is the lowest reported level. If a profile lacks a certain variable that
/// whole vector has length 0 instead of being full of missing values.
///
#[derive(Clone, Debug, Default)]
pub struct Sounding {
    // Description of the source of the sounding.
    source: Option<String>,

    // Station info
    station: StationInfo,

    // Valid time of sounding
    valid_time: Option<NaiveDateTime>,

    // Profiles
    pressure: Vec<Optioned<HectoPascal>>,
    temperature: Vec<Optioned<Celsius>>,
    dew_point: Vec<Optioned<Celsius>>,
    wind: Vec<Optioned<WindSpdDir<Knots>>>,
    height: Vec<Optioned<Meters>>,
}

macro_rules! make_profile_setter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:ty, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(self, profile: Vec<Optioned<$inner_type>>) -> Self {
            Self {$p_var: profile, ..self}
        }
    };
}

impl Sounding {
    /// Create a new sounding with default values. This is a proxy for default with a clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::Sounding;
    ///
    /// let snd = Sounding::new();
    /// assert!(snd.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Sounding::default()
    }

    /// Add a source description to this sounding.
    #[inline]
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Retrieve a source description for this sounding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::Sounding;
    ///
    /// let snd = Sounding::new().with_source_description("University of Wyoming".to_owned());
    /// assert_eq!(snd.source_description().unwrap(), "University of Wyoming");
    ///
    /// let snd = snd.with_source_description(None);
    /// assert!(snd.source_description().is_none());
    /// ```
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Builder function for setting the station info.
    #[inline]
    pub fn with_station_info(mut self, new_value: StationInfo) -> Self {
        self.station = new_value;
        self
    }

    /// Get the station info
    #[inline]
    pub fn station_info(&self) -> &StationInfo {
        &self.station
    }

    make_profile_setter!(
        /// Builder method for the pressure profile.
        ///
        /// # Examples
        /// ```rust
        /// use wx_viewer::Sounding;
        /// use metfor::HectoPascal;
        /// use optional::{some, Optioned};
        ///
        /// let data = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0, 250.0, 200.0, 150.0, 100.0];
        /// let pressure_data: Vec<Optioned<HectoPascal>> = data.into_iter()
        ///     .map(HectoPascal)
        ///     .map(some)
        ///     .collect();
        ///
        /// let snd = Sounding::new().with_pressure_profile(pressure_data);
        /// assert_eq!(snd.len(), 10);
        /// ```
        #[inline]
        => with_pressure_profile, HectoPascal, pressure
    );

    /// Get the pressure profile
    #[inline]
    pub fn pressure_profile(&self) -> &[Optioned<HectoPascal>] {
        &self.pressure
    }

    make_profile_setter!(
        /// Builder method for the temperature profile.
        ///
        /// See `with_pressure_profile` for an example of usage, keeping in mind the units type may
        /// be different.
        #[inline]
        => with_temperature_profile, Celsius, temperature
    );

    /// Get the temperature profile.
    #[inline]
    pub fn temperature_profile(&self) -> &[Optioned<Celsius>] {
        &self.temperature
    }

    make_profile_setter!(
        /// Builder method for the dew point profile.
        #[inline]
        => with_dew_point_profile, Celsius, dew_point
    );

    /// Get the dew point profile.
    #[inline]
    pub fn dew_point_profile(&self) -> &[Optioned<Celsius>] {
        &self.dew_point
    }

    make_profile_setter!(
        /// Builder method for the wind profile.
        #[inline]
        => with_wind_profile, WindSpdDir<Knots>, wind
    );

    /// Get the wind profile.
    #[inline]
    pub fn wind_profile(&self) -> &[Optioned<WindSpdDir<Knots>>] {
        &self.wind
    }

    make_profile_setter!(
        /// Builder method for the geopotential height profile.
        #[inline]
        => with_height_profile, Meters, height
    );

    /// Get the geopotential height profile.
    #[inline]
    pub fn height_profile(&self) -> &[Optioned<Meters>] {
        &self.height
    }

    /// Valid time of the sounding.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// Builder method to set the valid time of the sounding.
    ///
    /// # Examples
    /// ```rust
    /// use wx_viewer::Sounding;
    /// use chrono::NaiveDate;
    ///
    /// let vtime = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// let _snd = Sounding::new().with_valid_time(vtime);
    /// let snd = Sounding::new().with_valid_time(Some(vtime));
    /// assert_eq!(snd.valid_time(), Some(vtime));
    /// ```
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Number of levels in the sounding.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// True if there are no levels in the sounding.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Get a bottom up iterator over the data rows. The first value returned from the iterator is
    /// the lowest level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{HectoPascal, Celsius};
    /// use optional::some;
    /// use wx_viewer::Sounding;
    ///
    /// let pres: Vec<_> = vec![1000.0, 925.0, 850.0].into_iter()
    ///     .map(HectoPascal).map(some).collect();
    /// let temps: Vec<_> = vec![20.0, 18.0, 17.0].into_iter()
    ///     .map(Celsius).map(some).collect();
    ///
    /// let snd = Sounding::new()
    ///     .with_pressure_profile(pres)
    ///     .with_temperature_profile(temps);
    ///
    /// let mut iter = snd.bottom_up();
    ///
    /// let row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(1000.0));
    /// assert_eq!(row.temperature.unwrap(), Celsius(20.0));
    /// assert!(row.wind.is_none()); // We never set wind profile.
    ///
    /// assert_eq!(iter.count(), 2);
    /// ```
    #[inline]
    pub fn bottom_up(&self) -> impl Iterator<Item = DataRow> + '_ {
        ProfileIterator {
            next_idx: 0,
            src: self,
        }
    }

    /// Get a row of data values from this sounding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{HectoPascal, Celsius};
    /// use optional::some;
    /// use wx_viewer::Sounding;
    ///
    /// let pres: Vec<_> = vec![1000.0, 925.0, 850.0].into_iter()
    ///     .map(HectoPascal).map(some).collect();
    /// let temps: Vec<_> = vec![20.0, 18.0, 17.0].into_iter()
    ///     .map(Celsius).map(some).collect();
    ///
    /// let snd = Sounding::new()
    ///     .with_pressure_profile(pres)
    ///     .with_temperature_profile(temps);
    ///
    /// let row = snd.data_row(1).unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(925.0));
    /// assert_eq!(row.temperature.unwrap(), Celsius(18.0));
    ///
    /// assert!(snd.data_row(3).is_none()); // There weren't that many rows!
    /// ```
    #[inline]
    pub fn data_row(&self, idx: usize) -> Option<DataRow> {
        macro_rules! copy_to_result {
            ($result:ident, $profile:ident, $idx:ident) => {
                match self.$profile.get($idx) {
                    None => {}
                    Some(opt_val) => $result.$profile = *opt_val,
                }
            };
        }

        if idx >= self.pressure.len() {
            return None;
        }

        let mut result = DataRow::default();

        copy_to_result!(result, pressure, idx);
        copy_to_result!(result, temperature, idx);
        copy_to_result!(result, dew_point, idx);
        copy_to_result!(result, wind, idx);
        copy_to_result!(result, height, idx);

        Some(result)
    }

    /// The lowest pressure level with a value, this is where parcels start.
    #[inline]
    pub fn bottom_pressure(&self) -> Option<HectoPascal> {
        self.pressure.iter().filter_map(|p| p.into_option()).next()
    }

    /// The ground elevation. Uses the station elevation if known, otherwise the height of the
    /// lowest level.
    #[inline]
    pub fn ground_elevation(&self) -> Option<Meters> {
        self.station
            .elevation()
            .into_option()
            .or_else(|| self.height.iter().filter_map(|h| h.into_option()).next())
    }
}

/// Bottom up iterator over the data rows of a sounding.
struct ProfileIterator<'a> {
    next_idx: usize,
    src: &'a Sounding,
}

impl<'a> Iterator for ProfileIterator<'a> {
    type Item = DataRow;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let result = self.src.data_row(self.next_idx)?;
        self.next_idx += 1;
        Some(result)
    }
}

// Fixture for tests and benches.
#[doc(hidden)]
pub mod doctest {
    use super::*;
    use optional::some;

    /// A small, convectively unstable sounding good enough for exercising the analysis.
    pub fn make_test_sounding() -> super::Sounding {
        #[rustfmt::skip]
        let rows: [(f64, f64, f64, f64, f64, f64); 14] = [
            // pres,  hght,   temp,  dwpt, drct, sknt
            (1000.0,   110.0,  30.0,  22.0, 170.0, 10.0),
            ( 950.0,   560.0,  26.0,  20.0, 185.0, 20.0),
            ( 900.0,  1030.0,  22.5,  17.0, 200.0, 25.0),
            ( 850.0,  1520.0,  19.0,  14.0, 215.0, 30.0),
            ( 800.0,  2040.0,  15.5,   9.0, 225.0, 32.0),
            ( 700.0,  3150.0,   8.0,   0.0, 240.0, 35.0),
            ( 600.0,  4400.0,  -1.0,  -9.0, 250.0, 40.0),
            ( 500.0,  5850.0, -10.0, -20.0, 255.0, 50.0),
            ( 400.0,  7550.0, -21.0, -33.0, 260.0, 60.0),
            ( 300.0,  9650.0, -36.0, -46.0, 265.0, 70.0),
            ( 250.0, 10950.0, -45.0, -55.0, 265.0, 75.0),
            ( 200.0, 12450.0, -53.0, -63.0, 270.0, 70.0),
            ( 150.0, 14300.0, -58.0, -70.0, 270.0, 55.0),
            ( 100.0, 16700.0, -62.0, -78.0, 275.0, 30.0),
        ];

        let p = rows.iter().map(|r| some(HectoPascal(r.0))).collect();
        let h = rows.iter().map(|r| some(Meters(r.1))).collect();
        let t = rows.iter().map(|r| some(Celsius(r.2))).collect();
        let dp = rows.iter().map(|r| some(Celsius(r.3))).collect();
        let w = rows
            .iter()
            .map(|r| {
                some(WindSpdDir {
                    speed: Knots(r.5),
                    direction: r.4,
                })
            })
            .collect();

        Sounding::new()
            .with_station_info(
                StationInfo::new()
                    .with_station_id("TST".to_owned())
                    .with_lat_lon((35.2, -97.4))
                    .with_elevation(Meters(110.0)),
            )
            .with_pressure_profile(p)
            .with_height_profile(h)
            .with_temperature_profile(t)
            .with_dew_point_profile(dp)
            .with_wind_profile(w)
    }
}


mod data_row;
mod station_info;
