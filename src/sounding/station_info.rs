use metfor::Meters;
use optional::Optioned;

/// Station information including location data and identification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationInfo {
    /// WMO station number, eg 72357
    num: Optioned<i32>,
    /// Station identifier, eg OUN
    id: Option<String>,
    /// Latitude and longitude.
    location: Option<(f64, f64)>,
    /// Elevation of the launch site.
    elevation: Optioned<Meters>,
}

impl StationInfo {
    /// Create a new object with default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::StationInfo;
    ///
    /// assert!(StationInfo::new().station_num().is_none());
    /// assert!(StationInfo::new().station_id().is_none());
    /// assert!(StationInfo::new().location().is_none());
    /// assert!(StationInfo::new().elevation().is_none());
    ///
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a station number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::StationInfo;
    ///
    /// assert_eq!(StationInfo::new().with_station(72357).station_num().unwrap(), 72357);
    /// assert_eq!(StationInfo::new().with_station(Some(72357)).station_num().unwrap(), 72357);
    ///
    /// ```
    #[inline]
    pub fn with_station<T>(mut self, number: T) -> Self
    where
        Optioned<i32>: From<T>,
    {
        self.num = Optioned::from(number);
        self
    }

    /// Builder method to add a station identifier.
    #[inline]
    pub fn with_station_id<T>(mut self, id: T) -> Self
    where
        Option<String>: From<T>,
    {
        self.id = Option::from(id);
        self
    }

    /// Builder method to add a location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::StationInfo;
    ///
    /// assert_eq!(
    ///     StationInfo::new().with_lat_lon((35.18, -97.44)).location().unwrap(), (35.18, -97.44));
    /// ```
    #[inline]
    pub fn with_lat_lon<T>(mut self, coords: T) -> Self
    where
        Option<(f64, f64)>: From<T>,
    {
        self.location = Option::from(coords);
        self
    }

    /// Builder method to add elevation.
    ///
    /// # Examples
    ///```rust
    /// use metfor::{Meters, Feet};
    /// use wx_viewer::StationInfo;
    /// use optional::{some, none};
    ///
    /// let _info = StationInfo::new().with_elevation(Feet(1180.0));
    /// let _info = StationInfo::new().with_elevation(some(Meters(357.0)));
    /// let info = StationInfo::new().with_elevation(none::<Meters>());
    /// assert!(info.elevation().is_none());
    ///```
    #[inline]
    pub fn with_elevation<T, U>(mut self, elev: T) -> Self
    where
        Optioned<U>: From<T>,
        U: optional::Noned + metfor::Length,
        Meters: From<U>,
    {
        let elevation: Optioned<U> = Optioned::from(elev);
        self.elevation = elevation.map_t(Meters::from);
        self
    }

    /// WMO station number, eg 72357
    #[inline]
    pub fn station_num(&self) -> Optioned<i32> {
        self.num
    }

    /// Station identifier, eg OUN
    #[inline]
    pub fn station_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Latitude and longitude.
    #[inline]
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }

    /// Elevation in meters.
    #[inline]
    pub fn elevation(&self) -> Optioned<Meters> {
        self.elevation
    }
}
