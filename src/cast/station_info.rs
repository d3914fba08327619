/// Station information including location data and identification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationInfo {
    /// Event label of the cast, eg "PS71/216-1"
    id: String,
    /// Latitude and longitude.
    location: Option<(f64, f64)>,
}

impl StationInfo {
    /// Create a new `StationInfo` object.
    ///
    /// # Arguments
    /// id: The event label of the cast.
    ///
    /// location: The mean latitude and longitude of the cast as a tuple, or None.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::StationInfo;
    ///
    /// let stn = StationInfo::new_with_values("PS71/216-1", (-63.1, -50.2));
    /// assert_eq!(stn.longitude(), Some(-50.2));
    /// let stn = StationInfo::new_with_values("PS71/216-1", None);
    /// assert!(stn.location().is_none());
    /// ```
    #[inline]
    pub fn new_with_values<S, U>(id: S, location: U) -> Self
    where
        S: Into<String>,
        U: Into<Option<(f64, f64)>>,
    {
        StationInfo {
            id: id.into(),
            location: location.into(),
        }
    }

    /// Create a new object with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add the event label.
    #[inline]
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    /// Builder method to add a location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::StationInfo;
    ///
    /// assert_eq!(
    ///     StationInfo::new().with_lat_lon((-63.0, -50.0)).location().unwrap(), (-63.0, -50.0));
    /// ```
    #[inline]
    pub fn with_lat_lon<T>(mut self, coords: T) -> Self
    where
        Option<(f64, f64)>: From<T>,
    {
        self.location = Option::from(coords);
        self
    }

    /// Event label of the cast.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latitude and longitude.
    #[inline]
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }

    /// Latitude in degrees north.
    #[inline]
    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|(lat, _)| lat)
    }

    /// Longitude in degrees east.
    #[inline]
    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|(_, lon)| lon)
    }
}
