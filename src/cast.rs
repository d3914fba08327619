//! Data type and methods to store a single CTD cast.

use crate::error::{AnalysisError, Result};
use itertools::Itertools;
use metfor::{Celsius, Meters, Quantity};
use optional::Optioned;

pub use self::station_info::StationInfo;

mod station_info;

/// All the variables recorded during one CTD cast.
///
/// The profile variables are stored in parallel vectors ordered from the surface downward. If a
/// cast lacks a certain variable, e.g. neutral density, that whole vector has length 0 instead of
/// being full of missing values.
#[derive(Clone, Debug, Default)]
pub struct Cast {
    // Station info, the location is the mean position during the cast
    station: StationInfo,

    // Profiles
    depth: Vec<Optioned<Meters>>,
    temperature: Vec<Optioned<Celsius>>,
    salinity: Vec<Optioned<f64>>,
    neutral_density: Vec<Optioned<f64>>,
}

macro_rules! make_profile_setter_getter {
    ($(#[$set_attr:meta])* => $set_name:ident, $(#[$get_attr:meta])* => $get_name:ident,
     $inner_type:ty, $p_var:ident) => {
        $(#[$set_attr])*
        #[inline]
        pub fn $set_name(self, profile: Vec<Optioned<$inner_type>>) -> Self {
            Self {
                $p_var: profile,
                ..self
            }
        }

        $(#[$get_attr])*
        #[inline]
        pub fn $get_name(&self) -> &[Optioned<$inner_type>] {
            &self.$p_var
        }
    };
}

impl Cast {
    /// Create a new cast with default values. This is a proxy for default with a clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::Cast;
    ///
    /// let cast = Cast::new();
    /// assert!(cast.depth_profile().is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Cast::default()
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

    make_profile_setter_getter!(
        /// Builder method for the depth profile, positive downward.
        ///
        /// # Examples
        /// ```rust
        /// use thorpe_transect::Cast;
        /// use metfor::Meters;
        /// use optional::{some, Optioned};
        ///
        /// let data = vec![10.0, 20.0, 30.0];
        /// let depth: Vec<Optioned<Meters>> = data.into_iter().map(Meters).map(some).collect();
        ///
        /// let cast = Cast::new().with_depth_profile(depth);
        /// assert_eq!(cast.depth_profile().len(), 3);
        /// ```
        => with_depth_profile,
        /// Get the depth profile.
        => depth_profile,
        Meters, depth
    );

    make_profile_setter_getter!(
        /// Builder method for the in-situ temperature profile.
        => with_temperature_profile,
        /// Get the in-situ temperature profile.
        => temperature_profile,
        Celsius, temperature
    );

    make_profile_setter_getter!(
        /// Builder method for the practical salinity profile.
        => with_salinity_profile,
        /// Get the practical salinity profile.
        => salinity_profile,
        f64, salinity
    );

    make_profile_setter_getter!(
        /// Builder method for the neutral density profile in kg m⁻³.
        => with_neutral_density_profile,
        /// Get the neutral density profile.
        => neutral_density_profile,
        f64, neutral_density
    );

    /// Event label of the cast.
    #[inline]
    pub fn id(&self) -> &str {
        self.station.id()
    }

    /// The deepest valid depth recorded during the cast.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::Cast;
    /// use metfor::Meters;
    /// use optional::{none, some};
    ///
    /// let cast = Cast::new().with_depth_profile(vec![
    ///     some(Meters(5.0)),
    ///     some(Meters(250.0)),
    ///     none(),
    /// ]);
    /// assert_eq!(cast.max_depth().unwrap(), Meters(250.0));
    /// ```
    pub fn max_depth(&self) -> Optioned<Meters> {
        self.depth
            .iter()
            .filter_map(|d| d.into_option())
            .fold(None, |max: Option<Meters>, d| match max {
                Some(m) if m >= d => Some(m),
                _ => Some(d),
            })
            .into()
    }

    /// Temperature of the last (deepest) row of the cast, which may be missing.
    #[inline]
    pub fn bottom_temperature(&self) -> Optioned<Celsius> {
        self.temperature.last().cloned().unwrap_or_default()
    }

    /// Mean longitude of the cast.
    #[inline]
    pub fn mean_longitude(&self) -> Option<f64> {
        self.station.longitude()
    }

    /// Mean latitude of the cast.
    #[inline]
    pub fn mean_latitude(&self) -> Option<f64> {
        self.station.latitude()
    }

    /// Number of rows in the cast.
    #[inline]
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    /// True if the cast holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Check the cast is usable: all supplied profiles are as long as the depth profile, the
    /// position is known, and valid depths are strictly increasing.
    pub fn validate(&self) -> Result<()> {
        if self.depth.is_empty() {
            return Err(AnalysisError::MissingProfile);
        }

        let n = self.depth.len();
        let lengths = [
            self.temperature.len(),
            self.salinity.len(),
            self.neutral_density.len(),
        ];
        if lengths.iter().any(|&len| len != 0 && len != n) {
            return Err(AnalysisError::InvalidInput(format!(
                "{}: profile lengths differ from depth profile length {}",
                self.id(),
                n
            )));
        }

        if self.station.location().is_none() {
            return Err(AnalysisError::InvalidInput(format!(
                "{}: missing cast position",
                self.id()
            )));
        }

        let increasing = self
            .depth
            .iter()
            .filter_map(|d| d.into_option())
            .tuple_windows::<(_, _)>()
            .all(|(d0, d1)| d1.unpack() > d0.unpack());
        if !increasing {
            return Err(AnalysisError::InvalidInput(format!(
                "{}: depth is not strictly increasing",
                self.id()
            )));
        }

        Ok(())
    }
}
