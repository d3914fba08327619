//! Resample casts onto a common meters-above-bottom axis.
//!
//! Every cast is referenced to its own deepest sample, which is taken to be the sea floor, so
//! casts of different depth line up row by row near the bottom.
use crate::{
    cast::Cast,
    error::{AnalysisError, Result},
    interpolation::NearestInterpolator,
    keys::Variable,
    overturn::Diagnostics,
};
use metfor::{Meters, Quantity};
use optional::Optioned;

/// Integer meters above bottom from 0 up to, but not including, the axis length.
#[derive(Debug, Clone, PartialEq)]
pub struct MabAxis {
    values: Vec<Meters>,
}

impl MabAxis {
    /// Create an axis with `length` rows spaced 1 m apart starting at the bottom.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::MabAxis;
    /// use metfor::Meters;
    ///
    /// let axis = MabAxis::new(5000);
    /// assert_eq!(axis.len(), 5000);
    /// assert_eq!(axis.values()[0], Meters(0.0));
    /// assert_eq!(axis.values()[4999], Meters(4999.0));
    /// ```
    pub fn new(length: usize) -> Self {
        MabAxis {
            values: (0..length).map(|i| Meters(i as f64)).collect(),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for an axis without rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Heights above bottom of each row.
    #[inline]
    pub fn values(&self) -> &[Meters] {
        &self.values
    }
}

/// One station's diagnostics on the meters-above-bottom axis.
#[derive(Debug, Clone)]
pub struct NormalizedCast {
    /// Event label of the cast.
    pub id: String,
    /// Mean longitude of the cast, the station's column key.
    pub longitude: f64,
    /// Thorpe length (m).
    pub thorpe_length: Vec<Optioned<f64>>,
    /// Buoyancy frequency (1/s).
    pub buoyancy_frequency: Vec<Optioned<f64>>,
    /// Dissipation rate (W/kg).
    pub dissipation: Vec<Optioned<f64>>,
    /// In-situ temperature (°C).
    pub temperature: Vec<Optioned<f64>>,
    /// Neutral density (kg m⁻³).
    pub neutral_density: Vec<Optioned<f64>>,
}

impl NormalizedCast {
    /// Get the column for a variable.
    pub fn column(&self, var: Variable) -> &[Optioned<f64>] {
        match var {
            Variable::Dissipation => &self.dissipation,
            Variable::BuoyancyFrequency => &self.buoyancy_frequency,
            Variable::ThorpeLength => &self.thorpe_length,
            Variable::Temperature => &self.temperature,
            Variable::NeutralDensity => &self.neutral_density,
        }
    }
}

/// Height above the deepest sample of every row of the cast.
pub fn meters_above_bottom(cast: &Cast) -> Result<Vec<Optioned<Meters>>> {
    let bottom = cast
        .max_depth()
        .into_option()
        .ok_or(AnalysisError::NoDataProfile)?;

    Ok(cast
        .depth_profile()
        .iter()
        .map(|d| d.map_t(|d| Meters(bottom.unpack() - d.unpack())))
        .collect())
}

/// Resample a cast and its diagnostics onto `axis` by nearest neighbor interpolation.
///
/// Rows of the axis outside the height range of the cast are missing.
pub fn normalize_cast(
    cast: &Cast,
    diagnostics: &Diagnostics,
    axis: &MabAxis,
) -> Result<NormalizedCast> {
    let longitude = cast
        .mean_longitude()
        .ok_or_else(|| AnalysisError::InvalidInput(format!("{}: missing longitude", cast.id())))?;
    let mab = meters_above_bottom(cast)?;

    let resample = |values: &[Optioned<f64>]| -> Vec<Optioned<f64>> {
        if values.is_empty() {
            return vec![Optioned::default(); axis.len()];
        }
        let interp = NearestInterpolator::new(&mab, values);
        axis.values().iter().map(|&h| interp.eval(h)).collect()
    };

    let temperature: Vec<Optioned<f64>> = cast
        .temperature_profile()
        .iter()
        .map(|t| t.map_t(|t| t.unpack()))
        .collect();

    Ok(NormalizedCast {
        id: cast.id().to_owned(),
        longitude,
        thorpe_length: resample(diagnostics.thorpe_length()),
        buoyancy_frequency: resample(&diagnostics.buoyancy_frequency()),
        dissipation: resample(diagnostics.dissipation()),
        temperature: resample(&temperature),
        neutral_density: resample(cast.neutral_density_profile()),
    })
}

/// True if every value in the column is missing.
pub(crate) fn all_missing(values: &[Optioned<f64>]) -> bool {
    values.iter().all(|v| v.is_none())
}
