//! Enums used as keys for selecting tables and naming output files.
use strum_macros::{Display, EnumIter};

/// The quantities carried through the transect analysis, one station table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Variable {
    /// Turbulent kinetic energy dissipation rate (W/kg)
    #[strum(serialize = "eps")]
    Dissipation,
    /// Buoyancy frequency N (1/s)
    #[strum(serialize = "N")]
    BuoyancyFrequency,
    /// Thorpe length (m)
    #[strum(serialize = "Lt")]
    ThorpeLength,
    /// In-situ temperature (°C)
    #[strum(serialize = "T")]
    Temperature,
    /// Neutral density (kg m⁻³)
    #[strum(serialize = "neutral_density")]
    NeutralDensity,
}

impl Variable {
    /// File name of the station table holding this variable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::Variable;
    ///
    /// assert_eq!(Variable::Dissipation.table_file_name(), "Thorpe_eps_df_with_mab.csv");
    /// ```
    pub fn table_file_name(self) -> String {
        format!("Thorpe_{}_df_with_mab.csv", self)
    }
}
