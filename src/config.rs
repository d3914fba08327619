//! Tunable parameters of the transect analysis.
//!
//! Every value has a default matching the published analysis, so an empty (or absent)
//! configuration file reproduces it exactly. A TOML file only needs the keys it changes:
//!
//! ```toml
//! background_dissipation = 1e-10
//!
//! [overturn]
//! density_noise = 5e-4
//!
//! [quality]
//! outliers = ["PS71/216-1"]
//! ```
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Parameters handed to the overturn detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverturnConfig {
    /// Density noise threshold in kg m⁻³. Overturns with a smaller density range are
    /// treated as instrument noise.
    #[serde(default = "OverturnConfig::default_density_noise")]
    pub density_noise: f64,
    /// Coefficient relating the Thorpe and Ozmidov scales.
    #[serde(default = "OverturnConfig::default_alpha")]
    pub alpha: f64,
}

impl OverturnConfig {
    fn default_density_noise() -> f64 {
        5e-4
    }
    fn default_alpha() -> f64 {
        0.8
    }
}

impl Default for OverturnConfig {
    fn default() -> Self {
        Self {
            density_noise: Self::default_density_noise(),
            alpha: Self::default_alpha(),
        }
    }
}

/// Station screening and cleaning thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Casts shallower than this (m) are rejected.
    #[serde(default = "QualityConfig::default_min_max_depth")]
    pub min_max_depth: f64,
    /// Casts warmer than this (°C) at their deepest sample are rejected.
    #[serde(default = "QualityConfig::default_max_bottom_temperature")]
    pub max_bottom_temperature: f64,
    /// Thorpe lengths above this (m) are discarded as spurious.
    #[serde(default = "QualityConfig::default_max_thorpe_length")]
    pub max_thorpe_length: f64,
    /// Stations that are always skipped.
    #[serde(default = "QualityConfig::default_outliers")]
    pub outliers: Vec<String>,
}

impl QualityConfig {
    fn default_min_max_depth() -> f64 {
        200.0
    }
    fn default_max_bottom_temperature() -> f64 {
        0.2
    }
    fn default_max_thorpe_length() -> f64 {
        200.0
    }
    fn default_outliers() -> Vec<String> {
        [
            "PS71/216-1",
            "PS40/099-1",
            "PS49/015-2",
            "PS71/212-3",
            "PS71/210-2",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Is this station on the exclude list?
    pub fn is_outlier(&self, station: &str) -> bool {
        self.outliers.iter().any(|s| s == station)
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_max_depth: Self::default_min_max_depth(),
            max_bottom_temperature: Self::default_max_bottom_temperature(),
            max_thorpe_length: Self::default_max_thorpe_length(),
            outliers: Self::default_outliers(),
        }
    }
}

/// Fixed longitude bins used for the dissipation transect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinConfig {
    /// Western edge of the first bin in degrees east.
    #[serde(default = "BinConfig::default_start")]
    pub start: f64,
    /// Edges are generated up to, but not including, this longitude.
    #[serde(default = "BinConfig::default_stop")]
    pub stop: f64,
    /// Bin width in degrees.
    #[serde(default = "BinConfig::default_width")]
    pub width: f64,
    /// Use this many bins spanning the stations instead of the fixed bins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spanning: Option<usize>,
}

impl BinConfig {
    fn default_start() -> f64 {
        -53.75
    }
    fn default_stop() -> f64 {
        -46.25
    }
    fn default_width() -> f64 {
        0.5
    }
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            start: Self::default_start(),
            stop: Self::default_stop(),
            width: Self::default_width(),
            spanning: None,
        }
    }
}

/// Display settings of the transect figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Highest meters-above-bottom row drawn.
    #[serde(default = "FigureConfig::default_max_mab")]
    pub max_mab: f64,
    /// Lower end of the logarithmic colour scale (W/kg).
    #[serde(default = "FigureConfig::default_vmin")]
    pub vmin: f64,
    /// Upper end of the logarithmic colour scale (W/kg).
    #[serde(default = "FigureConfig::default_vmax")]
    pub vmax: f64,
    /// Neutral density surfaces drawn as water mass boundaries (kg m⁻³).
    #[serde(default = "FigureConfig::default_water_mass_boundaries")]
    pub water_mass_boundaries: Vec<f64>,
    /// Size of the rendered figure in pixels.
    #[serde(default = "FigureConfig::default_size")]
    pub size: (u32, u32),
}

impl FigureConfig {
    fn default_max_mab() -> f64 {
        500.0
    }
    fn default_vmin() -> f64 {
        1e-10
    }
    fn default_vmax() -> f64 {
        1e-7
    }
    fn default_water_mass_boundaries() -> Vec<f64> {
        vec![28.26, 28.40]
    }
    fn default_size() -> (u32, u32) {
        (1134, 907)
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            max_mab: Self::default_max_mab(),
            vmin: Self::default_vmin(),
            vmax: Self::default_vmax(),
            water_mass_boundaries: Self::default_water_mass_boundaries(),
            size: Self::default_size(),
        }
    }
}

/// All tunable parameters of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransectConfig {
    /// Dissipation assumed where water was sampled but no overturn was found (W/kg).
    #[serde(default = "TransectConfig::default_background_dissipation")]
    pub background_dissipation: f64,
    /// Number of rows in the meters-above-bottom axis, at 1 m spacing from 0.
    #[serde(default = "TransectConfig::default_axis_length")]
    pub axis_length: usize,
    /// West and east limits of the stations averaged into the mean vertical profile.
    #[serde(default = "TransectConfig::default_core_longitudes")]
    pub core_longitudes: (f64, f64),
    /// Overturn detection.
    #[serde(default)]
    pub overturn: OverturnConfig,
    /// Station screening and cleaning.
    #[serde(default)]
    pub quality: QualityConfig,
    /// Longitude binning.
    #[serde(default)]
    pub bins: BinConfig,
    /// Figure settings.
    #[serde(default)]
    pub figure: FigureConfig,
}

impl TransectConfig {
    fn default_background_dissipation() -> f64 {
        1e-10
    }
    fn default_axis_length() -> usize {
        5000
    }
    fn default_core_longitudes() -> (f64, f64) {
        (-51.5, -48.5)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a configuration file. Missing keys take their default values.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| AnalysisError::io(path, err))?;
        Self::from_toml_str(&text).map_err(|source| AnalysisError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for TransectConfig {
    fn default() -> Self {
        Self {
            background_dissipation: Self::default_background_dissipation(),
            axis_length: Self::default_axis_length(),
            core_longitudes: Self::default_core_longitudes(),
            overturn: OverturnConfig::default(),
            quality: QualityConfig::default(),
            bins: BinConfig::default(),
            figure: FigureConfig::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = TransectConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, TransectConfig::default());
        assert_eq!(cfg.overturn.density_noise, 5e-4);
        assert_eq!(cfg.overturn.alpha, 0.8);
        assert_eq!(cfg.axis_length, 5000);
        assert_eq!(cfg.quality.outliers.len(), 5);
    }

    #[test]
    fn test_partial_override() {
        let text = r#"
            background_dissipation = 2e-10

            [quality]
            min_max_depth = 300.0
        "#;
        let cfg = TransectConfig::from_toml_str(text).unwrap();
        assert_eq!(cfg.background_dissipation, 2e-10);
        assert_eq!(cfg.quality.min_max_depth, 300.0);
        assert_eq!(cfg.quality.max_bottom_temperature, 0.2);
        assert!(cfg.quality.is_outlier("PS40/099-1"));
        assert_eq!(cfg.bins, BinConfig::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let text = toml::to_string_pretty(&TransectConfig::default()).unwrap();
        let parsed = TransectConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, TransectConfig::default());
    }
}
