//! Station screening and post-assembly cleaning of the Thorpe scales.
use crate::{
    assemble::Transect,
    cast::Cast,
    config::QualityConfig,
    error::Result,
    keys::Variable,
    normalize::all_missing,
    overturn::{eps_overturn, Diagnostics, OverturnParams},
};
use metfor::Quantity;
use std::fmt;

/// Reasons a station is left out of the transect.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The station is on the exclude list.
    Outlier,
    /// The overturn detector could not process the cast.
    DetectionFailed(String),
    /// No dissipation (or buoyancy frequency) value survived detection.
    AllMissing,
    /// The deepest sample (m) is above the minimum depth.
    TooShallow(f64),
    /// The deepest sample is warmer (°C) than allowed.
    TooWarm(f64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Rejection::*;

        match self {
            Outlier => write!(f, "is a known outlier"),
            DetectionFailed(msg) => write!(f, "failed overturn detection: {}", msg),
            AllMissing => write!(f, "only produces missing values"),
            TooShallow(depth) => write!(f, "is only {}m and is too shallow", depth),
            TooWarm(temp) => write!(f, "shows {:.2} °C at the bottom, which is too high", temp),
        }
    }
}

/// Run the overturn detector on a cast and decide if the station is kept.
///
/// The exclude list is checked before anything else, so listed stations never reach the
/// detector. The remaining checks run in order: detection, all missing, too shallow, too warm.
pub fn screen_cast(
    cast: &Cast,
    params: &OverturnParams,
    cfg: &QualityConfig,
) -> std::result::Result<Diagnostics, Rejection> {
    if cfg.is_outlier(cast.id()) {
        return Err(Rejection::Outlier);
    }

    let diagnostics =
        eps_overturn(cast, params).map_err(|err| Rejection::DetectionFailed(err.to_string()))?;

    if all_missing(diagnostics.dissipation()) || all_missing(&diagnostics.buoyancy_frequency()) {
        return Err(Rejection::AllMissing);
    }

    if let Some(max_depth) = cast.max_depth().into_option() {
        if max_depth.unpack() < cfg.min_max_depth {
            return Err(Rejection::TooShallow(max_depth.unpack()));
        }
    }

    if let Some(bottom_temperature) = cast.bottom_temperature().into_option() {
        if bottom_temperature.unpack() > cfg.max_bottom_temperature {
            return Err(Rejection::TooWarm(bottom_temperature.unpack()));
        }
    }

    Ok(diagnostics)
}

/// Make the Thorpe length and dissipation tables consistent with each other.
///
/// Thorpe lengths without a dissipation value are removed, then Thorpe lengths above
/// `max_thorpe_length`, and finally dissipation values whose Thorpe length is gone. Afterwards a
/// missing Thorpe length always means a missing dissipation value.
pub fn clean_thorpe_scales(transect: &mut Transect, max_thorpe_length: f64) -> Result<()> {
    let eps = transect.table(Variable::Dissipation).clone();

    let lt = transect.table_mut(Variable::ThorpeLength);
    lt.keep_where(&eps, |e| e.is_some())?;
    lt.mask_values(|v| v >= max_thorpe_length);
    let lt = lt.clone();

    transect
        .table_mut(Variable::Dissipation)
        .keep_where(&lt, |l| l.is_some())
}
