//! Fill cells without an overturn with a background dissipation rate.
//!
//! A missing dissipation value is ambiguous: the water was either sampled and found quiet, or not
//! sampled at all. A companion table (temperature or neutral density) settles it, a cell gets the
//! background value only where the companion holds data.
use crate::{error::Result, table::StationTable};

/// Fill missing `values` with `floor` where `companion` has data.
///
/// Every cell where the companion is missing comes back missing, including cells that had a value
/// before. The tables must share rows and columns.
///
/// # Examples
///
/// ```rust
/// use thorpe_transect::{fill_background, StationTable};
/// use optional::{none, some};
///
/// let eps = StationTable::from_columns(
///     vec![0.0, 1.0, 2.0],
///     vec![(-50.0, vec![some(2.0e-8), none(), none()])],
/// )
/// .unwrap();
/// let temperature = StationTable::from_columns(
///     vec![0.0, 1.0, 2.0],
///     vec![(-50.0, vec![some(-0.5), some(-0.6), none()])],
/// )
/// .unwrap();
///
/// let filled = fill_background(&eps, &temperature, 1.0e-10).unwrap();
/// assert_eq!(filled.get(0, 0).unwrap(), 2.0e-8);
/// assert_eq!(filled.get(1, 0).unwrap(), 1.0e-10);
/// assert!(filled.get(2, 0).is_none());
/// ```
pub fn fill_background(
    values: &StationTable,
    companion: &StationTable,
    floor: f64,
) -> Result<StationTable> {
    values.ensure_aligned(companion)?;

    let mut filled = values.clone();
    filled.fill_missing(floor);
    filled.keep_where(companion, |c| c.is_some())?;

    Ok(filled)
}
