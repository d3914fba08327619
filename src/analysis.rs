//! The horizontally averaged dissipation profile of the gravity current core.
use crate::{background::fill_background, error::Result, table::StationTable};
use optional::Optioned;

/// Row-wise statistics of the dissipation in the core of the transect.
#[derive(Debug, Clone)]
pub struct MeanProfile {
    /// Meters above bottom of each row.
    pub mab: Vec<f64>,
    /// Mean dissipation rate (W/kg).
    pub mean: Vec<Optioned<f64>>,
    /// Sample standard deviation of the dissipation rate (W/kg).
    pub std: Vec<Optioned<f64>>,
    /// Longitudes of the stations that were averaged.
    pub longitudes: Vec<f64>,
}

/// Average the dissipation of the stations between `west` and `east` (inclusive).
///
/// Missing values are replaced by `background` where the same cell has a temperature, so quiet
/// but sampled water counts toward the mean and unsampled water does not.
pub fn core_mean_profile(
    dissipation: &StationTable,
    temperature: &StationTable,
    (west, east): (f64, f64),
    background: f64,
) -> Result<MeanProfile> {
    dissipation.ensure_aligned(temperature)?;

    let core = dissipation.restrict_longitudes(west, east);
    let core_temperature = temperature.select_longitudes(core.longitudes())?;
    let core = fill_background(&core, &core_temperature, background)?;

    Ok(MeanProfile {
        mab: core.mab().to_vec(),
        mean: core.row_mean(),
        std: core.row_std(),
        longitudes: core.longitudes().to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use optional::{none, some};

    #[test]
    fn test_core_mean_profile() {
        let mab = vec![0.0, 1.0, 2.0];
        let eps = StationTable::from_columns(
            mab.clone(),
            vec![
                (-52.0, vec![some(1.0), some(1.0), some(1.0)]),
                (-51.0, vec![some(3.0e-9), none(), none()]),
                (-49.0, vec![some(1.0e-9), none(), some(5.0e-9)]),
            ],
        )
        .unwrap();
        let temperature = StationTable::from_columns(
            mab,
            vec![
                (-52.0, vec![some(-0.5); 3]),
                (-51.0, vec![some(-0.5), some(-0.5), none()]),
                (-49.0, vec![some(-0.5), none(), some(-0.5)]),
            ],
        )
        .unwrap();

        let profile = core_mean_profile(&eps, &temperature, (-51.5, -48.5), 1.0e-10).unwrap();
        assert_eq!(profile.longitudes, vec![-51.0, -49.0]);
        assert!((profile.mean[0].unwrap() - 2.0e-9).abs() < 1.0e-20);
        // Only the filled background at -51.0 counts in the second row
        assert!((profile.mean[1].unwrap() - 1.0e-10).abs() < 1.0e-22);
        assert!(profile.std[1].is_none());
        assert!((profile.mean[2].unwrap() - 5.0e-9).abs() < 1.0e-20);
        assert!((profile.std[0].unwrap() - 2.0_f64.sqrt() * 1.0e-9).abs() < 1.0e-20);
    }
}
