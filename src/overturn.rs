//! Thorpe-scale overturn detection.
//!
//! A cast is reordered into its gravitationally stable state. Each sample's vertical displacement
//! in that reordering is its Thorpe displacement; runs of samples whose displacements sum to zero
//! form overturns. Within an overturn the Thorpe length is the rms displacement and the
//! dissipation rate follows from the Ozmidov scaling
//!
//! ε = α² L<sub>T</sub>² N³
//!
//! with N the bulk buoyancy frequency of the sorted density across the overturn.
//!
//! Density inversions smaller than the instrument noise are removed beforehand with the
//! intermediate profile method of Ferron et al. (1998), and overturns whose sorted density range
//! does not exceed the noise level are rejected.
use crate::{
    cast::Cast,
    config::OverturnConfig,
    error::{AnalysisError, Result},
    seawater,
};
use itertools::izip;
use metfor::Quantity;
use optional::Optioned;
use tracing::debug;

/// Tuning of the overturn detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverturnParams {
    /// Density noise threshold in kg m⁻³.
    pub density_noise: f64,
    /// Coefficient relating the Thorpe and Ozmidov scales.
    pub alpha: f64,
    /// Dissipation assigned outside of overturns, missing by default.
    pub background: Optioned<f64>,
}

impl Default for OverturnParams {
    fn default() -> Self {
        OverturnParams::from(&OverturnConfig::default())
    }
}

impl From<&OverturnConfig> for OverturnParams {
    fn from(cfg: &OverturnConfig) -> Self {
        OverturnParams {
            density_noise: cfg.density_noise,
            alpha: cfg.alpha,
            background: Optioned::default(),
        }
    }
}

/// A contiguous run of samples forming one overturn, indexes into the valid samples of a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overturn {
    /// First sample of the overturn.
    pub top: usize,
    /// Last sample of the overturn, inclusive.
    pub bottom: usize,
}

/// Derived fields of a cast, aligned with the cast's rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    thorpe_displacement: Vec<Optioned<f64>>,
    thorpe_length: Vec<Optioned<f64>>,
    n_squared: Vec<Optioned<f64>>,
    dissipation: Vec<Optioned<f64>>,
    potential_density: Vec<Optioned<f64>>,
    overturns: Vec<Overturn>,
}

impl Diagnostics {
    /// Thorpe displacement (m) of each sample, positive when the sample belongs deeper.
    pub fn thorpe_displacement(&self) -> &[Optioned<f64>] {
        &self.thorpe_displacement
    }

    /// Thorpe length (m), missing outside of overturns.
    pub fn thorpe_length(&self) -> &[Optioned<f64>] {
        &self.thorpe_length
    }

    /// Squared buoyancy frequency (s⁻²).
    pub fn n_squared(&self) -> &[Optioned<f64>] {
        &self.n_squared
    }

    /// Dissipation rate (W/kg), the background value outside of overturns.
    pub fn dissipation(&self) -> &[Optioned<f64>] {
        &self.dissipation
    }

    /// Noise filtered potential density (kg m⁻³) referenced to the middle of the cast.
    pub fn potential_density(&self) -> &[Optioned<f64>] {
        &self.potential_density
    }

    /// The overturns found, as indexes into the valid rows of the cast.
    pub fn overturns(&self) -> &[Overturn] {
        &self.overturns
    }

    /// Buoyancy frequency N (s⁻¹), missing where N² is negative or missing.
    pub fn buoyancy_frequency(&self) -> Vec<Optioned<f64>> {
        self.n_squared
            .iter()
            .map(|n2| Optioned::from(n2.into_option().filter(|&v| v >= 0.0).map(f64::sqrt)))
            .collect()
    }
}

/// Estimate the dissipation rate of a cast from its density overturns.
///
/// Rows missing depth, temperature, or salinity are not used and get missing diagnostics.
pub fn eps_overturn(cast: &Cast, params: &OverturnParams) -> Result<Diagnostics> {
    cast.validate()?;
    let latitude = cast.mean_latitude().ok_or(AnalysisError::MissingProfile)?;

    let depth = cast.depth_profile();
    let temperature = cast.temperature_profile();
    let salinity = cast.salinity_profile();
    if temperature.is_empty() || salinity.is_empty() {
        return Err(AnalysisError::MissingProfile);
    }

    // Rows with everything needed, (row index, depth, temperature, salinity)
    let rows: Vec<(usize, f64, f64, f64)> = izip!(0usize.., depth, temperature, salinity)
        .filter_map(|(i, z, t, s)| {
            if z.is_some() && t.is_some() && s.is_some() {
                Some((i, z.unpack().unpack(), t.unpack().unpack(), s.unpack()))
            } else {
                None
            }
        })
        .collect();

    if rows.len() < 2 {
        return Err(AnalysisError::NotEnoughData);
    }

    let z: Vec<f64> = rows.iter().map(|r| r.1).collect();
    let p: Vec<f64> = z
        .iter()
        .map(|&z| seawater::pressure_from_depth(z, latitude))
        .collect();
    let p_ref = (p[0] + p[p.len() - 1]) / 2.0;

    let sigma: Vec<f64> = izip!(&rows, &p)
        .map(|(&(_, _, t, s), &p)| seawater::potential_density(s, t, p, p_ref))
        .collect();
    if let Some(i) = sigma.iter().position(|s| !s.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "{}: non-finite density at {} m",
            cast.id(),
            z[i]
        )));
    }
    let sigma = intermediate_profile(&sigma, params.density_noise);

    let order = stable_order(&sigma);
    let sigma_sorted: Vec<f64> = order.iter().map(|&i| sigma[i]).collect();

    // Thorpe displacement of sample i: where it belongs minus where it is.
    let mut displacement = vec![0.0; z.len()];
    for (new_pos, &old_pos) in order.iter().enumerate() {
        displacement[old_pos] = z[new_pos] - z[old_pos];
    }

    let g = seawater::gravity(latitude);
    let mut n_squared = background_n_squared(&z, &sigma_sorted, g);
    let mut thorpe_length = vec![Optioned::<f64>::default(); z.len()];
    let mut dissipation = vec![params.background; z.len()];

    let overturns: Vec<Overturn> = find_overturns(&order)
        .into_iter()
        .filter(|ot| sigma_sorted[ot.bottom] - sigma_sorted[ot.top] > params.density_noise)
        .collect();

    for ot in &overturns {
        let patch = ot.top..=ot.bottom;
        let count = (ot.bottom - ot.top + 1) as f64;

        let lt = (displacement[patch.clone()].iter().map(|d| d * d).sum::<f64>() / count).sqrt();
        let dz = z[ot.bottom] - z[ot.top];
        let n2 = g / seawater::RHO_0 * (sigma_sorted[ot.bottom] - sigma_sorted[ot.top]) / dz;
        let eps = patch_dissipation(params.alpha, lt, n2);

        for i in patch {
            thorpe_length[i] = finite(lt);
            n_squared[i] = finite(n2);
            dissipation[i] = eps;
        }
    }

    debug!(
        station = cast.id(),
        samples = z.len(),
        overturns = overturns.len(),
        "overturn detection"
    );

    // Scatter back onto the rows of the cast
    let n = cast.len();
    let scatter = |vals: &[Optioned<f64>]| -> Vec<Optioned<f64>> {
        let mut out = vec![Optioned::<f64>::default(); n];
        for (&(i, ..), &v) in izip!(&rows, vals) {
            out[i] = v;
        }
        out
    };
    let wrap = |vals: &[f64]| -> Vec<Optioned<f64>> {
        vals.iter().cloned().map(finite).collect()
    };

    Ok(Diagnostics {
        thorpe_displacement: scatter(&wrap(&displacement)),
        thorpe_length: scatter(&thorpe_length),
        n_squared: scatter(&n_squared),
        dissipation: scatter(&dissipation),
        potential_density: scatter(&wrap(&sigma)),
        overturns,
    })
}

/// ε = α² L<sub>T</sub>² N³ for one overturn. Missing unless N² is positive and the result is
/// finite.
fn patch_dissipation(alpha: f64, thorpe_length: f64, n_squared: f64) -> Optioned<f64> {
    if !(n_squared > 0.0) {
        return Optioned::default();
    }
    finite(alpha * alpha * thorpe_length * thorpe_length * n_squared.powf(1.5))
}

// Missing for NaN and infinities.
fn finite(val: f64) -> Optioned<f64> {
    Optioned::from(Some(val).filter(|v| v.is_finite()))
}

/// Remove density fluctuations smaller than `noise` by averaging the intermediate profiles built
/// from the top down and from the bottom up.
pub(crate) fn intermediate_profile(density: &[f64], noise: f64) -> Vec<f64> {
    if density.is_empty() || noise <= 0.0 {
        return density.to_vec();
    }

    let step = |acc: &mut f64, &val: &f64| -> Option<f64> {
        if (val - *acc).abs() >= noise {
            *acc += ((val - *acc) / noise).trunc() * noise;
        }
        Some(*acc)
    };

    let down: Vec<f64> = density.iter().scan(density[0], step).collect();
    let mut up: Vec<f64> = density
        .iter()
        .rev()
        .scan(density[density.len() - 1], step)
        .collect();
    up.reverse();

    izip!(down, up).map(|(d, u)| (d + u) / 2.0).collect()
}

/// Indexes that put the density in ascending order, ties keep their original order.
fn stable_order(density: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..density.len()).collect();
    order.sort_by(|&a, &b| {
        density[a]
            .partial_cmp(&density[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Overturns are the runs where the sorting permutation maps the run onto itself, i.e. the
/// cumulative Thorpe displacement (in index units) returns to zero.
fn find_overturns(order: &[usize]) -> Vec<Overturn> {
    let mut overturns = Vec::new();
    let mut top: Option<usize> = None;
    let mut cumulative: i64 = 0;

    for (i, &src) in order.iter().enumerate() {
        cumulative += src as i64 - i as i64;
        if src != i || cumulative != 0 {
            top.get_or_insert(i);
        }
        if cumulative == 0 {
            if let Some(t) = top.take() {
                if i > t {
                    overturns.push(Overturn { top: t, bottom: i });
                }
            }
        }
    }

    overturns
}

/// N² from the centred gradient of the sorted density profile.
fn background_n_squared(z: &[f64], sigma_sorted: &[f64], g: f64) -> Vec<Optioned<f64>> {
    let n = z.len();
    (0..n)
        .map(|i| {
            let (lo, hi) = match i {
                0 => (0, 1),
                i if i == n - 1 => (n - 2, n - 1),
                i => (i - 1, i + 1),
            };
            let dz = z[hi] - z[lo];
            if dz > 0.0 {
                finite(g / seawater::RHO_0 * (sigma_sorted[hi] - sigma_sorted[lo]) / dz)
            } else {
                Optioned::default()
            }
        })
        .collect()
}
