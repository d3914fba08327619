use itertools::izip;
use metfor::Quantity;
use optional::{Noned, Optioned};
use std::cmp::Ordering;

/// Nearest neighbor interpolation over an arbitrary, possibly unsorted, coordinate.
///
/// Samples with a missing coordinate are dropped. A missing value is returned for targets outside
/// the range of the valid coordinates, nothing is extrapolated. When a target lies exactly half
/// way between two samples the one with the smaller coordinate is used.
#[derive(Debug, Clone)]
pub struct NearestInterpolator<Y>
where
    Y: Noned + Copy,
{
    // Sorted coordinates and the values that go with them.
    xs: Vec<f64>,
    ys: Vec<Optioned<Y>>,
    // Half way points between consecutive coordinates.
    bounds: Vec<f64>,
}

impl<Y> NearestInterpolator<Y>
where
    Y: Noned + Copy,
{
    /// Build an interpolator from two parallel vectors of data.
    pub fn new<X>(xs: &[Optioned<X>], ys: &[Optioned<Y>]) -> Self
    where
        X: Quantity + Noned + Copy,
    {
        debug_assert_eq!(xs.len(), ys.len());

        let mut pairs: Vec<(f64, Optioned<Y>)> = izip!(xs, ys)
            .filter_map(|(x, y)| x.into_option().map(|x| (x.unpack(), *y)))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let (xs, ys): (Vec<f64>, Vec<Optioned<Y>>) = pairs.into_iter().unzip();
        let bounds = xs.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();

        NearestInterpolator { xs, ys, bounds }
    }

    /// Evaluate the interpolator at a target coordinate.
    pub fn eval<X>(&self, target_x: X) -> Optioned<Y>
    where
        X: Quantity,
    {
        let x = target_x.unpack();

        match (self.xs.first(), self.xs.last()) {
            (Some(&lo), Some(&hi)) if x >= lo && x <= hi => {
                // First half way point at or above the target.
                let idx = self.bounds.partition_point(|&b| b < x);
                self.ys[idx]
            }
            _ => Optioned::default(),
        }
    }

    /// The smallest and largest coordinate covered by the interpolator.
    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.xs.first(), self.xs.last()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        }
    }
}

/// Interpolate values given two parallel vectors of data and a target value using the nearest
/// sample.
///
/// Builds a throw away `NearestInterpolator`, prefer that type when evaluating many targets.
#[inline]
pub fn nearest_interpolate<X, Y>(xs: &[Optioned<X>], ys: &[Optioned<Y>], target_x: X) -> Optioned<Y>
where
    X: Quantity + Noned + Copy,
    Y: Noned + Copy,
{
    NearestInterpolator::new(xs, ys).eval(target_x)
}

#[inline]
pub(crate) fn linear_interp(x_val: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    debug_assert!((x1 - x2).abs() > std::f64::EPSILON);

    let run = x2 - x1;
    let rise = y2 - y1;
    let dx = x_val - x1;

    y1 + dx * (rise / run)
}
