//! Small numeric helpers shared by the table and binning code.
use optional::Optioned;

/// Arithmetic mean of the non-missing values, missing if there are none.
pub(crate) fn nan_mean<I>(values: I) -> Optioned<f64>
where
    I: IntoIterator<Item = Optioned<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .filter_map(|v| v.into_option())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        Optioned::default()
    } else {
        optional::some(sum / count as f64)
    }
}

/// Sample standard deviation (one degree of freedom removed) of the non-missing values. Missing
/// if fewer than two values are present.
pub(crate) fn nan_std<I>(values: I) -> Optioned<f64>
where
    I: IntoIterator<Item = Optioned<f64>>,
{
    let vals: Vec<f64> = values.into_iter().filter_map(|v| v.into_option()).collect();
    if vals.len() < 2 {
        return Optioned::default();
    }

    let n = vals.len() as f64;
    let mean = vals.iter().sum::<f64>() / n;
    let sum_sq = vals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();

    optional::some((sum_sq / (n - 1.0)).sqrt())
}

#[cfg(test)]
pub mod test_tools {
    pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
        assert!(eps > 0.0);

        (val1 - val2).abs() < eps
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;
    use optional::{none, some};

    #[test]
    fn test_nan_mean() {
        assert_eq!(nan_mean(vec![some(1.0), none(), some(3.0)]).unwrap(), 2.0);
        assert!(nan_mean(vec![none(), none()]).is_none());
        assert!(nan_mean(Vec::new()).is_none());
    }

    #[test]
    fn test_nan_std() {
        let std = nan_std(vec![
            some(2.0),
            some(4.0),
            none(),
            some(4.0),
            some(4.0),
            some(5.0),
            some(5.0),
            some(7.0),
            some(9.0),
        ]);
        assert!(approx_equal(std.unwrap(), 2.138089935299395, 1.0e-12));
        assert!(nan_std(vec![some(1.0), none()]).is_none());
    }
}
