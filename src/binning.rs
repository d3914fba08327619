//! Average station columns into longitude bins, row by row.
use crate::{
    config::BinConfig,
    error::{AnalysisError, Result},
    table::StationTable,
    utility::nan_mean,
};
use itertools::Itertools;
use optional::Optioned;

/// A table with one column per longitude bin, keyed by the bin's label longitude.
pub type BinnedTable = StationTable;

/// Contiguous longitude bins with a label for each bin.
///
/// A longitude belongs to bin `i` if it lies in `[edges[i], edges[i + 1])`. The last bin also
/// includes its right edge. Longitudes outside the edges belong to no bin.
#[derive(Debug, Clone, PartialEq)]
pub struct LongitudeBins {
    edges: Vec<f64>,
    labels: Vec<f64>,
}

impl LongitudeBins {
    /// Bins of equal `width` with edges from `start` up to, but not including, `stop`. Bins are
    /// labelled by their centre.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::LongitudeBins;
    ///
    /// let bins = LongitudeBins::fixed(-53.75, -46.25, 0.5).unwrap();
    /// assert_eq!(bins.edges().len(), 15);
    /// assert_eq!(bins.len(), 14);
    /// assert_eq!(bins.labels()[0], -53.5);
    /// assert_eq!(bins.labels()[13], -47.0);
    /// ```
    pub fn fixed(start: f64, stop: f64, width: f64) -> Result<Self> {
        if !(width > 0.0) || !(stop > start) {
            return Err(AnalysisError::InvalidInput(format!(
                "invalid bins from {} to {} with width {}",
                start, stop, width
            )));
        }

        let n_edges = ((stop - start) / width).ceil() as usize;
        let edges: Vec<f64> = (0..n_edges).map(|i| start + i as f64 * width).collect();
        let labels = edges
            .iter()
            .tuple_windows::<(_, _)>()
            .map(|(&left, _)| left + width / 2.0)
            .collect();

        Ok(LongitudeBins { edges, labels })
    }

    /// `n_bins` equal bins spanning the given longitudes, with the outer edges moved outward by a
    /// thousandth of their magnitude. Bins are labelled by their left edge.
    pub fn spanning(longitudes: &[f64], n_bins: usize) -> Result<Self> {
        let (min, max) = longitudes
            .iter()
            .cloned()
            .filter(|lon| !lon.is_nan())
            .minmax()
            .into_option()
            .ok_or_else(|| AnalysisError::InvalidInput("no longitudes to bin".to_owned()))?;
        if n_bins == 0 {
            return Err(AnalysisError::InvalidInput("zero bins requested".to_owned()));
        }

        let lo = min - 1.0e-3 * min.abs();
        let hi = max + 1.0e-3 * max.abs();
        let step = (hi - lo) / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins)
            .map(|i| if i == n_bins { hi } else { lo + i as f64 * step })
            .collect();
        let labels = edges[..n_bins].to_vec();

        Ok(LongitudeBins { edges, labels })
    }

    /// Bins chosen by the configuration, spanning `longitudes` if the configuration asks for it.
    pub fn from_config(cfg: &BinConfig, longitudes: &[f64]) -> Result<Self> {
        match cfg.spanning {
            Some(n_bins) => Self::spanning(longitudes, n_bins),
            None => Self::fixed(cfg.start, cfg.stop, cfg.width),
        }
    }

    /// Bin edges, ascending.
    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Column labels of the bins.
    #[inline]
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if there are no bins.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the bin holding `longitude`, if any.
    pub fn bin_of(&self, longitude: f64) -> Option<usize> {
        let (&first, &last) = (self.edges.first()?, self.edges.last()?);
        if self.is_empty() || !(longitude >= first && longitude <= last) {
            return None;
        }
        if longitude == last {
            return Some(self.len() - 1);
        }

        Some(self.edges.partition_point(|&e| e <= longitude) - 1)
    }
}

/// Average each row of `table` over the stations in each bin, ignoring missing values. A bin
/// without any value in a row is missing in that row.
pub fn bin_table(table: &StationTable, bins: &LongitudeBins) -> Result<BinnedTable> {
    let mut members: Vec<Vec<usize>> = vec![vec![]; bins.len()];
    for (col, &lon) in table.longitudes().iter().enumerate() {
        if let Some(bin) = bins.bin_of(lon) {
            members[bin].push(col);
        }
    }

    let columns = table.columns();
    let binned = bins.labels().iter().zip(&members).map(|(&label, cols)| {
        let values: Vec<Optioned<f64>> = (0..table.n_rows())
            .map(|row| nan_mean(cols.iter().map(|&c| columns[c][row])))
            .collect();
        (label, values)
    });

    StationTable::from_columns(table.mab().to_vec(), binned)
}
