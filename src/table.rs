//! Station tables: one column per station keyed by longitude, one row per height above bottom.
//!
//! Tables are assembled through a [`StationTableBuilder`], an explicit longitude to column map
//! that is sorted once when the table is built. Every table operation that combines two tables
//! checks first that they share rows and columns.
use crate::{
    error::{AnalysisError, Result},
    utility::{nan_mean, nan_std},
};
use itertools::izip;
use optional::{some, Optioned};
use std::cmp::Ordering;

/// A table of values indexed by meters above bottom (rows) and longitude (columns).
///
/// Columns are stored contiguously and are always sorted by ascending longitude.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTable {
    mab: Vec<f64>,
    longitudes: Vec<f64>,
    columns: Vec<Vec<Optioned<f64>>>,
}

/// Collects station columns before they are sorted into a `StationTable`.
#[derive(Debug, Clone)]
pub struct StationTableBuilder {
    mab: Vec<f64>,
    columns: Vec<(f64, Vec<Optioned<f64>>)>,
}

impl StationTableBuilder {
    /// Start a table whose rows are the given heights above bottom.
    pub fn new(mab: Vec<f64>) -> Self {
        StationTableBuilder {
            mab,
            columns: vec![],
        }
    }

    /// Add a station column.
    ///
    /// A station at exactly the same longitude as one already present replaces it.
    pub fn insert(&mut self, longitude: f64, column: Vec<Optioned<f64>>) -> Result<()> {
        if column.len() != self.mab.len() {
            return Err(AnalysisError::MisalignedTables(format!(
                "column at {} has {} rows, table has {}",
                longitude,
                column.len(),
                self.mab.len()
            )));
        }

        match self.columns.iter_mut().find(|(lon, _)| *lon == longitude) {
            Some(existing) => existing.1 = column,
            None => self.columns.push((longitude, column)),
        }

        Ok(())
    }

    /// Sort the columns by longitude and finish the table.
    pub fn build(mut self) -> StationTable {
        self.columns
            .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        let (longitudes, columns) = self.columns.into_iter().unzip();

        StationTable {
            mab: self.mab,
            longitudes,
            columns,
        }
    }
}

impl StationTable {
    /// Build a table directly from columns. The columns are sorted by longitude, later duplicates
    /// of a longitude replace earlier ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use thorpe_transect::StationTable;
    /// use optional::{none, some};
    ///
    /// let table = StationTable::from_columns(
    ///     vec![0.0, 1.0],
    ///     vec![(-48.0, vec![some(1.0), none()]), (-52.0, vec![some(2.0), some(3.0)])],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(table.longitudes(), &[-52.0, -48.0]);
    /// assert_eq!(table.get(1, 0).unwrap(), 3.0);
    /// assert!(table.get(1, 1).is_none());
    /// ```
    pub fn from_columns<I>(mab: Vec<f64>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, Vec<Optioned<f64>>)>,
    {
        let mut builder = StationTableBuilder::new(mab);
        for (lon, col) in columns {
            builder.insert(lon, col)?;
        }
        Ok(builder.build())
    }

    /// Heights above bottom of the rows.
    #[inline]
    pub fn mab(&self) -> &[f64] {
        &self.mab
    }

    /// Longitudes of the columns, ascending.
    #[inline]
    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// All columns, in longitude order.
    #[inline]
    pub fn columns(&self) -> &[Vec<Optioned<f64>>] {
        &self.columns
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.mab.len()
    }

    /// Number of station columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.longitudes.len()
    }

    /// Value in a row and column, missing if out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Optioned<f64> {
        self.columns
            .get(col)
            .and_then(|c| c.get(row))
            .cloned()
            .unwrap_or_default()
    }

    /// Iterate over the values of one row, in longitude order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Optioned<f64>> + '_ {
        self.columns.iter().map(move |c| c[row])
    }

    /// Fail unless `other` has exactly the same rows and columns.
    pub fn ensure_aligned(&self, other: &StationTable) -> Result<()> {
        if self.mab != other.mab {
            return Err(AnalysisError::MisalignedTables(format!(
                "row index differs ({} rows vs {} rows)",
                self.n_rows(),
                other.n_rows()
            )));
        }
        if self.longitudes != other.longitudes {
            return Err(AnalysisError::MisalignedTables(format!(
                "longitude columns differ ({} columns vs {} columns)",
                self.n_cols(),
                other.n_cols()
            )));
        }
        Ok(())
    }

    /// Set cells missing where `mask` holds for the cell of `other` at the same position.
    ///
    /// The tables must be aligned.
    pub fn mask_where<F>(&mut self, other: &StationTable, mask: F) -> Result<()>
    where
        F: Fn(Optioned<f64>, Optioned<f64>) -> bool,
    {
        self.ensure_aligned(other)?;

        for (col, other_col) in izip!(&mut self.columns, &other.columns) {
            for (val, &other_val) in izip!(col.iter_mut(), other_col) {
                if mask(*val, other_val) {
                    *val = Optioned::default();
                }
            }
        }
        Ok(())
    }

    /// Keep cells where `keep` holds for the cell of `other` at the same position, every other
    /// cell becomes missing.
    pub fn keep_where<F>(&mut self, other: &StationTable, keep: F) -> Result<()>
    where
        F: Fn(Optioned<f64>) -> bool,
    {
        self.mask_where(other, |_, other_val| !keep(other_val))
    }

    /// True if every cell in the table is missing.
    pub fn all_missing(&self) -> bool {
        self.columns.iter().flatten().all(|v| v.is_none())
    }

    /// Set cells missing where `mask` holds for the value itself.
    pub fn mask_values<F>(&mut self, mask: F)
    where
        F: Fn(f64) -> bool,
    {
        for val in self.columns.iter_mut().flat_map(|c| c.iter_mut()) {
            if val.map_or(false, |v| mask(v)) {
                *val = Optioned::default();
            }
        }
    }

    /// Replace every missing cell with `value`.
    pub fn fill_missing(&mut self, value: f64) {
        for val in self.columns.iter_mut().flat_map(|c| c.iter_mut()) {
            if val.is_none() {
                *val = some(value);
            }
        }
    }

    /// Keep only the columns with a longitude in `[west, east]`.
    pub fn restrict_longitudes(&self, west: f64, east: f64) -> StationTable {
        let (longitudes, columns) = izip!(&self.longitudes, &self.columns)
            .filter(|(&lon, _)| lon >= west && lon <= east)
            .map(|(&lon, col)| (lon, col.clone()))
            .unzip();

        StationTable {
            mab: self.mab.clone(),
            longitudes,
            columns,
        }
    }

    /// Keep only the columns whose longitudes appear in `other`, so the result can be aligned
    /// with it.
    pub fn select_longitudes(&self, longitudes: &[f64]) -> Result<StationTable> {
        let mut columns = Vec::with_capacity(longitudes.len());
        for &lon in longitudes {
            let idx = self
                .longitudes
                .iter()
                .position(|&l| l == lon)
                .ok_or_else(|| {
                    AnalysisError::MisalignedTables(format!("no station at longitude {}", lon))
                })?;
            columns.push(self.columns[idx].clone());
        }

        Ok(StationTable {
            mab: self.mab.clone(),
            longitudes: longitudes.to_vec(),
            columns,
        })
    }

    /// Mean of each row over the stations, ignoring missing values.
    pub fn row_mean(&self) -> Vec<Optioned<f64>> {
        (0..self.n_rows()).map(|r| nan_mean(self.row(r))).collect()
    }

    /// Sample standard deviation of each row over the stations, ignoring missing values.
    pub fn row_std(&self) -> Vec<Optioned<f64>> {
        (0..self.n_rows()).map(|r| nan_std(self.row(r))).collect()
    }
}
