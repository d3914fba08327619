//! Independent point estimates of dissipation drawn on top of the transect.
use crate::error::{AnalysisError, Result};
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

/// A single dissipation estimate at a position in the transect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointEstimate {
    /// Longitude in degrees east.
    pub longitude: f64,
    /// Height above bottom (m).
    pub mab: f64,
    /// Dissipation rate (W/kg).
    pub value: f64,
}

const LONGITUDE: &[&str] = &["lon"];
const MAB: &[&str] = &["rounded mab", "mab"];
const VALUE: &[&str] = &["eps_IGW", "value"];

/// Load point estimates from a CSV file.
pub fn read_point_estimates<P: AsRef<Path>>(path: P) -> Result<Vec<PointEstimate>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| AnalysisError::io(path, err))?;
    points_from_reader(file, path)
}

/// Read point estimates from any source of CSV text.
///
/// The longitude comes from the `lon` column, the height from `rounded mab` (or `mab`) and the
/// value from `eps_IGW` (or `value`). Other columns are ignored, as are rows with an empty cell in
/// one of the used columns.
pub fn points_from_reader<R: Read>(source: R, origin: &Path) -> Result<Vec<PointEstimate>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|err| AnalysisError::csv(origin, err))?
        .clone();
    let column = |names: &[&str]| -> Result<usize> {
        names
            .iter()
            .find_map(|name| headers.iter().position(|h| h == *name))
            .ok_or_else(|| {
                AnalysisError::InvalidInput(format!(
                    "{}: none of the columns {:?}",
                    origin.display(),
                    names
                ))
            })
    };
    let (lon_col, mab_col, val_col) = (column(LONGITUDE)?, column(MAB)?, column(VALUE)?);

    let mut points = vec![];
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|err| AnalysisError::csv(origin, err))?;
        let cells = [
            record.get(lon_col).unwrap_or_default(),
            record.get(mab_col).unwrap_or_default(),
            record.get(val_col).unwrap_or_default(),
        ];
        if cells.iter().any(|c| c.is_empty()) {
            debug!(line, "skipping incomplete point estimate");
            continue;
        }

        let mut vals = [0.0; 3];
        for (val, cell) in vals.iter_mut().zip(cells.iter()) {
            *val = cell.parse().map_err(|_| {
                AnalysisError::InvalidInput(format!(
                    "{}: cannot read '{}' in record {}",
                    origin.display(),
                    cell,
                    line + 1
                ))
            })?;
        }

        points.push(PointEstimate {
            longitude: vals[0],
            mab: vals[1],
            value: vals[2],
        });
    }

    Ok(points)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_idemix_columns() {
        let text = "\
,lon,mab,rounded mab,eps_IGW
0,-51.2,47.3,50,3.1e-9
1,-49.0,103.9,100,
2,-48.5,20.2,20,8e-10
";
        let points = points_from_reader(text.as_bytes(), Path::new("mem")).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(
            points[0],
            PointEstimate {
                longitude: -51.2,
                mab: 50.0,
                value: 3.1e-9
            }
        );
        assert_eq!(points[1].value, 8e-10);
    }

    #[test]
    fn test_generic_columns() {
        let text = "lon,mab,value\n-50,10,1e-9\n";
        let points = points_from_reader(text.as_bytes(), Path::new("mem")).unwrap();
        assert_eq!(points[0].mab, 10.0);
    }

    #[test]
    fn test_missing_columns() {
        let text = "longitude,mab,value\n-50,10,1e-9\n";
        assert!(points_from_reader(text.as_bytes(), Path::new("mem")).is_err());
    }
}
