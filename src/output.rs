//! Write and read the derived data files.
//!
//! Tables are CSV files with an unnamed index column of meters above bottom and one column per
//! station or bin, labelled by longitude. Missing values are empty cells.
use crate::{
    analysis::MeanProfile,
    assemble::Transect,
    binning::BinnedTable,
    error::{AnalysisError, Result},
    keys::Variable,
    table::StationTable,
};
use ndarray::Array1;
use ndarray_npy::NpzWriter;
use optional::{some, Optioned};
use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use strum::IntoEnumIterator;

/// File name of the horizontally averaged dissipation profile.
pub const MEAN_PROFILE_FILE: &str = "horizontally_averaged_Thorpe_eps.npz";
/// File name of the binned dissipation table.
pub const BINNED_DISSIPATION_FILE: &str = "binned_thorpe_dissipation.csv";
/// File name of the binned neutral density table.
pub const BINNED_NEUTRAL_DENSITY_FILE: &str = "binned_thorpe_neutral_density.csv";

/// Write a table as CSV to any sink. `target` only names the sink in error messages.
pub fn write_table<W: Write>(table: &StationTable, sink: W, target: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    let csv_err = |err| AnalysisError::csv(target, err);

    let mut header = vec![String::new()];
    header.extend(table.longitudes().iter().map(|lon| lon.to_string()));
    writer.write_record(&header).map_err(csv_err)?;

    for (row, &mab) in table.mab().iter().enumerate() {
        let mut record = Vec::with_capacity(table.n_cols() + 1);
        record.push(mab.to_string());
        record.extend(table.row(row).map(format_value));
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer
        .flush()
        .map_err(|err| AnalysisError::io(target, err))
}

/// Write a table as a CSV file at `path`, replacing any existing file.
pub fn write_table_csv<P: AsRef<Path>>(table: &StationTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| AnalysisError::io(path, err))?;
    write_table(table, io::BufWriter::new(file), path)
}

/// Read a table written by `write_table_csv`, e.g. a binned table for the figure.
pub fn read_binned_csv<P: AsRef<Path>>(path: P) -> Result<BinnedTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| AnalysisError::io(path, err))?;
    read_table(file, path)
}

/// Read a table from any source of CSV text. `origin` only names the source in error messages.
pub fn read_table<R: Read>(source: R, origin: &Path) -> Result<StationTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let csv_err = |err| AnalysisError::csv(origin, err);
    let bad_number = |what: &str, cell: &str| {
        AnalysisError::InvalidInput(format!(
            "{}: cannot read {} '{}'",
            origin.display(),
            what,
            cell
        ))
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    let longitudes = headers
        .iter()
        .skip(1)
        .map(|h| h.parse::<f64>().map_err(|_| bad_number("column label", h)))
        .collect::<Result<Vec<f64>>>()?;

    let mut mab = vec![];
    let mut columns: Vec<Vec<Optioned<f64>>> = vec![vec![]; longitudes.len()];
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let index = record.get(0).unwrap_or_default();
        mab.push(index.parse::<f64>().map_err(|_| bad_number("row index", index))?);

        for (col, cell) in columns.iter_mut().zip(record.iter().skip(1)) {
            let val = if cell.is_empty() {
                Optioned::default()
            } else {
                some(cell.parse::<f64>().map_err(|_| bad_number("value", cell))?)
            };
            col.push(val);
        }
    }

    StationTable::from_columns(mab, longitudes.into_iter().zip(columns))
}

/// Write the station tables of every variable into `dir`, returning the paths written.
pub fn write_station_tables<P: AsRef<Path>>(transect: &Transect, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|err| AnalysisError::io(dir, err))?;

    Variable::iter()
        .map(|var| -> Result<PathBuf> {
            let path = dir.join(var.table_file_name());
            write_table_csv(transect.table(var), &path)?;
            Ok(path)
        })
        .collect()
}

/// Write the mean profile as a compressed npz archive with the arrays `z` (meters above bottom)
/// and `eps` (mean dissipation, NaN where missing).
pub fn write_mean_profile_npz<P: AsRef<Path>>(profile: &MeanProfile, path: P) -> Result<()> {
    let path = path.as_ref();
    let npz_err = |source| AnalysisError::Npz {
        path: path.to_path_buf(),
        source,
    };

    let z: Array1<i64> = profile.mab.iter().map(|&h| h as i64).collect();
    let eps: Array1<f64> = profile
        .mean
        .iter()
        .map(|v| v.into_option().unwrap_or(std::f64::NAN))
        .collect();

    let file = File::create(path).map_err(|err| AnalysisError::io(path, err))?;
    let mut npz = NpzWriter::new_compressed(file);
    npz.add_array("z", &z).map_err(npz_err)?;
    npz.add_array("eps", &eps).map_err(npz_err)?;
    npz.finish().map_err(npz_err)?;

    Ok(())
}

/// Write a binned table once into `dir`, returning its path.
pub fn write_binned<P: AsRef<Path>>(
    table: &BinnedTable,
    dir: P,
    file_name: &str,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|err| AnalysisError::io(dir, err))?;

    let path = dir.join(file_name);
    write_table_csv(table, &path)?;
    Ok(path)
}

/// Copy an already written file into `dir` and check the copy is byte for byte identical.
pub fn publish_copy<P: AsRef<Path>, Q: AsRef<Path>>(written: P, dir: Q) -> Result<PathBuf> {
    let (written, dir) = (written.as_ref(), dir.as_ref());
    fs::create_dir_all(dir).map_err(|err| AnalysisError::io(dir, err))?;

    let file_name = written.file_name().ok_or_else(|| {
        AnalysisError::InvalidInput(format!("{} is not a file", written.display()))
    })?;
    let target = dir.join(file_name);
    fs::copy(written, &target).map_err(|err| AnalysisError::io(&target, err))?;

    let original = fs::read(written).map_err(|err| AnalysisError::io(written, err))?;
    let copy = fs::read(&target).map_err(|err| AnalysisError::io(&target, err))?;
    if original != copy {
        return Err(AnalysisError::io(
            &target,
            io::Error::new(io::ErrorKind::Other, "copy differs from the original"),
        ));
    }

    Ok(target)
}

// Shortest representation that reads back to the same value, exponent form for very small and
// very large magnitudes.
fn format_value(val: Optioned<f64>) -> String {
    val.into_option()
        .map_or_else(String::new, |v| format!("{:?}", v))
}

#[cfg(test)]
mod test {
    use super::*;
    use optional::none;

    fn make_test_table() -> StationTable {
        StationTable::from_columns(
            vec![0.0, 1.0, 2.0],
            vec![
                (-50.25, vec![some(1.0e-10), none(), some(3.5e-8)]),
                (-49.0, vec![none(), some(28.31), none()]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = vec![];
        write_table(&make_test_table(), &mut buf, Path::new("mem")).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], ",-50.25,-49");
        assert_eq!(lines[1], "0,1e-10,");
        assert_eq!(lines[2], "1,,28.31");
        assert_eq!(lines[3], "2,3.5e-8,");
    }

    #[test]
    fn test_read_back() {
        let table = make_test_table();
        let mut buf = vec![];
        write_table(&table, &mut buf, Path::new("mem")).unwrap();
        let back = read_table(buf.as_slice(), Path::new("mem")).unwrap();

        assert_eq!(back.longitudes(), table.longitudes());
        assert_eq!(back.mab(), table.mab());
        for col in 0..table.n_cols() {
            for row in 0..table.n_rows() {
                assert_eq!(back.get(row, col).into_option(), table.get(row, col).into_option());
            }
        }
    }

    #[test]
    fn test_bad_cell() {
        let text = ",-50\n0,abc\n";
        assert!(read_table(text.as_bytes(), Path::new("mem")).is_err());
    }

    #[test]
    fn test_publish_copy_is_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let results = tmp.path().join("results");
        let derived = tmp.path().join("derived");

        let written = write_binned(&make_test_table(), &results, BINNED_DISSIPATION_FILE).unwrap();
        let copy = publish_copy(&written, &derived).unwrap();

        assert_eq!(copy, derived.join(BINNED_DISSIPATION_FILE));
        assert_eq!(fs::read(&written).unwrap(), fs::read(&copy).unwrap());
    }

    #[test]
    fn test_write_failure_names_path() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory where the file should go
        let path = tmp.path().join("blocked.csv");
        fs::create_dir(&path).unwrap();

        let err = write_table_csv(&make_test_table(), &path).unwrap_err();
        assert!(err.to_string().contains("blocked.csv"));
    }

    #[test]
    fn test_mean_profile_npz() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(MEAN_PROFILE_FILE);
        let profile = MeanProfile {
            mab: vec![0.0, 1.0],
            mean: vec![some(2.0e-9), none()],
            std: vec![none(), none()],
            longitudes: vec![-50.0],
        };

        write_mean_profile_npz(&profile, &path).unwrap();

        let mut npz = ndarray_npy::NpzReader::new(File::open(&path).unwrap()).unwrap();
        let names = npz.names().unwrap();
        assert_eq!(names.len(), 2);
        let entry = |prefix: &str| names.iter().find(|n| n.starts_with(prefix)).unwrap().clone();
        let z: Array1<i64> = npz.by_name(&entry("z")).unwrap();
        let eps: Array1<f64> = npz.by_name(&entry("eps")).unwrap();
        assert_eq!(z.to_vec(), vec![0, 1]);
        assert_eq!(eps[0], 2.0e-9);
        assert!(eps[1].is_nan());
    }
}
