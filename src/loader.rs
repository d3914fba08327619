//! Read CTD casts from a CSV table with one row per sample.
use crate::{
    cast::{Cast, StationInfo},
    error::{AnalysisError, Result},
    utility::nan_mean,
};
use metfor::{Celsius, Meters};
use optional::Optioned;
use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

const EVENT: &str = "Event";
const DEPTH: &str = "Depth water [m]";
const TEMPERATURE: &str = "Temp [°C]";
const SALINITY: &str = "Sal";
const LONGITUDE: &str = "Longitude";
const LATITUDE: &str = "Latitude";
const NEUTRAL_DENSITY: &str = "Neutral density [kg m^-3]";

#[derive(Debug, Default)]
struct EventRows {
    depth: Vec<Optioned<Meters>>,
    temperature: Vec<Optioned<Celsius>>,
    salinity: Vec<Optioned<f64>>,
    neutral_density: Vec<Optioned<f64>>,
    longitude: Vec<Optioned<f64>>,
    latitude: Vec<Optioned<f64>>,
}

/// Load every cast in the file at `path`, ordered by event label.
pub fn load_casts<P: AsRef<Path>>(path: P) -> Result<Vec<Cast>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| AnalysisError::io(path, err))?;
    casts_from_reader(file, path)
}

/// Read casts from any source of CSV text. `origin` only names the source in error messages.
///
/// Rows are grouped into casts by their `Event` column, the casts come out sorted by event and
/// the samples of each cast keep their order in the file. Empty or unparseable cells are missing
/// values. The position of a cast is the mean position of its rows.
pub fn casts_from_reader<R: Read>(source: R, origin: &Path) -> Result<Vec<Cast>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|err| AnalysisError::csv(origin, err))?
        .clone();
    let column = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            AnalysisError::InvalidInput(format!("{}: missing column '{}'", origin.display(), name))
        })
    };

    let event_col = column(EVENT)?;
    let depth_col = column(DEPTH)?;
    let temperature_col = column(TEMPERATURE)?;
    let salinity_col = column(SALINITY)?;
    let lon_col = column(LONGITUDE)?;
    let lat_col = column(LATITUDE)?;
    let gamma_col = column(NEUTRAL_DENSITY)?;

    let mut events: BTreeMap<String, EventRows> = BTreeMap::new();
    for record in reader.records() {
        let record = record.map_err(|err| AnalysisError::csv(origin, err))?;
        let value = |col: usize| -> Optioned<f64> { parse_cell(record.get(col)) };

        let event = record.get(event_col).unwrap_or_default().to_owned();
        let rows = events.entry(event).or_default();

        rows.depth.push(value(depth_col).map_t(Meters));
        rows.temperature.push(value(temperature_col).map_t(Celsius));
        rows.salinity.push(value(salinity_col));
        rows.neutral_density.push(value(gamma_col));
        rows.longitude.push(value(lon_col));
        rows.latitude.push(value(lat_col));
    }

    Ok(events
        .into_iter()
        .map(|(event, rows)| {
            let lat = nan_mean(rows.latitude);
            let lon = nan_mean(rows.longitude);
            let mut info = StationInfo::new().with_id(event);
            if let (Some(lat), Some(lon)) = (lat.into_option(), lon.into_option()) {
                info = info.with_lat_lon((lat, lon));
            }

            Cast::new()
                .with_station_info(info)
                .with_depth_profile(rows.depth)
                .with_temperature_profile(rows.temperature)
                .with_salinity_profile(rows.salinity)
                .with_neutral_density_profile(rows.neutral_density)
        })
        .collect())
}

fn parse_cell(cell: Option<&str>) -> Optioned<f64> {
    cell.and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .into()
}

#[cfg(test)]
mod test {
    use super::*;
    use metfor::Quantity;

    const TEST_CSV: &str = "\
Event,Latitude,Longitude,Depth water [m],Temp [°C],Sal,Neutral density [kg m^-3]
PS71/210-1,-63.50,-50.10,1.0,-1.5,34.30,27.80
PS71/210-1,-63.52,-50.30,2.0,-1.4,34.31,
PS40/080-2,-64.00,-52.00,5.0,NaN,34.40,28.00
PS71/210-1,-63.54,-50.20,3.0,-1.3,34.32,27.90
";

    #[test]
    fn test_group_by_event() {
        let casts = casts_from_reader(TEST_CSV.as_bytes(), Path::new("test.csv")).unwrap();
        assert_eq!(casts.len(), 2);

        // Sorted by event label
        assert_eq!(casts[0].id(), "PS40/080-2");
        assert_eq!(casts[1].id(), "PS71/210-1");

        let cast = &casts[1];
        assert_eq!(cast.len(), 3);
        assert_eq!(cast.max_depth().unwrap(), Meters(3.0));
        assert!((cast.mean_longitude().unwrap() - -50.2).abs() < 1.0e-12);
        assert!((cast.mean_latitude().unwrap() - -63.52).abs() < 1.0e-12);
        assert!(cast.neutral_density_profile()[1].is_none());
        assert_eq!(cast.temperature_profile()[2].unwrap().unpack(), -1.3);

        assert!(casts[0].temperature_profile()[0].is_none());
    }

    #[test]
    fn test_missing_column() {
        let text = "Event,Latitude,Longitude\nA,1,2\n";
        match casts_from_reader(text.as_bytes(), Path::new("bad.csv")) {
            Err(AnalysisError::InvalidInput(msg)) => assert!(msg.contains("Depth water [m]")),
            other => panic!("unexpected result {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(load_casts("/this/file/does/not/exist.csv").is_err());
    }
}
