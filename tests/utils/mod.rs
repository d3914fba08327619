#![allow(dead_code)]
use metfor::{Celsius, Meters};
use optional::some;
use std::fmt::Write;
use thorpe_transect::{write_table, Cast, StationInfo, StationTable};

pub const HEADER: &str =
    "Event,Latitude,Longitude,Depth water [m],Temp [°C],Sal,Neutral density [kg m^-3]";

/// A station sampled for 40 m from `top` downward, salinity stratified, with rows 10 and 13
/// swapped to make a single overturn 26 to 29 m above the bottom.
#[derive(Debug, Clone, Copy)]
pub struct Station {
    pub id: &'static str,
    pub longitude: f64,
    pub top: f64,
    pub bottom_temperature: f64,
}

impl Station {
    pub fn new(id: &'static str, longitude: f64) -> Self {
        Station {
            id,
            longitude,
            top: 1000.0,
            bottom_temperature: -0.5,
        }
    }

    pub fn shallow(self, top: f64) -> Self {
        Station { top, ..self }
    }

    pub fn warm(self, bottom_temperature: f64) -> Self {
        Station {
            bottom_temperature,
            ..self
        }
    }

    fn rows(&self) -> Vec<(f64, f64, f64, f64)> {
        let n = 40;
        let mut salinity: Vec<f64> = (0..n).map(|i| 34.4 + 0.01 * i as f64).collect();
        salinity.swap(10, 13);

        (0..n)
            .map(|i| {
                let t = if i == n - 1 {
                    self.bottom_temperature
                } else {
                    -0.5
                };
                (self.top + i as f64, t, salinity[i], 28.3 + 0.001 * i as f64)
            })
            .collect()
    }

    pub fn cast(&self) -> Cast {
        let rows = self.rows();
        Cast::new()
            .with_station_info(StationInfo::new_with_values(self.id, (-63.5, self.longitude)))
            .with_depth_profile(rows.iter().map(|r| some(Meters(r.0))).collect())
            .with_temperature_profile(rows.iter().map(|r| some(Celsius(r.1))).collect())
            .with_salinity_profile(rows.iter().map(|r| some(r.2)).collect())
            .with_neutral_density_profile(rows.iter().map(|r| some(r.3)).collect())
    }
}

/// Three good stations, two of them in the same bin, and one of each kind of rejected station.
pub fn stations() -> Vec<Station> {
    vec![
        Station::new("PS00/001-1", -50.1),
        Station::new("PS00/002-1", -50.2),
        Station::new("PS00/003-1", -49.0),
        Station::new("PS71/216-1", -49.6),
        Station::new("PS00/004-1", -51.0).shallow(110.0),
        Station::new("PS00/005-1", -48.9).warm(0.5),
    ]
}

/// CTD table text holding every station, one row per sample.
pub fn transect_csv(stations: &[Station]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for stn in stations {
        for (depth, t, s, gamma) in stn.rows() {
            writeln!(
                text,
                "{},-63.5,{},{},{},{},{}",
                stn.id, stn.longitude, depth, t, s, gamma
            )
            .unwrap();
        }
    }
    text
}

/// The CSV text of a table, for comparing tables cell by cell.
pub fn table_text(table: &StationTable) -> String {
    let mut buf = vec![];
    write_table(table, &mut buf, std::path::Path::new("memory")).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    assert!(eps > 0.0);

    (val1 - val2).abs() < eps
}

/// Column of a table whose label is closest to `longitude`.
pub fn column_near(table: &StationTable, longitude: f64) -> usize {
    table
        .longitudes()
        .iter()
        .position(|&lon| approx_equal(lon, longitude, 1.0e-6))
        .unwrap()
}
