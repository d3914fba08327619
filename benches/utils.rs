use metfor::{Celsius, Meters};
use optional::some;
use thorpe_transect::{Cast, StationInfo};

/// A stratified cast sampled every 2 m down to `bottom`, with an overturn every 50 samples.
pub fn make_cast(id: &str, longitude: f64, bottom: f64) -> Cast {
    let n = (bottom / 2.0) as usize;
    let depth: Vec<f64> = (1..=n).map(|i| 2.0 * i as f64).collect();
    let mut temperature: Vec<f64> = depth.iter().map(|z| 0.5 - 1.5 * z / bottom).collect();
    let mut salinity: Vec<f64> = depth.iter().map(|z| 34.4 + 0.3 * z / bottom).collect();

    for start in (10..n.saturating_sub(10)).step_by(50) {
        temperature[start..start + 6].reverse();
        salinity[start..start + 6].reverse();
    }

    Cast::new()
        .with_station_info(StationInfo::new_with_values(id, (-63.5, longitude)))
        .with_temperature_profile(temperature.into_iter().map(Celsius).map(some).collect())
        .with_salinity_profile(salinity.into_iter().map(some).collect())
        .with_neutral_density_profile(depth.iter().map(|z| some(28.0 + z / 5000.0)).collect())
        .with_depth_profile(depth.into_iter().map(Meters).map(some).collect())
}

/// A transect of casts across the slope, deeper to the east.
pub fn make_transect_casts() -> Vec<Cast> {
    (0..30)
        .map(|i| {
            let lon = -53.5 + 0.23 * i as f64;
            make_cast(&format!("PS00/{:03}-1", i), lon, 300.0 + 100.0 * i as f64)
        })
        .collect()
}
