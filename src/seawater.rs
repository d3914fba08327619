//! Seawater properties needed for overturn detection.
//!
//! These follow the UNESCO (1983) algorithms: the EOS-80 equation of state, the adiabatic lapse
//! rate and potential temperature of Bryden (1973) / Fofonoff (1977), and the pressure-depth
//! relation of Saunders (1981).
//!
//! # Units
//!
//! - Temperature: °C
//! - Salinity: practical salinity
//! - Pressure: dbar, sea pressure (zero at the surface)
//! - Density: kg m⁻³

/// Reference density of seawater used in the Boussinesq buoyancy frequency, kg m⁻³.
pub const RHO_0: f64 = 1025.0;

/// Density of seawater at atmospheric pressure (p = 0).
pub fn density_surface(salinity: f64, temperature: f64) -> f64 {
    let t = temperature;
    let s = salinity;

    // Pure water density (Bigg 1967)
    let rho_w = 999.842594
        + t * (6.793952e-2
            + t * (-9.095290e-3 + t * (1.001685e-4 + t * (-1.120083e-6 + t * 6.536336e-9))));

    let a = 8.24493e-1 + t * (-4.0899e-3 + t * (7.6438e-5 + t * (-8.2467e-7 + t * 5.3875e-9)));
    let b = -5.72466e-3 + t * (1.0227e-4 + t * -1.6546e-6);
    let c = 4.8314e-4;

    rho_w + a * s + b * s * s.sqrt() + c * s * s
}

/// Secant bulk modulus K(S, T, p) in bar, pressure given in dbar.
fn secant_bulk_modulus(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let t = temperature;
    let s = salinity;
    let p = pressure / 10.0; // bar
    let s15 = s * s.sqrt();

    let kw = 19652.21 + t * (148.4206 + t * (-2.327105 + t * (1.360477e-2 + t * -5.155288e-5)));
    let k0 = kw
        + s * (54.6746 + t * (-0.603459 + t * (1.09987e-2 + t * -6.1670e-5)))
        + s15 * (7.944e-2 + t * (1.6483e-2 + t * -5.3009e-4));

    let aw = 3.239908 + t * (1.43713e-3 + t * (1.16092e-4 + t * -5.77905e-7));
    let a = aw + s * (2.2838e-3 + t * (-1.0981e-5 + t * -1.6078e-6)) + s15 * 1.91075e-4;

    let bw = 8.50935e-5 + t * (-6.12293e-6 + t * 5.2787e-8);
    let b = bw + s * (-9.9348e-7 + t * (2.0816e-8 + t * 9.1697e-10));

    k0 + p * (a + b * p)
}

/// In-situ density of seawater.
pub fn density(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let rho_0 = density_surface(salinity, temperature);
    if pressure.abs() < 1.0e-6 {
        return rho_0;
    }

    let k = secant_bulk_modulus(salinity, temperature, pressure);
    rho_0 / (1.0 - pressure / 10.0 / k)
}

/// Adiabatic temperature gradient in °C per dbar.
pub fn adiabatic_lapse_rate(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let t = temperature;
    let p = pressure;
    let ds = salinity - 35.0;

    3.5803e-5
        + t * (8.5258e-6 + t * (-6.836e-8 + t * 6.6228e-10))
        + (1.8932e-6 - 4.2393e-8 * t) * ds
        + ((1.8741e-8 + t * (-6.7795e-10 + t * (8.733e-12 - 5.4481e-14 * t)))
            + (-1.1351e-10 + 2.7759e-12 * t) * ds)
            * p
        + (-4.6206e-13 + t * (1.8676e-14 - 2.1687e-16 * t)) * p * p
}

/// Potential temperature of a water parcel moved adiabatically from `pressure` to
/// `reference_pressure`, integrated with the fourth order Runge-Kutta scheme of Fofonoff (1977).
pub fn potential_temperature(
    salinity: f64,
    temperature: f64,
    pressure: f64,
    reference_pressure: f64,
) -> f64 {
    use std::f64::consts::SQRT_2;

    let s = salinity;
    let h = reference_pressure - pressure;

    let mut xk = h * adiabatic_lapse_rate(s, temperature, pressure);
    let mut theta = temperature + 0.5 * xk;
    let mut q = xk;

    xk = h * adiabatic_lapse_rate(s, theta, pressure + 0.5 * h);
    theta += (1.0 - 1.0 / SQRT_2) * (xk - q);
    q = (2.0 - SQRT_2) * xk + (-2.0 + 3.0 / SQRT_2) * q;

    xk = h * adiabatic_lapse_rate(s, theta, pressure + 0.5 * h);
    theta += (1.0 + 1.0 / SQRT_2) * (xk - q);
    q = (2.0 + SQRT_2) * xk + (-2.0 - 3.0 / SQRT_2) * q;

    xk = h * adiabatic_lapse_rate(s, theta, pressure + h);
    theta + (xk - 2.0 * q) / 6.0
}

/// Density of a water parcel moved adiabatically to `reference_pressure`.
pub fn potential_density(
    salinity: f64,
    temperature: f64,
    pressure: f64,
    reference_pressure: f64,
) -> f64 {
    let theta = potential_temperature(salinity, temperature, pressure, reference_pressure);
    density(salinity, theta, reference_pressure)
}

/// Sea pressure (dbar) at a depth (m, positive down) and latitude (degrees), Saunders (1981).
pub fn pressure_from_depth(depth: f64, latitude: f64) -> f64 {
    let sin_lat = latitude.to_radians().sin().abs();
    let c1 = 5.92e-3 + sin_lat * sin_lat * 5.25e-3;

    ((1.0 - c1) - ((1.0 - c1) * (1.0 - c1) - 8.84e-6 * depth).sqrt()) / 4.42e-6
}

/// Gravitational acceleration at the sea surface (m s⁻²) for a latitude in degrees.
pub fn gravity(latitude: f64) -> f64 {
    let x = latitude.to_radians().sin().powi(2);
    9.780318 * (1.0 + (5.2788e-3 + 2.36e-5 * x) * x)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;

    #[test]
    fn test_density_check_values() {
        // UNESCO (1983) check values
        assert!(approx_equal(density_surface(0.0, 5.0), 999.96675, 1.0e-4));
        assert!(approx_equal(density_surface(35.0, 5.0), 1027.67547, 1.0e-4));
        assert!(approx_equal(density(35.0, 25.0, 10_000.0), 1062.53817, 1.0e-4));
    }

    #[test]
    fn test_potential_temperature_check_value() {
        assert!(approx_equal(
            potential_temperature(40.0, 40.0, 10_000.0, 0.0),
            36.89073,
            1.0e-4
        ));
        // No displacement, no change
        assert!(approx_equal(
            potential_temperature(34.6, -0.5, 3000.0, 3000.0),
            -0.5,
            1.0e-12
        ));
    }

    #[test]
    fn test_pressure_from_depth() {
        assert!(approx_equal(pressure_from_depth(0.0, -63.0), 0.0, 1.0e-9));
        // Pressure in dbar is a few percent larger than depth in the deep ocean
        let p = pressure_from_depth(4000.0, -63.0);
        assert!(p > 4000.0 && p < 4100.0, "{}", p);
    }

    #[test]
    fn test_gravity() {
        assert!(approx_equal(gravity(0.0), 9.780318, 1.0e-9));
        assert!(gravity(-63.0) > gravity(-30.0));
    }
}
