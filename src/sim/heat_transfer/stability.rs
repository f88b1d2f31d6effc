//! Stability diagnostics for the explicit scheme.
//!
//! Forward Euler diffusion stays bounded only while
//! `alpha * dt * (1/dx^2 + 1/dy^2) <= 1/2`. The solver itself never checks
//! this; the helpers here are for callers and tests.

use std::fmt;

use super::config::SimulationConfig;
use super::grid::Field;

/// Upper bound of [`stability_number`] for a bounded explicit solution.
pub const STABILITY_LIMIT: f64 = 0.5;

/// `alpha * dt * (1/dx^2 + 1/dy^2)`.
pub fn stability_number(config: &SimulationConfig) -> f64 {
    config.alpha()
        * config.dt()
        * (1.0 / (config.dx() * config.dx()) + 1.0 / (config.dy() * config.dy()))
}

pub fn is_stable(config: &SimulationConfig) -> bool {
    stability_number(config) <= STABILITY_LIMIT
}

/// Largest `dt` satisfying the stability condition for the config's
/// `alpha`, `dx` and `dy`.
pub fn max_stable_dt(config: &SimulationConfig) -> f64 {
    let inv = 1.0 / (config.dx() * config.dx()) + 1.0 / (config.dy() * config.dy());
    STABILITY_LIMIT / (config.alpha() * inv)
}

/// First cell found outside the expected bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceReport {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl DivergenceReport {
    pub fn is_non_finite(&self) -> bool {
        !self.value.is_finite()
    }
}

impl fmt::Display for DivergenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell ({}, {}) = {} outside [{}, {}]",
            self.row, self.col, self.value, self.lower, self.upper
        )
    }
}

impl std::error::Error for DivergenceReport {}

/// Checks that every cell is finite and within `[lower - tol, upper + tol]`.
///
/// Cells are scanned in row-major order and the first offender is reported.
pub fn check_bounded(field: &Field, lower: f64, upper: f64, tol: f64) -> Result<(), DivergenceReport> {
    for ((row, col), &value) in field.indexed_iter() {
        if !value.is_finite() || value < lower - tol || value > upper + tol {
            return Err(DivergenceReport {
                row,
                col,
                value,
                lower,
                upper,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stability_number_for_defaults() {
        let c = SimulationConfig::default();
        // 0.000023 * 0.001 * (1e4 + 1e4)
        assert!((stability_number(&c) - 4.6e-4).abs() < 1e-15);
        assert!(is_stable(&c));
    }

    #[test]
    fn test_unstable_config() {
        let c = SimulationConfig::builder()
            .alpha(1.0)
            .dx(1.0)
            .dy(1.0)
            .dt(0.3)
            .build()
            .unwrap();
        assert!((stability_number(&c) - 0.6).abs() < 1e-12);
        assert!(!is_stable(&c));
        assert!((max_stable_dt(&c) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_max_stable_dt_is_on_the_limit() {
        let c = SimulationConfig::builder()
            .alpha(0.5)
            .dx(0.1)
            .dy(0.2)
            .build()
            .unwrap();
        let at_limit = c.to_builder().dt(max_stable_dt(&c)).build().unwrap();
        assert!((stability_number(&at_limit) - STABILITY_LIMIT).abs() < 1e-12);
    }

    #[test]
    fn test_check_bounded() {
        let mut f = Field::from_elem((3, 4), 50.0);
        assert!(check_bounded(&f, 0.0, 100.0, 1e-9).is_ok());

        f[[1, 2]] = 100.0 + 1e-12;
        assert!(check_bounded(&f, 0.0, 100.0, 1e-9).is_ok());

        f[[2, 1]] = 101.0;
        let report = check_bounded(&f, 0.0, 100.0, 1e-9).unwrap_err();
        assert_eq!((report.row, report.col), (2, 1));
        assert!(!report.is_non_finite());
        assert!(report.to_string().contains("cell (2, 1)"));

        f[[0, 3]] = f64::NAN;
        let report = check_bounded(&f, 0.0, 100.0, 1e-9).unwrap_err();
        assert_eq!((report.row, report.col), (0, 3));
        assert!(report.is_non_finite());
    }
}
