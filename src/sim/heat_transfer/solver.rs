use anyhow::{Result, ensure};
use ndarray::{ArrayViewMut1, Axis, s};
use rayon::prelude::*;

use super::boundary::apply_config_boundaries;
use super::config::SimulationConfig;
use super::grid::Field;

/// Per-step constants of the explicit scheme.
///
/// With `rx = alpha*dt/dx^2` and `ry = alpha*dt/dy^2` the update of an
/// interior cell is
///
/// ```text
/// T' = T + rx*(T[i+1,j] - 2T + T[i-1,j]) + ry*(T[i,j+1] - 2T + T[i,j-1]) + dt*Q
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilCoefficients {
    pub rx: f64,
    pub ry: f64,
    /// `dt * Q`, added to every interior cell each step.
    pub source: f64,
}

impl StencilCoefficients {
    pub fn new(config: &SimulationConfig) -> Self {
        let (alpha, dt) = (config.alpha(), config.dt());
        Self {
            rx: alpha * dt / (config.dx() * config.dx()),
            ry: alpha * dt / (config.dy() * config.dy()),
            source: dt * config.q(),
        }
    }

    #[inline]
    fn update(&self, prev: &Field, i: usize, j: usize) -> f64 {
        let t = prev[[i, j]];
        t + self.rx * (prev[[i + 1, j]] - 2.0 * t + prev[[i - 1, j]])
            + self.ry * (prev[[i, j + 1]] - 2.0 * t + prev[[i, j - 1]])
            + self.source
    }
}

/// Writes the explicit update of every interior cell of `prev` into `next`.
///
/// Only `prev` is read. Edge cells of `next` receive `prev`'s edge values,
/// since the stencil never computes them. With `parallel` the interior rows
/// are split across the rayon pool; each worker writes disjoint cells and the
/// call returns only once all of them are done.
pub fn interior_pass(prev: &Field, next: &mut Field, coeffs: &StencilCoefficients, parallel: bool) {
    let (nx, _) = prev.dim();
    debug_assert_eq!(next.dim(), prev.dim());

    copy_edges(prev, next);

    let mut rows = next.slice_mut(s![1..nx - 1, ..]);
    if parallel {
        rows.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(k, row)| update_row(prev, k + 1, row, coeffs));
    } else {
        for (k, row) in rows.axis_iter_mut(Axis(0)).enumerate() {
            update_row(prev, k + 1, row, coeffs);
        }
    }
}

fn update_row(prev: &Field, i: usize, mut out: ArrayViewMut1<'_, f64>, coeffs: &StencilCoefficients) {
    for j in 1..prev.ncols() - 1 {
        out[j] = coeffs.update(prev, i, j);
    }
}

/// Advances `prev` by one step into `next`: interior pass, then boundaries.
///
/// No stability check is made. Parameters outside the stability limit give
/// growing, oscillating values (see [`super::stability`]).
pub fn step_into(prev: &Field, next: &mut Field, config: &SimulationConfig) -> Result<()> {
    ensure!(
        prev.dim() == config.shape() && next.dim() == config.shape(),
        "field shapes {:?} -> {:?} do not match the configured grid {:?}",
        prev.dim(),
        next.dim(),
        config.shape()
    );
    interior_pass(
        prev,
        next,
        &StencilCoefficients::new(config),
        config.parallel(),
    );
    apply_config_boundaries(next, config);
    Ok(())
}

/// Returns a new field one step ahead of `field`.
pub fn update_temperature(field: &Field, config: &SimulationConfig) -> Result<Field> {
    let mut next = Field::zeros(field.dim());
    step_into(field, &mut next, config)?;
    Ok(next)
}

fn copy_edges(prev: &Field, next: &mut Field) {
    let (nx, ny) = prev.dim();
    next.row_mut(0).assign(&prev.row(0));
    next.row_mut(nx - 1).assign(&prev.row(nx - 1));
    next.column_mut(0).assign(&prev.column(0));
    next.column_mut(ny - 1).assign(&prev.column(ny - 1));
}
