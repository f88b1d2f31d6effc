use ndarray::{ArrayViewMut1, s};

use super::config::{SimulationConfig, Wall, WallSet};
use super::grid::Field;

/// Rule applied to one edge of the field after the interior update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryRule {
    /// Zero gradient: the edge copies the adjacent interior row/column.
    Insulated,
    /// Constant flux: `q` is added to every cell on the edge, once per step.
    ///
    /// Not idempotent. Applying it twice adds `2 * q`.
    Flux { q: f64 },
}

impl BoundaryRule {
    /// Applies the rule to `wall` of `field` in place.
    ///
    /// The field must be at least 2x2 so that an adjacent row/column exists.
    pub fn apply(&self, field: &mut Field, wall: Wall) {
        match *self {
            BoundaryRule::Insulated => insulate(field, wall),
            BoundaryRule::Flux { q } => {
                let mut edge = edge_mut(field, wall);
                edge += q;
            }
        }
    }
}

/// Ordered list of `(wall, rule)` pairs: every insulated wall first, then
/// every flux wall.
///
/// A wall present in both sets appears twice and ends up as the insulation
/// copy plus `q`.
pub fn boundary_rules(insulated: WallSet, flux: WallSet, q: f64) -> Vec<(Wall, BoundaryRule)> {
    insulated
        .iter()
        .map(|w| (w, BoundaryRule::Insulated))
        .chain(flux.iter().map(|w| (w, BoundaryRule::Flux { q })))
        .collect()
}

/// Mutates the edge rows/columns of `field` according to the wall sets.
///
/// Walls in neither set are left untouched.
pub fn apply_boundary_conditions(field: &mut Field, insulated: WallSet, flux: WallSet, q: f64) {
    for (wall, rule) in boundary_rules(insulated, flux, q) {
        rule.apply(field, wall);
    }
}

/// Applies the wall sets and `Q` of `config`.
pub fn apply_config_boundaries(field: &mut Field, config: &SimulationConfig) {
    apply_boundary_conditions(
        field,
        config.insulated_walls(),
        config.flux_walls(),
        config.q(),
    );
}

/// Number of cells on the edge owned by `wall`.
pub fn boundary_cell_count(wall: Wall, nx: usize, ny: usize) -> usize {
    match wall {
        Wall::Top | Wall::Bottom => ny,
        Wall::Left | Wall::Right => nx,
    }
}

/// Number of `q` increments a flux step adds along the edges.
///
/// A corner shared by two flux walls is counted twice.
pub fn flux_cell_count(config: &SimulationConfig) -> usize {
    config
        .flux_walls()
        .iter()
        .map(|w| boundary_cell_count(w, config.nx(), config.ny()))
        .sum()
}

fn edge_mut(field: &mut Field, wall: Wall) -> ArrayViewMut1<'_, f64> {
    let (nx, ny) = field.dim();
    match wall {
        Wall::Top => field.row_mut(0),
        Wall::Bottom => field.row_mut(nx - 1),
        Wall::Left => field.column_mut(0),
        Wall::Right => field.column_mut(ny - 1),
    }
}

fn insulate(field: &mut Field, wall: Wall) {
    let (nx, ny) = field.dim();
    let (mut edge, inner) = match wall {
        Wall::Top => field.multi_slice_mut((s![0, ..], s![1, ..])),
        Wall::Bottom => field.multi_slice_mut((s![nx - 1, ..], s![nx - 2, ..])),
        Wall::Left => field.multi_slice_mut((s![.., 0], s![.., 1])),
        Wall::Right => field.multi_slice_mut((s![.., ny - 1], s![.., ny - 2])),
    };
    edge.assign(&inner);
}
