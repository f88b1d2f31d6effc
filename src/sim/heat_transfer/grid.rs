use ndarray::{Array2, s};

use super::config::SimulationConfig;

/// Temperature field indexed `[row, col]`, shape `(nx, ny)`.
pub type Field = Array2<f64>;

/// Temperature of the initial hot square.
pub const HOT_SQUARE_TEMPERATURE: f64 = 100.0;

/// Initial field for a run: zero everywhere except a centered hot square.
pub fn initialize_grid(config: &SimulationConfig) -> Field {
    hot_square(config.nx(), config.ny())
}

/// Zero field of shape `(nx, ny)` with rows `[nx/4, 3nx/4)` and columns
/// `[ny/4, 3ny/4)` set to [`HOT_SQUARE_TEMPERATURE`].
///
/// Bounds use integer floor division, so tiny grids may get an empty square.
pub fn hot_square(nx: usize, ny: usize) -> Field {
    let mut field = Field::zeros((nx, ny));
    field
        .slice_mut(s![nx / 4..3 * nx / 4, ny / 4..3 * ny / 4])
        .fill(HOT_SQUARE_TEMPERATURE);
    field
}

/// Sum over all cells, edge cells included.
pub fn total_energy(field: &Field) -> f64 {
    field.sum()
}

/// Sum over interior cells only.
///
/// Edge cells act as ghost cells for the stencil, so this is the quantity
/// conserved by an all-insulated run without source.
pub fn interior_energy(field: &Field) -> f64 {
    let (nx, ny) = field.dim();
    if nx < 3 || ny < 3 {
        return 0.0;
    }
    field.slice(s![1..nx - 1, 1..ny - 1]).sum()
}

pub fn max_value(field: &Field) -> f64 {
    field.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn min_value(field: &Field) -> f64 {
    field.iter().copied().fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_square_8x8() {
        let config = SimulationConfig::builder().grid(8, 8).build().unwrap();
        let field = initialize_grid(&config);
        assert_eq!(field.dim(), (8, 8));
        for ((i, j), &t) in field.indexed_iter() {
            let hot = (2..6).contains(&i) && (2..6).contains(&j);
            let expected = if hot { 100.0 } else { 0.0 };
            assert_eq!(t, expected, "cell ({i}, {j})");
        }
    }

    #[test]
    fn test_hot_square_odd_non_square_grid() {
        // rows [7/4, 21/4) = [1, 5), cols [5/4, 15/4) = [1, 3)
        let field = hot_square(7, 5);
        let hot: usize = field.iter().filter(|&&t| t == 100.0).count();
        assert_eq!(hot, 4 * 2);
        assert_eq!(field[[1, 1]], 100.0);
        assert_eq!(field[[4, 2]], 100.0);
        assert_eq!(field[[5, 2]], 0.0);
        assert_eq!(field[[4, 3]], 0.0);
    }

    #[test]
    fn test_degenerate_shapes() {
        // 1x1: [0, 0) is empty
        assert_eq!(hot_square(1, 1).sum(), 0.0);
        // 2x2: [0, 1) x [0, 1)
        assert_eq!(hot_square(2, 2).sum(), 100.0);
    }

    #[test]
    fn test_energy_sums() {
        let field = hot_square(8, 8);
        assert_eq!(total_energy(&field), 16.0 * 100.0);
        assert_eq!(interior_energy(&field), 16.0 * 100.0);

        let mut edged = Field::zeros((4, 4));
        edged[[0, 0]] = 5.0;
        edged[[1, 2]] = 2.0;
        assert_eq!(total_energy(&edged), 7.0);
        assert_eq!(interior_energy(&edged), 2.0);
    }

    #[test]
    fn test_min_max() {
        let mut field = Field::zeros((3, 3));
        field[[1, 1]] = 4.0;
        field[[2, 0]] = -1.0;
        assert_eq!(max_value(&field), 4.0);
        assert_eq!(min_value(&field), -1.0);
    }
}
