use std::path::Path;

use anyhow::Result;
use rerun as rr;

use crate::sim::heat_transfer::{Field, FieldObserver, SimulationConfig, Wall, grid::total_energy};

use super::colormap::field_to_rgb;
use super::config::{RerunConfig, Rgba};

const ENERGY_PATH: &str = "energy/total";
const TIMELINE: &str = "step";

fn color(rgba: Rgba) -> rr::Color {
    let (r, g, b, a) = rgba;
    rr::Color(rr::Rgba32::from_linear_unmultiplied_rgba_f32(r, g, b, a))
}

/// Spawns a Rerun viewer and connects to it.
pub fn start_session(config: &RerunConfig) -> Result<rr::RecordingStream> {
    let session = rr::RecordingStreamBuilder::new(config.session_name.as_str()).spawn()?;

    Ok(session)
}

/// Records to an `.rrd` file instead of a live viewer.
pub fn save_session(config: &RerunConfig, path: &Path) -> Result<rr::RecordingStream> {
    let session = rr::RecordingStreamBuilder::new(config.session_name.as_str()).save(path)?;

    Ok(session)
}

/// Line segment of a wall in image coordinates (x = column, y = row).
///
/// Pixel `(x, y)` covers `[x, x+1) x [y, y+1)`, so the outer edges sit at
/// `0`, `ny` and `nx`.
fn wall_segment(wall: Wall, nx: usize, ny: usize) -> Vec<rr::Vec2D> {
    let (w, h) = (ny as f32, nx as f32);
    let (a, b) = match wall {
        Wall::Top => ([0.0, 0.0], [w, 0.0]),
        Wall::Bottom => ([0.0, h], [w, h]),
        Wall::Left => ([0.0, 0.0], [0.0, h]),
        Wall::Right => ([w, 0.0], [w, h]),
    };
    vec![rr::Vec2D(a), rr::Vec2D(b)]
}

/// Logs the insulated and flux walls as static colored lines around the
/// field image.
///
/// A wall in both sets is drawn twice, once per category.
pub fn draw_wall_overlay(
    session: &rr::RecordingStream,
    sim: &SimulationConfig,
    config: &RerunConfig,
) -> Result<()> {
    let categories = [
        ("insulated", sim.insulated_walls(), config.insulated_color),
        ("flux", sim.flux_walls(), config.flux_color),
    ];
    for (category, walls, rgba) in categories {
        for wall in walls.iter() {
            let name = format!("{}/walls/{}/{}", config.entity_prefix, category, wall);
            session.log_static(
                name,
                &rr::LineStrips2D::new([wall_segment(wall, sim.nx(), sim.ny())])
                    .with_colors([color(rgba)])
                    .with_radii([rr::Radius::new_ui_points(config.wall_radius)])
                    .with_labels([format!("{category} {wall}")]),
            )?;
        }
    }

    Ok(())
}

/// Logs one field as a color-mapped image on the `step` timeline, plus its
/// total energy as a scalar.
pub fn draw_field(
    session: &rr::RecordingStream,
    step: usize,
    field: &Field,
    config: &RerunConfig,
) -> Result<()> {
    let (nx, ny) = field.dim();
    session.set_time_sequence(TIMELINE, step as i64);

    let rgb = field_to_rgb(field, config.t_min, config.t_max);
    session.log(
        format!("{}/field", config.entity_prefix),
        &rr::Image::from_rgb24(rgb, [ny as u32, nx as u32]),
    )?;
    session.log(ENERGY_PATH, &rr::Scalars::new([total_energy(field)]))?;

    Ok(())
}

/// [`FieldObserver`] streaming every step to a Rerun session.
pub struct RerunFieldView {
    session: rr::RecordingStream,
    config: RerunConfig,
}

impl RerunFieldView {
    pub fn new(session: rr::RecordingStream, config: RerunConfig) -> Self {
        Self { session, config }
    }

    pub fn session(&self) -> &rr::RecordingStream {
        &self.session
    }
}

impl FieldObserver for RerunFieldView {
    fn name(&self) -> &'static str {
        "rerun"
    }

    fn init(&mut self, sim: &SimulationConfig) -> Result<()> {
        draw_wall_overlay(&self.session, sim, &self.config)?;

        // Use a top-level path so Rerun puts the chart in its own view
        let (r, g, b, _) = self.config.energy_color;
        self.session.log_static(
            ENERGY_PATH,
            &rr::SeriesLines::new()
                .with_colors([[(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]])
                .with_names(["Total energy"])
                .with_widths([1.5]),
        )?;

        Ok(())
    }

    fn observe(&mut self, step: usize, field: &Field) -> Result<()> {
        draw_field(&self.session, step, field, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::heat_transfer::{StepDriver, initialize_grid};

    fn buffered_session() -> rr::RecordingStream {
        rr::RecordingStreamBuilder::new("test").buffered().unwrap()
    }

    #[test]
    fn test_wall_segments_follow_image_axes() {
        let top = wall_segment(Wall::Top, 4, 6);
        assert_eq!(top, vec![rr::Vec2D([0.0, 0.0]), rr::Vec2D([6.0, 0.0])]);
        let right = wall_segment(Wall::Right, 4, 6);
        assert_eq!(right, vec![rr::Vec2D([6.0, 0.0]), rr::Vec2D([6.0, 4.0])]);
    }

    #[test]
    fn test_draw_wall_overlay_is_ok() {
        let session = buffered_session();
        let sim = SimulationConfig::builder()
            .grid(5, 5)
            .flux_walls("top,right".parse().unwrap())
            .build()
            .unwrap();
        draw_wall_overlay(&session, &sim, &RerunConfig::default()).unwrap();
    }

    #[test]
    fn test_draw_field_is_ok() {
        let session = buffered_session();
        let field = Field::zeros((3, 7));
        draw_field(&session, 1, &field, &RerunConfig::default()).unwrap();
    }

    #[test]
    fn test_view_as_driver_observer() {
        let sim = SimulationConfig::builder().grid(8, 6).nt(3).build().unwrap();
        let mut view = RerunFieldView::new(buffered_session(), RerunConfig::default());
        let mut driver = StepDriver::new(initialize_grid(&sim), sim).unwrap();
        let summary = driver.run(&mut view).unwrap();
        assert_eq!(summary.steps, 3);
        assert_eq!(view.name(), "rerun");
    }
}
