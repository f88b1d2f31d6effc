/// RGBA color tuple (red, green, blue, alpha) with values in 0.0..=1.0.
pub type Rgba = (f32, f32, f32, f32);

/// Configuration for Rerun visualization sessions.
///
/// Controls session naming, entity paths, the colormap range and the colors
/// of the wall overlay.
pub struct RerunConfig {
    // Labels
    pub session_name: String,
    pub entity_prefix: String,

    // Field image
    /// Temperature mapped to the dark end of the colormap.
    pub t_min: f64,
    /// Temperature mapped to the bright end of the colormap.
    pub t_max: f64,

    // Wall overlay
    pub insulated_color: Rgba,
    pub flux_color: Rgba,
    pub wall_radius: f32,

    // Energy chart
    pub energy_color: Rgba,
}

impl RerunConfig {
    pub fn new() -> Self {
        Self {
            session_name: "heat2d".to_string(),
            entity_prefix: "Heat2d".to_string(),

            t_min: 0.0,
            t_max: 100.0,

            insulated_color: (0.2, 0.5, 1.0, 1.0),
            flux_color: (1.0, 0.3, 0.0, 1.0),
            wall_radius: 2.0,

            energy_color: (1.0, 0.8, 0.2, 1.0),
        }
    }
}

impl Default for RerunConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RerunConfig::new();
        assert_eq!(config.session_name, "heat2d");
        assert_eq!(config.entity_prefix, "Heat2d");
        assert_eq!(config.t_min, 0.0);
        assert_eq!(config.t_max, 100.0);
        assert_ne!(config.insulated_color, config.flux_color);
    }

    #[test]
    fn test_default_trait() {
        let config = RerunConfig::default();
        assert_eq!(config.session_name, "heat2d");
    }
}
