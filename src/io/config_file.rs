use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use crate::sim::heat_transfer::{SimulationConfig, SimulationConfigBuilder};

/// Reads and validates a JSON configuration file.
///
/// Missing keys take their default values. Keys match the CLI flags:
///
/// ```json
/// { "alpha": 2.3e-5, "nx": 50, "ny": 50, "Q": 0.05,
///   "insulated_walls": ["top", "left"], "flux_walls": ["bottom"] }
/// ```
pub fn read_config(path: &Path) -> Result<SimulationConfig> {
    let builder = read_config_builder(path)?;
    let config = builder
        .build()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    Ok(config)
}

/// Reads a JSON configuration file without validating it, so that values
/// can still be overridden before [`SimulationConfigBuilder::build`].
pub fn read_config_builder(path: &Path) -> Result<SimulationConfigBuilder> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let builder: SimulationConfigBuilder = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(builder)
}

/// Writes a configuration as pretty-printed JSON.
pub fn write_config(path: &Path, config: &SimulationConfig) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, config)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::heat_transfer::{Wall, WallSet};

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        let config = SimulationConfig::builder()
            .grid(20, 30)
            .nt(7)
            .flux_walls(WallSet::empty().with(Wall::Bottom))
            .build()
            .unwrap();

        write_config(&path, &config).unwrap();
        let back = read_config(&path).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"nx": 1, "ny": 10}"#).unwrap();

        let err = read_config(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("bad.json"), "{msg}");
        assert!(msg.contains("at least 3x3"), "{msg}");

        // The unvalidated builder still loads, so the CLI can override nx
        let builder = read_config_builder(&path).unwrap();
        assert!(builder.grid(10, 10).build().is_ok());
    }

    #[test]
    fn test_unknown_wall_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walls.json");
        std::fs::write(&path, r#"{"flux_walls": ["up"]}"#).unwrap();
        assert!(read_config(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
