use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four outer edges of the rectangular grid.
///
/// `Top` is row `0`, `Bottom` is row `nx - 1`, `Left` is column `0`
/// and `Right` is column `ny - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    Top,
    Bottom,
    Left,
    Right,
}

impl Wall {
    /// All walls, in the order boundary rules are applied.
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Bottom, Wall::Left, Wall::Right];

    pub fn name(&self) -> &'static str {
        match self {
            Wall::Top => "top",
            Wall::Bottom => "bottom",
            Wall::Left => "left",
            Wall::Right => "right",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Wall::Top => 0b0001,
            Wall::Bottom => 0b0010,
            Wall::Left => 0b0100,
            Wall::Right => 0b1000,
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Wall {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Wall::Top),
            "bottom" => Ok(Wall::Bottom),
            "left" => Ok(Wall::Left),
            "right" => Ok(Wall::Right),
            _ => Err(ConfigError::UnknownWall(s.trim().to_string())),
        }
    }
}

/// Fixed-size set of walls stored as a 4-bit mask.
///
/// Iteration order is always [`Wall::ALL`], independent of insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Wall>", into = "Vec<Wall>")]
pub struct WallSet {
    bits: u8,
}

impl WallSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub const fn all() -> Self {
        Self { bits: 0b1111 }
    }

    pub fn insert(&mut self, wall: Wall) {
        self.bits |= wall.bit();
    }

    pub fn remove(&mut self, wall: Wall) {
        self.bits &= !wall.bit();
    }

    pub fn with(mut self, wall: Wall) -> Self {
        self.insert(wall);
        self
    }

    pub fn contains(&self, wall: Wall) -> bool {
        self.bits & wall.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Walls present in both sets.
    pub fn intersection(&self, other: &WallSet) -> WallSet {
        WallSet {
            bits: self.bits & other.bits,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Wall> + '_ {
        Wall::ALL.into_iter().filter(move |w| self.contains(*w))
    }
}

impl FromIterator<Wall> for WallSet {
    fn from_iter<I: IntoIterator<Item = Wall>>(iter: I) -> Self {
        let mut set = WallSet::empty();
        for wall in iter {
            set.insert(wall);
        }
        set
    }
}

impl From<Vec<Wall>> for WallSet {
    fn from(walls: Vec<Wall>) -> Self {
        walls.into_iter().collect()
    }
}

impl From<WallSet> for Vec<Wall> {
    fn from(set: WallSet) -> Self {
        set.iter().collect()
    }
}

/// Parses a comma-separated wall list such as `"top,left"`.
///
/// An empty (or all-whitespace) string is the empty set.
impl FromStr for WallSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Wall::from_str)
            .collect()
    }
}

impl fmt::Display for WallSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|w| w.name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Errors raised while constructing a [`SimulationConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid must be at least 3x3 to contain an interior cell, got {nx}x{ny}")]
    GridTooSmall { nx: usize, ny: usize },
    #[error("{name} must be finite and greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("unknown wall identifier '{0}' (expected top, bottom, left, right)")]
    UnknownWall(String),
}

/// Immutable parameters of one simulation run.
///
/// Built through [`SimulationConfigBuilder`], which validates every field.
/// The same builder is the serialized form, so a JSON config file goes through
/// identical validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SimulationConfigBuilder", into = "SimulationConfigBuilder")]
pub struct SimulationConfig {
    alpha: f64,
    dx: f64,
    dy: f64,
    dt: f64,
    nx: usize,
    ny: usize,
    nt: usize,
    q: f64,
    insulated_walls: WallSet,
    flux_walls: WallSet,
    parallel: bool,
}

impl SimulationConfig {
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::new()
    }

    /// Builder pre-filled with this configuration's values.
    pub fn to_builder(&self) -> SimulationConfigBuilder {
        self.clone().into()
    }

    /// Thermal diffusivity [m^2/s].
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of rows.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of columns.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of time steps in a run.
    pub fn nt(&self) -> usize {
        self.nt
    }

    /// Uniform source term, also used as the per-step flux wall increment.
    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn insulated_walls(&self) -> WallSet {
        self.insulated_walls
    }

    pub fn flux_walls(&self) -> WallSet {
        self.flux_walls
    }

    /// Whether the interior pass is split across the rayon pool.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Walls listed as both insulated and flux.
    ///
    /// Such walls get the insulation copy and then the flux increment on top.
    pub fn overlapping_walls(&self) -> WallSet {
        self.insulated_walls.intersection(&self.flux_walls)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfigBuilder::new().freeze()
    }
}

/// Unvalidated configuration values.
///
/// Missing fields in a JSON file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfigBuilder {
    pub alpha: f64,
    pub dx: f64,
    pub dy: f64,
    pub dt: f64,
    pub nx: usize,
    pub ny: usize,
    pub nt: usize,
    #[serde(rename = "Q", alias = "q")]
    pub q: f64,
    pub insulated_walls: WallSet,
    pub flux_walls: WallSet,
    pub parallel: bool,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self {
            alpha: 0.000023,
            dx: 0.01,
            dy: 0.01,
            dt: 0.001,
            nx: 50,
            ny: 50,
            nt: 100,
            q: 0.05,
            insulated_walls: WallSet::all(),
            flux_walls: WallSet::empty(),
            parallel: false,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn dx(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

    pub fn dy(mut self, dy: f64) -> Self {
        self.dy = dy;
        self
    }

    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn grid(mut self, nx: usize, ny: usize) -> Self {
        self.nx = nx;
        self.ny = ny;
        self
    }

    pub fn nt(mut self, nt: usize) -> Self {
        self.nt = nt;
        self
    }

    pub fn q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn insulated_walls(mut self, walls: WallSet) -> Self {
        self.insulated_walls = walls;
        self
    }

    pub fn flux_walls(mut self, walls: WallSet) -> Self {
        self.flux_walls = walls;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the values and freezes them into a [`SimulationConfig`].
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        if self.nx < 3 || self.ny < 3 {
            return Err(ConfigError::GridTooSmall {
                nx: self.nx,
                ny: self.ny,
            });
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("dx", self.dx),
            ("dy", self.dy),
            ("dt", self.dt),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !self.q.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "Q",
                value: self.q,
            });
        }

        let config = self.freeze();
        for wall in config.overlapping_walls().iter() {
            tracing::warn!(
                %wall,
                "wall is both insulated and flux; flux is added on top of the insulation copy"
            );
        }
        Ok(config)
    }

    fn freeze(self) -> SimulationConfig {
        SimulationConfig {
            alpha: self.alpha,
            dx: self.dx,
            dy: self.dy,
            dt: self.dt,
            nx: self.nx,
            ny: self.ny,
            nt: self.nt,
            q: self.q,
            insulated_walls: self.insulated_walls,
            flux_walls: self.flux_walls,
            parallel: self.parallel,
        }
    }
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<SimulationConfig> for SimulationConfigBuilder {
    fn from(c: SimulationConfig) -> Self {
        Self {
            alpha: c.alpha,
            dx: c.dx,
            dy: c.dy,
            dt: c.dt,
            nx: c.nx,
            ny: c.ny,
            nt: c.nt,
            q: c.q,
            insulated_walls: c.insulated_walls,
            flux_walls: c.flux_walls,
            parallel: c.parallel,
        }
    }
}

impl TryFrom<SimulationConfigBuilder> for SimulationConfig {
    type Error = ConfigError;

    fn try_from(b: SimulationConfigBuilder) -> Result<Self, Self::Error> {
        b.build()
    }
}
