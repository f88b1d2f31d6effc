use anyhow::{Context, Result};
use serde::Serialize;

use super::config::SimulationConfig;
use super::grid::{Field, max_value, min_value, total_energy};
use super::solver::step_into;

/// Consumer of the per-step fields produced by a [`StepDriver`].
///
/// The driver calls [`FieldObserver::observe`] synchronously and computes the
/// next step only after it returns.
pub trait FieldObserver {
    /// Human-readable identifier for logs.
    fn name(&self) -> &'static str;

    /// One-time hook before the first step, e.g. to read the wall sets.
    fn init(&mut self, _config: &SimulationConfig) -> Result<()> {
        Ok(())
    }

    /// Receives the complete field after step `step` (1-based).
    fn observe(&mut self, step: usize, field: &Field) -> Result<()>;
}

/// Observer that ignores every field.
#[derive(Debug, Default)]
pub struct NullObserver;

impl FieldObserver for NullObserver {
    fn name(&self) -> &'static str {
        "null"
    }

    fn observe(&mut self, _step: usize, _field: &Field) -> Result<()> {
        Ok(())
    }
}

/// Records the total energy of every observed field.
#[derive(Debug, Default)]
pub struct EnergyRecorder {
    pub energy: Vec<f64>,
}

impl FieldObserver for EnergyRecorder {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn init(&mut self, config: &SimulationConfig) -> Result<()> {
        self.energy = Vec::with_capacity(config.nt());
        Ok(())
    }

    fn observe(&mut self, _step: usize, field: &Field) -> Result<()> {
        self.energy.push(total_energy(field));
        Ok(())
    }
}

/// Statistics of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub max_value: f64,
    pub min_value: f64,
}

/// Owns the field buffers of one run and advances them step by step.
///
/// Two buffers are swapped after every step: `current` is read, `scratch`
/// is written. The starting field is kept so the sequence can be restarted.
pub struct StepDriver {
    config: SimulationConfig,
    initial: Field,
    current: Field,
    scratch: Field,
    step: usize,
}

impl StepDriver {
    /// Fails if `initial` does not have the configured `(nx, ny)` shape.
    pub fn new(initial: Field, config: SimulationConfig) -> Result<Self> {
        anyhow::ensure!(
            initial.dim() == config.shape(),
            "initial field shape {:?} does not match the configured grid {:?}",
            initial.dim(),
            config.shape()
        );
        Ok(Self {
            current: initial.clone(),
            scratch: Field::zeros(initial.dim()),
            initial,
            config,
            step: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of steps completed since the start (or last reset).
    pub fn steps_done(&self) -> usize {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.config.nt()
    }

    pub fn current(&self) -> &Field {
        &self.current
    }

    /// Computes the next step.
    ///
    /// Returns `None` once all `nt` steps have been produced.
    pub fn step(&mut self) -> Result<Option<&Field>> {
        if self.is_finished() {
            return Ok(None);
        }
        step_into(&self.current, &mut self.scratch, &self.config)
            .with_context(|| format!("step {} failed", self.step + 1))?;
        std::mem::swap(&mut self.current, &mut self.scratch);
        self.step += 1;
        Ok(Some(&self.current))
    }

    /// Rewinds to the initial field.
    pub fn reset(&mut self) {
        self.current.assign(&self.initial);
        self.step = 0;
    }

    /// Runs the full sequence from the initial field, handing every step to
    /// `observer` before the next one is computed.
    ///
    /// An observer error stops the run and is returned.
    pub fn run(&mut self, observer: &mut dyn FieldObserver) -> Result<RunSummary> {
        self.reset();
        let initial_energy = total_energy(&self.initial);
        tracing::info!(
            nx = self.config.nx(),
            ny = self.config.ny(),
            nt = self.config.nt(),
            observer = observer.name(),
            "starting run"
        );

        observer
            .init(&self.config)
            .with_context(|| format!("observer '{}' failed to initialize", observer.name()))?;

        let mut step = 0;
        while let Some(field) = self.step()? {
            step += 1;
            tracing::debug!(step, energy = total_energy(field), "step done");
            observer
                .observe(step, field)
                .with_context(|| format!("observer '{}' failed at step {step}", observer.name()))?;
        }

        let summary = RunSummary {
            steps: self.step,
            initial_energy,
            final_energy: total_energy(&self.current),
            max_value: max_value(&self.current),
            min_value: min_value(&self.current),
        };
        tracing::info!(
            steps = summary.steps,
            final_energy = summary.final_energy,
            "run finished"
        );
        Ok(summary)
    }

    /// Iterator over owned copies of every step's field, starting over from
    /// the initial field.
    pub fn snapshots(&mut self) -> Snapshots<'_> {
        self.reset();
        Snapshots { driver: self }
    }
}

/// Yields exactly `nt` fields, see [`StepDriver::snapshots`].
pub struct Snapshots<'a> {
    driver: &'a mut StepDriver,
}

impl Iterator for Snapshots<'_> {
    type Item = Result<Field>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.driver.step() {
            Ok(Some(field)) => Some(Ok(field.clone())),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.driver.config.nt() - self.driver.step;
        (left, Some(left))
    }
}
