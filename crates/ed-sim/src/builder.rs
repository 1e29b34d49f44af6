//! Fluent builder for constructing a [`DispatchSim`].

use ed_core::{DispatchConfig, SimTime};
use ed_kernel::Kernel;
use ed_model::{CallGenerator, DispatchWorld, spawn_staff};
use log::info;

use crate::{DispatchSim, SimResult, StopHandle};

/// Fluent builder for [`DispatchSim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.without_generator()` | arrivals generated from config   |
/// | `.stop_handle(h)`      | a fresh, unraised `StopHandle`   |
///
/// # Example
///
/// ```rust,ignore
/// let stop = StopHandle::new();
/// let mut sim = SimBuilder::new(DispatchConfig::high_demand())
///     .stop_handle(stop.clone())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    DispatchConfig,
    generator: bool,
    stop:      Option<StopHandle>,
}

impl SimBuilder {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config, generator: true, stop: None }
    }

    /// Disable the call generator; calls enter only through
    /// [`DispatchSim::inject_call`].
    pub fn without_generator(mut self) -> Self {
        self.generator = false;
        self
    }

    /// Share an existing stop flag, e.g. one raised from another thread.
    pub fn stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Validate the configuration, spawn the generator and every worker, and
    /// return a ready-to-run [`DispatchSim`].
    pub fn build(self) -> SimResult<DispatchSim> {
        let staffing = self.config.staffing.clone();
        let world = DispatchWorld::new(self.config)?;
        let mut kernel = Kernel::new(world);

        // The generator is spawned first so the first call is created before
        // any worker runs.
        if self.generator {
            kernel.spawn(Box::new(CallGenerator::new()));
        }
        spawn_staff(&mut kernel);

        info!(
            "built dispatch sim: {} call-takers, {} STCs, {} ambulances, {} reassessors, generator {}",
            staffing.call_takers,
            staffing.stcs,
            staffing.ambulances,
            staffing.reassessors,
            if self.generator { "on" } else { "off" },
        );
        Ok(DispatchSim::new(kernel, self.stop.unwrap_or_default(), SimTime::ZERO))
    }
}
