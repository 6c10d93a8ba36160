//! Engine: owns the host, the instance registry and the shared frame loop state.
//!
//! Methods:
//! - create, start, stop, update, calculate, destroy (per-instance handle API)
//! - notify_resize / handle_resize (debounced recompute of tracked instances)
//! - tick (one display frame: resize flush → idle check → scroll gate → apply)

use log::{debug, trace, warn};

use crate::config::Config;
use crate::debounce::Debounce;
use crate::error::ScrollError;
use crate::host::Host;
use crate::ids::InstanceId;
use crate::instance::{BoundaryEvent, DataSnapshot, Instance, InstanceConfig, Props, ScrollData};
use crate::interp::{compute, Frame};
use crate::registry::Registry;
use crate::scheduler::{FrameOutcome, FrameScheduler, FrameStats, SchedulerState};
use crate::validate::validate;
use crate::value::MAX_PRECISION;

pub struct ScrollEngine<H: Host> {
    cfg: Config,
    host: H,
    registry: Registry<H::Element>,
    scheduler: FrameScheduler,
    resize: Debounce,
}

impl<H: Host> ScrollEngine<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, Config::default())
    }

    /// `cfg.precision` is capped at [`MAX_PRECISION`].
    pub fn with_config(host: H, mut cfg: Config) -> Self {
        cfg.precision = cfg.precision.min(MAX_PRECISION);
        let resize = Debounce::new(cfg.resize_debounce_ms);
        Self {
            cfg,
            host,
            registry: Registry::new(),
            scheduler: FrameScheduler::new(),
            resize,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access (swap the scrolling root, adjust test geometry, ...).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &Registry<H::Element> {
        &self.registry
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state(self.registry.active_count())
    }

    // ---------- Instances ----------

    /// Validate `config` against current geometry and register it. The new
    /// instance starts stopped. Nothing is registered when validation fails.
    pub fn create(&mut self, config: InstanceConfig<H::Element>) -> Result<InstanceId, ScrollError> {
        let data = validate(&config, &self.host)?;
        let id = self.registry.insert(Instance::new(config, data));
        debug!("scroll instance {id} created ({} slots)", self.registry.len());
        Ok(id)
    }

    pub fn start(&mut self, id: InstanceId) -> Result<(), ScrollError> {
        self.set_active(id, true)
    }

    pub fn stop(&mut self, id: InstanceId) -> Result<(), ScrollError> {
        self.set_active(id, false)
    }

    fn set_active(&mut self, id: InstanceId, active: bool) -> Result<(), ScrollError> {
        let was_idle = self.registry.active_count() == 0;
        if self.registry.set_active(id, active) {
            // Leaving idle: the next frame paints even at an unchanged offset.
            if active && was_idle {
                self.scheduler.reset();
            }
            Ok(())
        } else {
            Err(ScrollError::NoSuchInstance(id))
        }
    }

    pub fn is_active(&self, id: InstanceId) -> Result<bool, ScrollError> {
        Ok(self.instance(id)?.is_active())
    }

    pub fn data(&self, id: InstanceId) -> Result<&ScrollData<H::Element>, ScrollError> {
        Ok(self.instance(id)?.data())
    }

    pub fn snapshot(&self, id: InstanceId) -> Result<DataSnapshot, ScrollError> {
        Ok(self.instance(id)?.data().snapshot())
    }

    fn instance(&self, id: InstanceId) -> Result<&Instance<H::Element>, ScrollError> {
        self.registry.get(id).ok_or(ScrollError::NoSuchInstance(id))
    }

    /// Re-validate the stored config against current geometry. On failure the
    /// previous data is kept.
    pub fn calculate(&mut self, id: InstanceId) -> Result<(), ScrollError> {
        let inst = self
            .registry
            .get_mut(id)
            .ok_or(ScrollError::NoSuchInstance(id))?;
        inst.data = validate(&inst.config, &self.host)?;
        Ok(())
    }

    /// Interpolate at the current scroll offset, fire the boundary callback and
    /// write the styles, regardless of the scroll gate or the active flag.
    pub fn update(&mut self, id: InstanceId) -> Result<Props, ScrollError> {
        let inst = self
            .registry
            .get(id)
            .ok_or(ScrollError::NoSuchInstance(id))?;
        let scroll_top = self.host.scroll_top();
        Ok(apply(
            &mut self.host,
            id,
            &inst.data,
            scroll_top,
            self.cfg.precision,
        ))
    }

    /// Tombstone the slot. Other handles are unaffected.
    pub fn destroy(&mut self, id: InstanceId) -> Result<(), ScrollError> {
        self.registry
            .remove(id)
            .ok_or(ScrollError::NoSuchInstance(id))?;
        debug!("scroll instance {id} destroyed");
        Ok(())
    }

    pub fn active_ids(&self) -> Vec<InstanceId> {
        self.registry.active_ids()
    }

    pub fn tracked_ids(&self) -> Vec<InstanceId> {
        self.registry.tracked_ids()
    }

    // ---------- Resize ----------

    /// Record a resize at `now_ms`. Tracked instances are recalculated on the
    /// first tick after the quiet period.
    pub fn notify_resize(&mut self, now_ms: f64) {
        self.resize.trigger(now_ms);
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Recalculate and update every tracked instance now, cancelling any
    /// pending debounce. Returns how many recalculated successfully.
    pub fn handle_resize(&mut self) -> usize {
        self.resize.cancel();
        let mut recalculated = 0;
        for id in self.registry.tracked_ids() {
            match self.calculate(id) {
                Ok(()) => recalculated += 1,
                Err(err) => warn!("scroll instance {id} kept previous geometry: {err}"),
            }
            if let Err(err) = self.update(id) {
                warn!("scroll instance {id} could not be updated after resize: {err}");
            }
        }
        debug!("resize flushed: {recalculated} tracked instance(s) recalculated");
        recalculated
    }

    // ---------- Frame loop ----------

    /// Run one display frame at host time `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> FrameStats {
        let recalculated = if self.resize.poll(now_ms) {
            self.handle_resize()
        } else {
            0
        };

        if self.registry.active_count() == 0 {
            return FrameStats {
                outcome: FrameOutcome::Idle,
                recalculated,
            };
        }

        let scroll_top = self.host.scroll_top();
        if !self.scheduler.observe(scroll_top) {
            return FrameStats {
                outcome: FrameOutcome::Unchanged,
                recalculated,
            };
        }

        let precision = self.cfg.precision;
        let mut instances = 0;
        for (id, inst) in self.registry.iter_active() {
            apply(&mut self.host, id, &inst.data, scroll_top, precision);
            instances += 1;
        }
        trace!("frame at scroll {scroll_top}: {instances} instance(s) updated");

        FrameStats {
            outcome: FrameOutcome::Updated { instances },
            recalculated,
        }
    }
}

/// Compute one instance at `scroll_top`, fire exactly one boundary callback
/// and write the props to the resolved style target.
fn apply<H: Host>(
    host: &mut H,
    id: InstanceId,
    data: &ScrollData<H::Element>,
    scroll_top: f64,
    precision: u32,
) -> Props {
    let Frame { progress, props } = compute(data, scroll_top, precision);

    let event = BoundaryEvent {
        id,
        progress,
        props: &props,
    };
    if progress.is_inside() {
        (data.inside)(&event);
    } else {
        (data.outside)(&event);
    }

    for (key, value) in &props {
        host.set_property(data.target.sink(data.elem.as_ref()), key, value);
    }
    props
}
