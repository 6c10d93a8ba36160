//! Vizij Scroll Core (host-agnostic)
//!
//! Maps a scroll offset onto interpolated property values for any number of
//! independent instances sharing one frame loop. Adapters implement [`Host`]
//! to supply geometry and receive style writes.

pub mod anchor;
pub mod config;
pub mod debounce;
pub mod depth;
pub mod easing;
pub mod engine;
pub mod error;
pub mod host;
pub mod ids;
pub mod instance;
pub mod interp;
pub mod registry;
pub mod scheduler;
pub mod validate;
pub mod value;

// Re-exports for consumers (adapters)
pub use anchor::{Anchor, AnchorExpr, Rect};
pub use config::Config;
pub use debounce::Debounce;
pub use depth::DepthLayer;
pub use easing::{Easing, Timing, TimingFn, UnknownEasing};
pub use engine::ScrollEngine;
pub use error::ScrollError;
pub use host::{Host, StyleSink};
pub use ids::InstanceId;
pub use instance::{
    BoundaryEvent, Callback, DataSnapshot, Instance, InstanceConfig, PropConfig, PropConfigs,
    PropSnapshot, PropSpec, Props, ScrollData, StyleTarget, TimingInput,
};
pub use interp::{compute, interpolate, Frame, Progress};
pub use registry::Registry;
pub use scheduler::{FrameOutcome, FrameScheduler, FrameStats, SchedulerState};
pub use validate::{validate, ConfigError};
pub use value::{AnchorValue, RawValue, MAX_PRECISION};
