//! Background simulation driver and render notifications

pub mod render;
pub mod runner;

pub use render::{NoRender, RenderSink};
pub use runner::{LoopError, LoopState, SimulationLoop, DEFAULT_PERIOD};
