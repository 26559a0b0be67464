/// Interval clock for the state machine.
pub mod clock;
pub mod engine;
pub mod kpi;
/// Arrival and charging-demand samplers.
pub mod sampler;
/// Fleet-size sweep driver.
pub mod sweep;
pub mod types;
pub mod window;
