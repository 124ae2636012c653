//! Polling handlers
//!
//! A handler owns exactly one target on one gateway (a device, a whole cube,
//! or a cube's duty cycle) and one snapshot slot. Any number of entities may
//! share a handler; `update()` decides whether a network round trip actually
//! happens, so the fetch rate per handler is bounded by its scan interval no
//! matter how many readers poll it.

mod cache;
mod cube;
mod device;
mod duty;

pub use cache::{FAILURE_BACKOFF_FACTOR, PollingCache, UpdateOutcome};
pub use cube::CubeHandler;
pub use device::DeviceHandler;
pub use duty::CubeDutyHandler;
