//! Time subsystem.
//!
//! Provides the monotonic clock that drives animation. Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick()` once per frame and feed `elapsed_ms` to the light orbit

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
