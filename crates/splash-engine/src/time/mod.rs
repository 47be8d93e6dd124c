//! Time subsystem.
//!
//! Stable frame timing without coupling to the runtime. The runtime ticks one
//! `FrameClock` per presented frame and hands the resulting `FrameTime` to the
//! application through the frame context.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
