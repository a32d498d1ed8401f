//! Hosts that deliver frame and timer callbacks to effects
//!
//! - `virtual_host`: deterministic clock and recording canvas (tests, native runs)
//! - `web`: browser canvas 2D context; callbacks are materialized by the entry point
//! - `callbacks`: keeps browser closures alive until they run or are cancelled

pub mod callbacks;
pub mod virtual_host;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use callbacks::CallbackSlots;
pub use virtual_host::{HostEvent, VirtualHost, VirtualScheduler};
