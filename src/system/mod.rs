//! Host platform probes.
//!
//! Read-only accessors computed per call: battery state from the power-supply
//! interface and platform/app version strings. Nothing here is persisted.

pub mod battery;
pub mod info;

pub use battery::{read_battery, BatteryReading};
