//! I/O Devices.
//!
//! SIC/XE devices are addressed by a one-byte device number, written here as
//! its two hex digits (`F1`, `05`). This module maps those names onto
//! byte-oriented files through the [`DeviceGateway`].

/// Lazily opened, file-backed device handles.
pub mod gateway;

pub use gateway::DeviceGateway;

/// Formats a device number as the two-character device name.
pub fn device_name(number: u8) -> String {
    format!("{number:02X}")
}
