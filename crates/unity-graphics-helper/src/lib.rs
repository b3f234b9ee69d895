//! Native D3D11 helper for a Unity-hosted mod.
//!
//! This crate ties together [`unity_plugin_api`] (host interfaces and
//! logging) and [`gpu_interop`] (device binding and resource interop) into
//! the native library the mod loads.
//!
//! # Overview
//!
//! - [`GraphicsHelper`] owns the device binding and follows the host's
//!   plugin and device lifecycle.
//! - [`abi`] converts the raw pointers crossing the boundary into typed
//!   handles and back.
//! - [`host_lock`] serializes the exports and the host's device events.
//! - On Windows, `exports` provides the C entry points around a single
//!   process-wide [`GraphicsHelper`].

pub mod abi;
pub mod helper;
pub mod host_lock;

#[cfg(target_os = "windows")]
#[allow(non_snake_case)]
mod exports;

pub use helper::GraphicsHelper;
