//! Unity native plugin interface, hand-declared.
//!
//! - [`ffi`] mirrors the C headers: GUIDs, renderer and device event codes,
//!   and the `#[repr(C)]` interface tables.
//! - [`UnityInterfaces`] is a safe view of the registry Unity passes to
//!   `UnityPluginLoad`, with typed accessors for [`Graphics`] and
//!   [`GraphicsD3D11`].
//! - [`log`] installs the `tracing` subscriber plugins log through.
//!
//! With the `test-util` feature, [`fake::FakeHost`] provides an in-process
//! registry for tests.

pub mod ffi;
mod interfaces;
pub mod log;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use interfaces::*;
