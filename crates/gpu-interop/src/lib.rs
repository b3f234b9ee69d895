//! Device binding and resource interop for a host-owned GPU device.
//!
//! This crate defines the [`DeviceBridge`], which holds the device the host
//! renders with and forwards resource copies, view creation, device queries
//! and reference releases to it through a [`GraphicsDriver`]. On Windows the
//! driver is [`dx11::D3d11Driver`]; tests use [`mock::MockDriver`].

pub mod bridge;
pub mod driver;
pub mod handle;

pub use bridge::DeviceBridge;
pub use driver::{GraphicsDriver, HResult, ShaderViewDesc};
pub use handle::{
    handle_from_raw, handle_into_raw, DeviceHandle, GpuHandle, ObjectHandle, ResourceHandle,
    TextureHandle, ViewHandle,
};

// Platform-specific implementations.

#[cfg(target_os = "windows")]
pub mod dx11;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;
