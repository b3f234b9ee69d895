//! The seam between the device bridge and the graphics API.

use std::fmt;

use crate::handle::{DeviceHandle, ObjectHandle, ResourceHandle, TextureHandle, ViewHandle};

/// A raw `HRESULT` status code.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct HResult(pub i32);

impl HResult {
    pub const S_OK: HResult = HResult(0);
    /// Unspecified failure (`0x80004005`).
    pub const E_FAIL: HResult = HResult(0x8000_4005_u32 as i32);

    pub fn is_ok(self) -> bool {
        self.0 >= 0
    }

    pub fn is_err(self) -> bool {
        !self.is_ok()
    }
}

impl fmt::Debug for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HResult({:#010x})", self.0 as u32)
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0 as u32)
    }
}

/// Parameters of a 2D shader-resource view.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderViewDesc {
    /// Raw `DXGI_FORMAT` code, passed through untouched.
    pub format: i32,
    pub most_detailed_mip: u32,
    /// Number of mips, or [`ShaderViewDesc::ALL_MIP_LEVELS`].
    pub mip_levels: u32,
}

impl ShaderViewDesc {
    /// D3D's `-1`: every mip from `most_detailed_mip` down.
    pub const ALL_MIP_LEVELS: u32 = u32::MAX;

    /// A view over a whole texture with `texture_mip_levels` mips.
    ///
    /// A texture created with a mip count of zero has a full chain, which the
    /// view must request with the sentinel rather than an explicit count.
    pub fn texture2d(format: i32, texture_mip_levels: u32) -> Self {
        Self {
            format,
            most_detailed_mip: 0,
            mip_levels: match texture_mip_levels {
                0 => Self::ALL_MIP_LEVELS,
                n => n,
            },
        }
    }
}

/// The graphics API operations the bridge forwards to.
///
/// Handles given to a driver are valid for the duration of the call (see
/// [`GpuHandle::from_raw`](crate::GpuHandle::from_raw)). Handles a driver
/// returns carry one reference owned by the receiver.
pub trait GraphicsDriver {
    /// An owned reference to a device's immediate context. Dropping it
    /// releases the reference.
    type Context;

    /// Fetch `device`'s immediate context, or `None` if the driver refuses.
    fn immediate_context(&self, device: DeviceHandle) -> Option<Self::Context>;

    /// Copy the whole of `src` into `dest` on `context`.
    fn copy_resource(&self, context: &Self::Context, dest: ResourceHandle, src: ResourceHandle);

    /// The device that created `resource`, as a new owned reference.
    fn owning_device(&self, resource: ResourceHandle) -> Option<DeviceHandle>;

    /// Mip count recorded in the texture's description.
    fn texture_mip_levels(&self, texture: TextureHandle) -> u32;

    /// Create a view on `device`. The returned view is owned by the caller.
    fn create_shader_view(
        &self,
        device: DeviceHandle,
        texture: TextureHandle,
        desc: &ShaderViewDesc,
    ) -> Result<ViewHandle, HResult>;

    /// Drop one reference to `object`.
    fn release(&self, object: ObjectHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mips_requests_the_full_chain() {
        let desc = ShaderViewDesc::texture2d(28, 0);
        assert_eq!(desc.mip_levels, ShaderViewDesc::ALL_MIP_LEVELS);
        assert_eq!(desc.mip_levels as i32, -1);
        assert_eq!(desc.most_detailed_mip, 0);
        assert_eq!(desc.format, 28);
    }

    #[test]
    fn explicit_mips_are_kept() {
        assert_eq!(ShaderViewDesc::texture2d(29, 1).mip_levels, 1);
        assert_eq!(ShaderViewDesc::texture2d(29, 11).mip_levels, 11);
    }

    #[test]
    fn hresult_sign_decides_success() {
        assert!(HResult::S_OK.is_ok());
        assert!(HResult(1).is_ok());
        assert!(HResult::E_FAIL.is_err());
        assert_eq!(HResult::E_FAIL.to_string(), "0x80004005");
        assert_eq!(format!("{:?}", HResult::E_FAIL), "HResult(0x80004005)");
    }
}
