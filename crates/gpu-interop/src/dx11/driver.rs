//! [`GraphicsDriver`] over the host's D3D11 objects.
//!
//! Every handle is reinterpreted as the COM interface its kind names and
//! borrowed for the call; nothing is created here except the references
//! handed back to the caller.

use std::ffi::c_void;

use tracing::{debug, warn};
use windows::core::{IUnknown, Interface};
use windows::Win32::Graphics::Direct3D::D3D_SRV_DIMENSION_TEXTURE2D;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT;

use crate::driver::{GraphicsDriver, HResult, ShaderViewDesc};
use crate::handle::{
    DeviceHandle, GpuHandle, ObjectHandle, ResourceHandle, TextureHandle, ViewHandle,
};

/// Borrow the object behind a handle as COM interface `T`.
///
/// The handle kind guarantees a live object of a type deriving from `T`.
fn borrow_as<T: Interface>(raw: &*mut c_void) -> Option<&T> {
    // SAFETY: `raw` is null or comes from a tagged handle, so it points at a
    // live object implementing `T`; the borrow cannot outlive `raw`.
    unsafe { T::from_raw_borrowed(raw) }
}

/// D3D11 driver. Stateless: the bridge owns the binding.
#[derive(Debug, Default, Clone, Copy)]
pub struct D3d11Driver;

impl GraphicsDriver for D3d11Driver {
    type Context = ID3D11DeviceContext;

    fn immediate_context(&self, device: DeviceHandle) -> Option<ID3D11DeviceContext> {
        let raw = device.as_raw();
        let device = borrow_as::<ID3D11Device>(&raw)?;
        unsafe { device.GetImmediateContext() }
            .inspect_err(|e| warn!("GetImmediateContext failed: {e}"))
            .ok()
    }

    fn copy_resource(
        &self,
        context: &ID3D11DeviceContext,
        dest: ResourceHandle,
        src: ResourceHandle,
    ) {
        let (dest, src) = (dest.as_raw(), src.as_raw());
        let (Some(dest), Some(src)) = (
            borrow_as::<ID3D11Resource>(&dest),
            borrow_as::<ID3D11Resource>(&src),
        ) else {
            return;
        };
        unsafe { context.CopyResource(dest, src) };
    }

    fn owning_device(&self, resource: ResourceHandle) -> Option<DeviceHandle> {
        let raw = resource.as_raw();
        let resource = borrow_as::<ID3D11Resource>(&raw)?;
        let device = unsafe { resource.GetDevice() }
            .inspect_err(|e| debug!("GetDevice failed: {e}"))
            .ok()?;
        // The AddRef from GetDevice moves to the caller.
        unsafe { DeviceHandle::from_raw(device.into_raw()) }
    }

    fn texture_mip_levels(&self, texture: TextureHandle) -> u32 {
        let raw = texture.as_raw();
        let Some(texture) = borrow_as::<ID3D11Texture2D>(&raw) else {
            return 0;
        };
        let mut desc = D3D11_TEXTURE2D_DESC::default();
        unsafe { texture.GetDesc(&mut desc) };
        desc.MipLevels
    }

    fn create_shader_view(
        &self,
        device: DeviceHandle,
        texture: TextureHandle,
        desc: &ShaderViewDesc,
    ) -> Result<ViewHandle, HResult> {
        let (device, texture) = (device.as_raw(), texture.as_raw());
        let device = borrow_as::<ID3D11Device>(&device).ok_or(HResult::E_FAIL)?;
        let texture = borrow_as::<ID3D11Texture2D>(&texture).ok_or(HResult::E_FAIL)?;

        let srv_desc = D3D11_SHADER_RESOURCE_VIEW_DESC {
            Format: DXGI_FORMAT(desc.format),
            ViewDimension: D3D_SRV_DIMENSION_TEXTURE2D,
            Anonymous: D3D11_SHADER_RESOURCE_VIEW_DESC_0 {
                Texture2D: D3D11_TEX2D_SRV {
                    MostDetailedMip: desc.most_detailed_mip,
                    MipLevels: desc.mip_levels,
                },
            },
        };
        let mut view = None;
        unsafe {
            device.CreateShaderResourceView(
                texture,
                Some(&srv_desc as *const _),
                Some(&mut view as *mut _),
            )
        }
        .map_err(|e| HResult(e.code().0))?;

        let view: ID3D11ShaderResourceView = view.ok_or(HResult::E_FAIL)?;
        // Ownership of the new view moves to the caller.
        unsafe { ViewHandle::from_raw(view.into_raw()) }.ok_or(HResult::E_FAIL)
    }

    fn release(&self, object: ObjectHandle) {
        // Rebuilding an owned IUnknown and dropping it performs one Release.
        drop(unsafe { IUnknown::from_raw(object.as_raw()) });
    }
}
