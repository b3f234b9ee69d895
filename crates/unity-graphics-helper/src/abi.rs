//! Raw-pointer adapters behind the exported entry points.
//!
//! The host passes untyped pointers; these functions turn them into tagged
//! handles (null becomes `None`) and results back into raw pointers. They
//! check nothing beyond null: the host promises every non-null pointer is a
//! live object of the kind the entry point names.

use std::ffi::c_void;

use gpu_interop::{
    handle_from_raw, handle_into_raw, DeviceHandle, GraphicsDriver, HResult, ObjectHandle,
    ResourceHandle, TextureHandle,
};
use unity_plugin_api::DeviceEvent;

use crate::helper::GraphicsHelper;

/// # Safety
///
/// `device` must be null or a live `ID3D11Device*` that outlives the binding.
pub unsafe fn set_device<D: GraphicsDriver>(helper: &mut GraphicsHelper<D>, device: *mut c_void) {
    let device = unsafe { handle_from_raw::<DeviceHandle>(device) };
    helper.bridge_mut().set_device(device);
}

pub fn device<D: GraphicsDriver>(helper: &GraphicsHelper<D>) -> *mut c_void {
    handle_into_raw(helper.bridge().device())
}

/// Returns a new reference the host must release, or null.
///
/// # Safety
///
/// `resource` must be null or a live `ID3D11Resource*`.
pub unsafe fn device_from_resource<D: GraphicsDriver>(
    helper: &GraphicsHelper<D>,
    resource: *mut c_void,
) -> *mut c_void {
    let resource = unsafe { handle_from_raw::<ResourceHandle>(resource) };
    handle_into_raw(helper.bridge().owning_device(resource))
}

/// # Safety
///
/// `dest` and `src` must each be null or a live `ID3D11Resource*` on the
/// bound device, compatible with each other.
pub unsafe fn copy_resource<D: GraphicsDriver>(
    helper: &GraphicsHelper<D>,
    dest: *mut c_void,
    src: *mut c_void,
) {
    let dest = unsafe { handle_from_raw::<ResourceHandle>(dest) };
    let src = unsafe { handle_from_raw::<ResourceHandle>(src) };
    helper.bridge().copy_resource(dest, src);
}

/// Create a view and store it in `*out_view` (null on failure). `out_view`
/// itself may be null, in which case a created view is released again.
///
/// # Safety
///
/// `texture` must be null or a live `ID3D11Texture2D*`; `out_view` must be
/// null or valid for a pointer-sized write.
pub unsafe fn create_shader_view<D: GraphicsDriver>(
    helper: &GraphicsHelper<D>,
    texture: *mut c_void,
    format: i32,
    out_view: *mut *mut c_void,
) -> i32 {
    let texture = unsafe { handle_from_raw::<TextureHandle>(texture) };
    let (code, view) = match helper.bridge().create_shader_view(texture, format) {
        Ok(view) => (HResult::S_OK, Some(view)),
        Err(code) => (code, None),
    };

    match unsafe { out_view.as_mut() } {
        Some(slot) => *slot = handle_into_raw(view),
        None => helper.bridge().release(view.map(|view| view.as_object())),
    }
    code.0
}

/// # Safety
///
/// `object` must be null or a live `IUnknown*` the host holds a reference to.
pub unsafe fn release<D: GraphicsDriver>(helper: &GraphicsHelper<D>, object: *mut c_void) {
    let object = unsafe { handle_from_raw::<ObjectHandle>(object) };
    helper.bridge().release(object);
}

/// Dispatch a raw device event code. Unknown codes are ignored.
pub fn device_event<D: GraphicsDriver>(helper: &mut GraphicsHelper<D>, event: i32) {
    match DeviceEvent::from_raw(event) {
        Some(event) => helper.on_device_event(event),
        None => tracing::debug!(event, "ignoring unknown device event"),
    }
}
