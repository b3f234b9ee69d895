//! Exported entry points.
//!
//! Unity calls `UnityPluginLoad`/`UnityPluginUnload` itself; the rest are
//! bound by the managed mod through `DllImport` with the cdecl convention.
//! Each export locks the process-wide [`GraphicsHelper`] for the call.

use std::ffi::c_void;

use gpu_interop::dx11::D3d11Driver;
use once_cell::sync::Lazy;
use unity_plugin_api::ffi::{IUnityInterfaces, UnityGfxDeviceEventType};
use unity_plugin_api::log::{init_logging, LogConfig};
use unity_plugin_api::UnityInterfaces;

use crate::abi;
use crate::helper::GraphicsHelper;
use crate::host_lock::HostLock;

struct HostState(GraphicsHelper<D3d11Driver>);

// SAFETY: the COM pointers inside are only touched while the lock is held,
// and D3D11 device and immediate context calls are serialized by it.
unsafe impl Send for HostState {}

static HELPER: Lazy<HostLock<HostState>> = Lazy::new(|| {
    init_logging(&LogConfig::from_env());
    HostLock::new(HostState(GraphicsHelper::new(D3d11Driver)))
});

fn with_helper<R>(f: impl FnOnce(&mut GraphicsHelper<D3d11Driver>) -> R) -> R {
    HELPER.with(|state| f(&mut state.0))
}

unsafe extern "system" fn on_graphics_device_event(event: UnityGfxDeviceEventType) {
    HELPER.with_device_event(event, |state, event| abi::device_event(&mut state.0, event));
}

#[no_mangle]
pub unsafe extern "system" fn UnityPluginLoad(interfaces: *mut IUnityInterfaces) {
    let Some(host) = (unsafe { UnityInterfaces::from_raw(interfaces) }) else {
        return;
    };
    HELPER.with_loading(|state| state.0.on_load(host, Some(on_graphics_device_event)));
}

#[no_mangle]
pub unsafe extern "system" fn UnityPluginUnload() {
    with_helper(|helper| helper.on_unload());
}

#[no_mangle]
pub unsafe extern "C" fn SetDevicePointerFromCSharp(device: *mut c_void) {
    with_helper(|helper| unsafe { abi::set_device(helper, device) });
}

#[no_mangle]
pub extern "C" fn GetD3D11Device() -> *mut c_void {
    with_helper(|helper| abi::device(helper))
}

#[no_mangle]
pub unsafe extern "C" fn GetDeviceFromResource(resource: *mut c_void) -> *mut c_void {
    with_helper(|helper| unsafe { abi::device_from_resource(helper, resource) })
}

#[no_mangle]
pub unsafe extern "C" fn DirectCopyResource(dest: *mut c_void, src: *mut c_void) {
    with_helper(|helper| unsafe { abi::copy_resource(helper, dest, src) });
}

#[no_mangle]
pub unsafe extern "C" fn CreateAndRegisterSRV(
    texture: *mut c_void,
    format: i32,
    out_view: *mut *mut c_void,
) -> i32 {
    with_helper(|helper| unsafe { abi::create_shader_view(helper, texture, format, out_view) })
}

#[no_mangle]
pub unsafe extern "C" fn ReleaseNativeObject(object: *mut c_void) {
    with_helper(|helper| unsafe { abi::release(helper, object) });
}
