//! Drives the helper the way the engine and the mod do: plugin load, device
//! events through the registered callback, mod calls through raw pointers,
//! and unload.

use std::cell::RefCell;
use std::ffi::c_void;

use gpu_interop::mock::{fake_handle, MockDriver};
use gpu_interop::{DeviceHandle, ShaderViewDesc};
use unity_graphics_helper::{abi, GraphicsHelper};
use unity_plugin_api::fake::FakeHost;
use unity_plugin_api::ffi::UnityGfxDeviceEventType;
use unity_plugin_api::{DeviceEvent, Renderer};

thread_local! {
    static HELPER: RefCell<Option<GraphicsHelper<MockDriver>>> = const { RefCell::new(None) };
}

unsafe extern "system" fn on_event(event: UnityGfxDeviceEventType) {
    HELPER.with(|helper| {
        if let Some(helper) = helper.borrow_mut().as_mut() {
            abi::device_event(helper, event);
        }
    });
}

fn with_helper<R>(f: impl FnOnce(&mut GraphicsHelper<MockDriver>) -> R) -> R {
    HELPER.with(|helper| f(helper.borrow_mut().as_mut().expect("helper installed")))
}

fn install() -> MockDriver {
    let driver = MockDriver::new();
    HELPER.with(|helper| *helper.borrow_mut() = Some(GraphicsHelper::new(driver.clone())));
    driver
}

fn raw(id: usize) -> *mut c_void {
    id as *mut c_void
}

#[test]
fn engine_lifecycle_with_device_reset() {
    let driver = install();
    let host = FakeHost::d3d11(raw(0x100));

    with_helper(|helper| helper.on_load(host.interfaces(), Some(on_event)));
    assert_eq!(with_helper(|helper| abi::device(helper)), raw(0x100));
    assert_eq!(host.registrations(), 1);

    // The engine recreates its device.
    assert!(host.fire(DeviceEvent::Shutdown));
    assert!(with_helper(|helper| abi::device(helper)).is_null());
    host.set_d3d11_device(raw(0x200));
    assert!(host.fire(DeviceEvent::Initialize));
    assert_eq!(with_helper(|helper| abi::device(helper)), raw(0x200));

    let calls = driver.calls();
    let fetched: Vec<DeviceHandle> = vec![fake_handle(0x100), fake_handle(0x200)];
    assert_eq!(calls.context_fetches, fetched);
    assert_eq!(calls.context_releases, 1);

    with_helper(|helper| helper.on_unload());
    assert_eq!(driver.calls().context_releases, 2);
    assert_eq!(host.unregistrations(), 1);
    assert!(!host.fire(DeviceEvent::Initialize));
}

#[test]
fn mod_supplies_device_when_plugin_load_never_binds() {
    let driver = install();
    // Loaded through DllImport on a D3D12 engine: nothing gets bound at load.
    let host = FakeHost::new().with_renderer(Renderer::D3D12);
    with_helper(|helper| helper.on_load(host.interfaces(), Some(on_event)));
    assert!(with_helper(|helper| abi::device(helper)).is_null());

    // The mod falls back to the device that owns one of its textures.
    driver.set_owning_device(Some(fake_handle(0x700)));
    let owner = with_helper(|helper| unsafe { abi::device_from_resource(helper, raw(0x40)) });
    assert_eq!(owner, raw(0x700));

    with_helper(|helper| unsafe { abi::set_device(helper, owner) });
    with_helper(|helper| unsafe { abi::set_device(helper, owner) });
    assert_eq!(driver.calls().context_fetches.len(), 1);

    // Views over swapchain images, then copies into them.
    driver.set_mip_levels(1);
    let mut view = std::ptr::null_mut();
    let code =
        with_helper(|helper| unsafe { abi::create_shader_view(helper, raw(0x50), 29, &mut view) });
    assert_eq!(code, 0);
    assert!(!view.is_null());
    let request = driver.calls().view_requests[0].2;
    assert_eq!(request, ShaderViewDesc::texture2d(29, 1));

    with_helper(|helper| unsafe { abi::copy_resource(helper, raw(0x50), raw(0x60)) });
    assert_eq!(driver.calls().copies.len(), 1);

    with_helper(|helper| unsafe {
        abi::release(helper, view);
        abi::release(helper, owner);
    });
    assert_eq!(driver.calls().releases.len(), 2);

    with_helper(|helper| helper.on_unload());
    assert!(with_helper(|helper| abi::device(helper)).is_null());
    assert_eq!(driver.calls().context_releases, 1);
}
