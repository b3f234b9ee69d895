//! In-process stand-in for the Unity interface registry.
//!
//! The registry's function table carries no user data, so host state lives
//! in a thread local. Each test builds its own [`FakeHost`] on its own thread.

use std::cell::RefCell;
use std::ffi::c_void;

use crate::ffi::*;
use crate::interfaces::{DeviceEvent, Renderer, UnityInterfaces};

#[derive(Debug, Default)]
struct HostState {
    /// `None` means `IUnityGraphics` is not offered.
    renderer: Option<UnityGfxRenderer>,
    /// `None` means `IUnityGraphicsD3D11` is not offered.
    d3d11_device: Option<*mut c_void>,
    callback: IUnityGraphicsDeviceEventCallback,
    registrations: usize,
    unregistrations: usize,
}

thread_local! {
    static HOST: RefCell<HostState> = RefCell::new(HostState::default());
}

static GRAPHICS: IUnityGraphics = IUnityGraphics {
    GetRenderer: Some(get_renderer),
    RegisterDeviceEventCallback: Some(register_callback),
    UnregisterDeviceEventCallback: Some(unregister_callback),
    ReserveEventIDRange: Some(reserve_event_ids),
};

static GRAPHICS_D3D11: IUnityGraphicsD3D11 = IUnityGraphicsD3D11 {
    GetDevice: Some(get_device),
    TextureFromRenderBuffer: None,
    TextureFromNativeTexture: None,
    RTVFromRenderBuffer: None,
    SRVFromNativeTexture: None,
    GetSwapChain: None,
};

unsafe extern "system" fn get_interface(guid: UnityInterfaceGUID) -> *mut IUnityInterface {
    HOST.with(|host| {
        let host = host.borrow();
        if guid == IUnityGraphics_GUID && host.renderer.is_some() {
            &GRAPHICS as *const IUnityGraphics as *mut IUnityInterface
        } else if guid == IUnityGraphicsD3D11_GUID && host.d3d11_device.is_some() {
            &GRAPHICS_D3D11 as *const IUnityGraphicsD3D11 as *mut IUnityInterface
        } else {
            std::ptr::null_mut()
        }
    })
}

unsafe extern "system" fn get_renderer() -> UnityGfxRenderer {
    HOST.with(|host| host.borrow().renderer.unwrap_or(kUnityGfxRendererNull))
}

unsafe extern "system" fn register_callback(callback: IUnityGraphicsDeviceEventCallback) {
    HOST.with(|host| {
        let mut host = host.borrow_mut();
        host.callback = callback;
        host.registrations += 1;
    })
}

unsafe extern "system" fn unregister_callback(callback: IUnityGraphicsDeviceEventCallback) {
    HOST.with(|host| {
        let mut host = host.borrow_mut();
        if host.callback.map(|f| f as usize) == callback.map(|f| f as usize) {
            host.callback = None;
        }
        host.unregistrations += 1;
    })
}

unsafe extern "system" fn reserve_event_ids(_count: std::ffi::c_int) -> std::ffi::c_int {
    0
}

unsafe extern "system" fn get_device() -> *mut c_void {
    HOST.with(|host| host.borrow().d3d11_device.unwrap_or(std::ptr::null_mut()))
}

/// A fake engine offering the graphics interfaces on the current thread.
///
/// Creating a new `FakeHost` resets the thread's host state.
pub struct FakeHost {
    registry: Box<IUnityInterfaces>,
}

impl FakeHost {
    /// A registry that offers no interfaces at all.
    pub fn new() -> Self {
        HOST.with(|host| *host.borrow_mut() = HostState::default());
        Self {
            registry: Box::new(IUnityInterfaces {
                GetInterface: Some(get_interface),
                RegisterInterface: None,
                GetInterfaceSplit: None,
                RegisterInterfaceSplit: None,
            }),
        }
    }

    /// A D3D11 host whose device is `device` (may be null).
    pub fn d3d11(device: *mut c_void) -> Self {
        Self::new().with_renderer(Renderer::D3D11).with_d3d11_device(device)
    }

    /// Offer `IUnityGraphics` reporting `renderer`.
    pub fn with_renderer(self, renderer: Renderer) -> Self {
        HOST.with(|host| host.borrow_mut().renderer = Some(renderer as UnityGfxRenderer));
        self
    }

    /// Offer `IUnityGraphicsD3D11` returning `device`.
    pub fn with_d3d11_device(self, device: *mut c_void) -> Self {
        self.set_d3d11_device(device);
        self
    }

    /// Swap the device the engine reports, e.g. to simulate a device reset.
    pub fn set_d3d11_device(&self, device: *mut c_void) {
        HOST.with(|host| host.borrow_mut().d3d11_device = Some(device));
    }

    pub fn interfaces(&self) -> UnityInterfaces {
        let raw = &*self.registry as *const IUnityInterfaces as *mut IUnityInterfaces;
        // SAFETY: the boxed registry lives as long as `self`.
        unsafe { UnityInterfaces::from_raw(raw) }.expect("boxed registry is non-null")
    }

    pub fn registered_callback(&self) -> IUnityGraphicsDeviceEventCallback {
        HOST.with(|host| host.borrow().callback)
    }

    pub fn registrations(&self) -> usize {
        HOST.with(|host| host.borrow().registrations)
    }

    pub fn unregistrations(&self) -> usize {
        HOST.with(|host| host.borrow().unregistrations)
    }

    /// Deliver `event` to the registered callback, as the engine would.
    /// Returns `false` if nothing is registered.
    pub fn fire(&self, event: DeviceEvent) -> bool {
        match self.registered_callback() {
            Some(callback) => {
                unsafe { callback(event as UnityGfxDeviceEventType) };
                true
            }
            None => false,
        }
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_host_offers_nothing() {
        let host = FakeHost::new();
        let interfaces = host.interfaces();
        assert!(interfaces.graphics().is_none());
        assert!(interfaces.graphics_d3d11().is_none());
    }

    #[test]
    fn d3d11_host_reports_renderer_and_device() {
        let device = 0x1000 as *mut c_void;
        let host = FakeHost::d3d11(device);
        let interfaces = host.interfaces();
        assert_eq!(interfaces.graphics().unwrap().renderer(), Some(Renderer::D3D11));
        assert_eq!(interfaces.graphics_d3d11().unwrap().device(), device);
    }

    thread_local! {
        static SEEN: RefCell<Vec<UnityGfxDeviceEventType>> = const { RefCell::new(Vec::new()) };
    }

    unsafe extern "system" fn record(event: UnityGfxDeviceEventType) {
        SEEN.with(|seen| seen.borrow_mut().push(event));
    }

    #[test]
    fn callbacks_are_registered_and_fired() {
        let host = FakeHost::new().with_renderer(Renderer::Vulkan);
        let graphics = host.interfaces();
        let graphics = graphics.graphics().unwrap();
        assert!(graphics.register_device_event_callback(record));
        assert_eq!(host.registrations(), 1);

        assert!(host.fire(DeviceEvent::Shutdown));
        SEEN.with(|seen| assert_eq!(*seen.borrow(), vec![kUnityGfxDeviceEventShutdown]));

        graphics.unregister_device_event_callback(record);
        assert_eq!(host.unregistrations(), 1);
        assert!(!host.fire(DeviceEvent::Initialize));
    }
}
