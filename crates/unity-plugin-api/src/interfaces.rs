//! Interfaces the host hands to your plugin

use std::ffi::c_void;
use std::ptr::NonNull;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::ffi::*;

/// A Unity interface that can be looked up in the registry by GUID.
pub trait UnityInterface {
    const GUID: UnityInterfaceGUID;
}

impl UnityInterface for IUnityGraphics {
    const GUID: UnityInterfaceGUID = IUnityGraphics_GUID;
}

impl UnityInterface for IUnityGraphicsD3D11 {
    const GUID: UnityInterfaceGUID = IUnityGraphicsD3D11_GUID;
}

/// Graphics backend the engine is running on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum Renderer {
    D3D11 = kUnityGfxRendererD3D11 as isize,
    Null = kUnityGfxRendererNull as isize,
    OpenGLES30 = kUnityGfxRendererOpenGLES30 as isize,
    PS4 = kUnityGfxRendererPS4 as isize,
    XboxOne = kUnityGfxRendererXboxOne as isize,
    Metal = kUnityGfxRendererMetal as isize,
    OpenGLCore = kUnityGfxRendererOpenGLCore as isize,
    D3D12 = kUnityGfxRendererD3D12 as isize,
    Vulkan = kUnityGfxRendererVulkan as isize,
    Nvn = kUnityGfxRendererNvn as isize,
    XboxOneD3D12 = kUnityGfxRendererXboxOneD3D12 as isize,
    GameCoreXboxOne = kUnityGfxRendererGameCoreXboxOne as isize,
    GameCoreXboxSeries = kUnityGfxRendererGameCoreXboxSeries as isize,
    PS5 = kUnityGfxRendererPS5 as isize,
    PS5NGGC = kUnityGfxRendererPS5NGGC as isize,
}

impl Renderer {
    pub fn from_raw(raw: UnityGfxRenderer) -> Option<Self> {
        Self::from_i32(raw)
    }
}

/// Device lifecycle notification delivered to a registered callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum DeviceEvent {
    Initialize = kUnityGfxDeviceEventInitialize as isize,
    Shutdown = kUnityGfxDeviceEventShutdown as isize,
    BeforeReset = kUnityGfxDeviceEventBeforeReset as isize,
    AfterReset = kUnityGfxDeviceEventAfterReset as isize,
}

impl DeviceEvent {
    pub fn from_raw(raw: UnityGfxDeviceEventType) -> Option<Self> {
        Self::from_i32(raw)
    }
}

/// Callback signature accepted by [`Graphics::register_device_event_callback`].
pub type DeviceEventCallback = unsafe extern "system" fn(event_type: UnityGfxDeviceEventType);

/// The host's interface registry.
///
/// Unity keeps the registry alive for the lifetime of the process, so the
/// handle is `Copy` and can be retained past `UnityPluginLoad`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnityInterfaces {
    raw: NonNull<IUnityInterfaces>,
}

impl UnityInterfaces {
    /// Wrap the pointer received by `UnityPluginLoad`. Returns `None` for null.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point to a registry that outlives every use of
    /// the returned value.
    pub unsafe fn from_raw(raw: *mut IUnityInterfaces) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw })
    }

    pub fn as_raw(&self) -> *mut IUnityInterfaces {
        self.raw.as_ptr()
    }

    /// Look up an interface by its GUID.
    pub fn get<T: UnityInterface>(&self) -> Option<&T> {
        let registry = unsafe { self.raw.as_ref() };
        let ptr = if let Some(get) = registry.GetInterface {
            unsafe { get(T::GUID) }
        } else if let Some(get_split) = registry.GetInterfaceSplit {
            unsafe { get_split(T::GUID.m_GUIDHigh, T::GUID.m_GUIDLow) }
        } else {
            return None;
        };
        unsafe { (ptr as *const T).as_ref() }
    }

    pub fn graphics(&self) -> Option<Graphics<'_>> {
        self.get::<IUnityGraphics>().map(Graphics)
    }

    pub fn graphics_d3d11(&self) -> Option<GraphicsD3D11<'_>> {
        self.get::<IUnityGraphicsD3D11>().map(GraphicsD3D11)
    }
}

/// `IUnityGraphics`: renderer query and device event registration.
#[derive(Debug, Copy, Clone)]
pub struct Graphics<'a>(&'a IUnityGraphics);

impl Graphics<'_> {
    /// The active renderer, or `None` if the host reports one we don't know.
    pub fn renderer(&self) -> Option<Renderer> {
        let get = self.0.GetRenderer?;
        Renderer::from_raw(unsafe { get() })
    }

    pub fn register_device_event_callback(&self, callback: DeviceEventCallback) -> bool {
        match self.0.RegisterDeviceEventCallback {
            Some(register) => {
                unsafe { register(Some(callback)) };
                true
            }
            None => false,
        }
    }

    pub fn unregister_device_event_callback(&self, callback: DeviceEventCallback) {
        if let Some(unregister) = self.0.UnregisterDeviceEventCallback {
            unsafe { unregister(Some(callback)) };
        }
    }
}

/// `IUnityGraphicsD3D11`: access to the engine's D3D11 device.
#[derive(Debug, Copy, Clone)]
pub struct GraphicsD3D11<'a>(&'a IUnityGraphicsD3D11);

impl GraphicsD3D11<'_> {
    /// Raw `ID3D11Device*` owned by the engine; null while no device exists.
    pub fn device(&self) -> *mut c_void {
        match self.0.GetDevice {
            Some(get) => unsafe { get() },
            None => std::ptr::null_mut(),
        }
    }
}
