//! Hardcoded Unity native plugin interface constants and C-repr structs.
//!
//! Sourced from the Unity plugin API headers (`IUnityInterface.h`,
//! `IUnityGraphics.h`, `IUnityGraphicsD3D11.h`). Only the interfaces the
//! helper talks to are declared; vtables list their leading members in header
//! order, which is all that is needed to call through a host-owned table.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]

use std::ffi::{c_int, c_void};

// =====================================================================
// Interface registry
// =====================================================================

/// 128-bit interface identifier, passed by value to the registry.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UnityInterfaceGUID {
    pub m_GUIDHigh: u64,
    pub m_GUIDLow: u64,
}

impl UnityInterfaceGUID {
    pub const fn new(high: u64, low: u64) -> Self {
        Self {
            m_GUIDHigh: high,
            m_GUIDLow: low,
        }
    }
}

/// Opaque base of every Unity interface.
pub type IUnityInterface = c_void;

/// The registry Unity hands to `UnityPluginLoad`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct IUnityInterfaces {
    pub GetInterface:
        Option<unsafe extern "system" fn(guid: UnityInterfaceGUID) -> *mut IUnityInterface>,
    pub RegisterInterface:
        Option<unsafe extern "system" fn(guid: UnityInterfaceGUID, ptr: *mut IUnityInterface)>,
    pub GetInterfaceSplit:
        Option<unsafe extern "system" fn(guid_high: u64, guid_low: u64) -> *mut IUnityInterface>,
    pub RegisterInterfaceSplit: Option<
        unsafe extern "system" fn(guid_high: u64, guid_low: u64, ptr: *mut IUnityInterface),
    >,
}

// =====================================================================
// Renderers (UnityGfxRenderer)
// =====================================================================
pub type UnityGfxRenderer = c_int;

pub const kUnityGfxRendererD3D11: UnityGfxRenderer = 2;
pub const kUnityGfxRendererNull: UnityGfxRenderer = 4;
pub const kUnityGfxRendererOpenGLES30: UnityGfxRenderer = 11;
pub const kUnityGfxRendererPS4: UnityGfxRenderer = 13;
pub const kUnityGfxRendererXboxOne: UnityGfxRenderer = 14;
pub const kUnityGfxRendererMetal: UnityGfxRenderer = 16;
pub const kUnityGfxRendererOpenGLCore: UnityGfxRenderer = 17;
pub const kUnityGfxRendererD3D12: UnityGfxRenderer = 18;
pub const kUnityGfxRendererVulkan: UnityGfxRenderer = 21;
pub const kUnityGfxRendererNvn: UnityGfxRenderer = 22;
pub const kUnityGfxRendererXboxOneD3D12: UnityGfxRenderer = 23;
pub const kUnityGfxRendererGameCoreXboxOne: UnityGfxRenderer = 24;
pub const kUnityGfxRendererGameCoreXboxSeries: UnityGfxRenderer = 25;
pub const kUnityGfxRendererPS5: UnityGfxRenderer = 26;
pub const kUnityGfxRendererPS5NGGC: UnityGfxRenderer = 27;

// =====================================================================
// Device events (UnityGfxDeviceEventType)
// =====================================================================
pub type UnityGfxDeviceEventType = c_int;

pub const kUnityGfxDeviceEventInitialize: UnityGfxDeviceEventType = 0;
pub const kUnityGfxDeviceEventShutdown: UnityGfxDeviceEventType = 1;
pub const kUnityGfxDeviceEventBeforeReset: UnityGfxDeviceEventType = 2;
pub const kUnityGfxDeviceEventAfterReset: UnityGfxDeviceEventType = 3;

pub type IUnityGraphicsDeviceEventCallback =
    Option<unsafe extern "system" fn(event_type: UnityGfxDeviceEventType)>;

// =====================================================================
// IUnityGraphics
// =====================================================================
pub const IUnityGraphics_GUID: UnityInterfaceGUID =
    UnityInterfaceGUID::new(0x7CBA0A9CA4DDB544, 0x8C5AD4926EB17B11);

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct IUnityGraphics {
    pub GetRenderer: Option<unsafe extern "system" fn() -> UnityGfxRenderer>,
    pub RegisterDeviceEventCallback:
        Option<unsafe extern "system" fn(callback: IUnityGraphicsDeviceEventCallback)>,
    pub UnregisterDeviceEventCallback:
        Option<unsafe extern "system" fn(callback: IUnityGraphicsDeviceEventCallback)>,
    pub ReserveEventIDRange: Option<unsafe extern "system" fn(count: c_int) -> c_int>,
}

// =====================================================================
// IUnityGraphicsD3D11
// =====================================================================
pub const IUnityGraphicsD3D11_GUID: UnityInterfaceGUID =
    UnityInterfaceGUID::new(0xAAB37EF87A87D748, 0xBF76967F07EFB177);

/// Opaque engine handles used by the D3D11 interface.
pub type UnityRenderBuffer = *mut c_void;
pub type UnityTextureID = u32;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct IUnityGraphicsD3D11 {
    /// Returns an `ID3D11Device*` owned by the engine.
    pub GetDevice: Option<unsafe extern "system" fn() -> *mut c_void>,
    pub TextureFromRenderBuffer:
        Option<unsafe extern "system" fn(buffer: UnityRenderBuffer) -> *mut c_void>,
    pub TextureFromNativeTexture:
        Option<unsafe extern "system" fn(texture: UnityTextureID) -> *mut c_void>,
    pub RTVFromRenderBuffer:
        Option<unsafe extern "system" fn(surface: UnityRenderBuffer) -> *mut c_void>,
    pub SRVFromNativeTexture:
        Option<unsafe extern "system" fn(texture: UnityTextureID) -> *mut c_void>,
    pub GetSwapChain: Option<unsafe extern "system" fn() -> *mut c_void>,
}
