//! Host lifecycle around the device bridge.
//!
//! [`GraphicsHelper`] is the one piece of state the plugin keeps. It is
//! created empty, bound to the engine's device when Unity loads the plugin
//! (or when the mod hands a device over), and cleared when the device goes
//! away or the plugin unloads.

use gpu_interop::{DeviceBridge, DeviceHandle, GpuHandle, GraphicsDriver};
use tracing::debug;
use unity_plugin_api::{DeviceEvent, DeviceEventCallback, Renderer, UnityInterfaces};

pub struct GraphicsHelper<D: GraphicsDriver> {
    bridge: DeviceBridge<D>,
    /// Registry received at load, kept to re-query the device on events.
    host: Option<UnityInterfaces>,
    /// Callback registered with `IUnityGraphics`, to unregister at unload.
    event_callback: Option<DeviceEventCallback>,
}

impl<D: GraphicsDriver> GraphicsHelper<D> {
    pub fn new(driver: D) -> Self {
        Self {
            bridge: DeviceBridge::new(driver),
            host: None,
            event_callback: None,
        }
    }

    pub fn bridge(&self) -> &DeviceBridge<D> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut DeviceBridge<D> {
        &mut self.bridge
    }

    pub fn host(&self) -> Option<UnityInterfaces> {
        self.host
    }

    /// Plugin load: bind the engine's D3D11 device if it runs on D3D11.
    ///
    /// When the registry offers `IUnityGraphics`, `callback` is registered for
    /// device events. Anything missing along the way leaves the binding as it
    /// was; nothing is reported to the host.
    pub fn on_load(&mut self, host: UnityInterfaces, callback: Option<DeviceEventCallback>) {
        if self.host.is_some() {
            self.unregister_events();
        }
        self.host = Some(host);

        if let (Some(graphics), Some(callback)) = (host.graphics(), callback) {
            if graphics.register_device_event_callback(callback) {
                self.event_callback = Some(callback);
            }
        }

        self.bind_host_device();
    }

    /// Plugin unload: release the context, forget the device and the host.
    /// Safe to call any number of times.
    pub fn on_unload(&mut self) {
        self.unregister_events();
        self.host = None;
        self.bridge.unbind();
    }

    /// React to an engine device event.
    pub fn on_device_event(&mut self, event: DeviceEvent) {
        debug!(?event, "device event");
        match event {
            DeviceEvent::Initialize | DeviceEvent::AfterReset => {
                self.bind_host_device();
            }
            DeviceEvent::Shutdown => self.bridge.unbind(),
            DeviceEvent::BeforeReset => {}
        }
    }

    /// Ask the retained registry for the engine's D3D11 device and bind it.
    fn bind_host_device(&mut self) {
        let Some(host) = self.host else {
            return;
        };
        let Some(graphics) = host.graphics() else {
            debug!("host offers no IUnityGraphics");
            return;
        };
        match graphics.renderer() {
            Some(Renderer::D3D11) => {}
            renderer => {
                debug!(?renderer, "host is not rendering with D3D11");
                return;
            }
        }
        let Some(d3d11) = host.graphics_d3d11() else {
            debug!("host offers no IUnityGraphicsD3D11");
            return;
        };
        // SAFETY: the engine owns the device and keeps it alive until its
        // Shutdown event, which unbinds it.
        let Some(device) = (unsafe { DeviceHandle::from_raw(d3d11.device()) }) else {
            debug!("host has no D3D11 device yet");
            return;
        };

        self.bridge.set_device(Some(device));
    }

    fn unregister_events(&mut self) {
        let Some(callback) = self.event_callback.take() else {
            return;
        };
        if let Some(graphics) = self.host.as_ref().and_then(UnityInterfaces::graphics) {
            graphics.unregister_device_event_callback(callback);
        }
    }
}
