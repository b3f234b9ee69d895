//! The device binding and the operations forwarded through it.

use tracing::{debug, trace, warn};

use crate::driver::{GraphicsDriver, HResult, ShaderViewDesc};
use crate::handle::{DeviceHandle, ObjectHandle, ResourceHandle, TextureHandle, ViewHandle};

/// Holds the device the host is rendering with and that device's immediate
/// context, and forwards resource operations to them.
///
/// The device is borrowed from the host. The context is owned: it is dropped
/// (and so released) whenever the device changes or the binding is cleared.
/// A context is only ever held while a device is bound.
///
/// Calls must be serialized by the caller; the host drives everything from
/// its render thread.
pub struct DeviceBridge<D: GraphicsDriver> {
    driver: D,
    device: Option<DeviceHandle>,
    context: Option<D::Context>,
}

impl<D: GraphicsDriver> DeviceBridge<D> {
    /// An empty binding.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            device: None,
            context: None,
        }
    }

    /// The bound device, if any. Not an owned reference.
    pub fn device(&self) -> Option<DeviceHandle> {
        self.device
    }

    /// The bound device's immediate context, if one was obtained.
    pub fn context(&self) -> Option<&D::Context> {
        self.context.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.device.is_some()
    }

    /// Rebind to `device`.
    ///
    /// Binding the device that is already bound does nothing. Otherwise the
    /// old context is released and a fresh one fetched from the new device.
    /// A device that refuses to hand out a context stays bound without one.
    pub fn set_device(&mut self, device: Option<DeviceHandle>) {
        if device == self.device {
            trace!(?device, "device unchanged");
            return;
        }

        self.context = None;
        self.device = device;
        self.context = device.and_then(|device| self.driver.immediate_context(device));

        match (self.device, self.context.is_some()) {
            (Some(device), true) => debug!(?device, "bound device"),
            (Some(device), false) => warn!(?device, "bound device has no immediate context"),
            (None, _) => debug!("device cleared"),
        }
    }

    /// Release the context and forget the device. Safe to repeat.
    pub fn unbind(&mut self) {
        if self.device.is_some() || self.context.is_some() {
            debug!(device = ?self.device, "unbinding device");
        }
        self.context = None;
        self.device = None;
    }

    /// The device that created `resource`, independent of the bound one.
    ///
    /// The returned device is a new reference the caller must release.
    pub fn owning_device(&self, resource: Option<ResourceHandle>) -> Option<DeviceHandle> {
        let resource = resource?;
        let device = self.driver.owning_device(resource);
        trace!(?resource, ?device, "resolved owning device");
        device
    }

    /// Copy the whole of `src` into `dest` on the bound context.
    ///
    /// Does nothing without a bound context or with a missing resource. The
    /// resources must be compatible and live on the bound device.
    pub fn copy_resource(&self, dest: Option<ResourceHandle>, src: Option<ResourceHandle>) {
        let (Some(context), Some(dest), Some(src)) = (self.context.as_ref(), dest, src) else {
            trace!(bound = self.context.is_some(), ?dest, ?src, "copy skipped");
            return;
        };
        self.driver.copy_resource(context, dest, src);
    }

    /// Create a 2D shader-resource view of `texture` in `format` on the bound
    /// device, covering every mip the texture has.
    ///
    /// Fails with [`HResult::E_FAIL`] without a bound device or texture, and
    /// with the driver's code if creation fails. The view is owned by the
    /// caller.
    pub fn create_shader_view(
        &self,
        texture: Option<TextureHandle>,
        format: i32,
    ) -> Result<ViewHandle, HResult> {
        let (Some(device), Some(texture)) = (self.device, texture) else {
            debug!(bound = self.device.is_some(), ?texture, "no device or texture for view");
            return Err(HResult::E_FAIL);
        };

        let desc = ShaderViewDesc::texture2d(format, self.driver.texture_mip_levels(texture));
        self.driver
            .create_shader_view(device, texture, &desc)
            .inspect(|view| trace!(?texture, ?view, ?desc, "created shader view"))
            .inspect_err(|hr| warn!(?texture, ?desc, "shader view creation failed: {hr}"))
    }

    /// Drop one reference to `object`. Does nothing for `None`.
    pub fn release(&self, object: Option<ObjectHandle>) {
        if let Some(object) = object {
            self.driver.release(object);
        }
    }
}
