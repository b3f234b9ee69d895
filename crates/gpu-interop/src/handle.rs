//! Tagged GPU object handles.
//!
//! The host passes every object as an untyped pointer. Wrapping each kind in
//! its own type keeps a texture from being handed to a device slot inside the
//! crate; the wrappers are `repr(transparent)` and never null.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// Common surface of all handle kinds.
pub trait GpuHandle: Copy + Eq {
    /// Wrap a raw pointer received from the host. Returns `None` for null.
    ///
    /// # Safety
    ///
    /// A non-null `raw` must point to a live object of the handle's kind for
    /// as long as the handle is used.
    unsafe fn from_raw(raw: *mut c_void) -> Option<Self>;

    fn as_raw(self) -> *mut c_void;
}

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(NonNull<c_void>);

        impl GpuHandle for $name {
            unsafe fn from_raw(raw: *mut c_void) -> Option<Self> {
                NonNull::new(raw).map(Self)
            }

            fn as_raw(self) -> *mut c_void {
                self.0.as_ptr()
            }
        }

        impl $name {
            /// Widen to the reference-counted base object.
            pub fn as_object(self) -> ObjectHandle {
                ObjectHandle(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($name), self.0)
            }
        }
    };
}

gpu_handle!(
    /// `ID3D11Device*`.
    DeviceHandle
);
gpu_handle!(
    /// `ID3D11Resource*`: any buffer or texture.
    ResourceHandle
);
gpu_handle!(
    /// `ID3D11Texture2D*`.
    TextureHandle
);
gpu_handle!(
    /// `ID3D11ShaderResourceView*`.
    ViewHandle
);
gpu_handle!(
    /// `IUnknown*`: any reference-counted object.
    ObjectHandle
);

impl TextureHandle {
    /// A 2D texture is a resource.
    pub fn as_resource(self) -> ResourceHandle {
        ResourceHandle(self.0)
    }
}

/// Convert a possibly-null raw pointer into a handle.
///
/// # Safety
///
/// See [`GpuHandle::from_raw`].
pub unsafe fn handle_from_raw<H: GpuHandle>(raw: *mut c_void) -> Option<H> {
    unsafe { H::from_raw(raw) }
}

/// Convert an optional handle back into a raw pointer, null for `None`.
pub fn handle_into_raw<H: GpuHandle>(handle: Option<H>) -> *mut c_void {
    handle.map_or(std::ptr::null_mut(), GpuHandle::as_raw)
}
