//! A recording [`GraphicsDriver`] for tests.
//!
//! Handles given to the mock are never dereferenced, so tests can make them
//! up with [`fake_handle`]. Clones of a [`MockDriver`] share their state, so
//! a test can keep one clone and hand the other to the code under test.

use std::cell::RefCell;
use std::ffi::c_void;
use std::rc::Rc;

use crate::driver::{GraphicsDriver, HResult, ShaderViewDesc};
use crate::handle::{
    DeviceHandle, GpuHandle, ObjectHandle, ResourceHandle, TextureHandle, ViewHandle,
};

/// A handle with address `id`. Panics on zero.
pub fn fake_handle<H: GpuHandle>(id: usize) -> H {
    // SAFETY: mock handles are compared, never dereferenced.
    unsafe { H::from_raw(id as *mut c_void) }.expect("fake handle id must be non-zero")
}

/// Everything the driver has been asked to do, in order.
#[derive(Debug, Default, Clone)]
pub struct MockCalls {
    pub context_fetches: Vec<DeviceHandle>,
    pub context_releases: usize,
    /// Ids of released contexts.
    pub released_contexts: Vec<u64>,
    /// `(context id, dest, src)`.
    pub copies: Vec<(u64, ResourceHandle, ResourceHandle)>,
    pub owning_queries: Vec<ResourceHandle>,
    pub mip_queries: Vec<TextureHandle>,
    pub view_requests: Vec<(DeviceHandle, TextureHandle, ShaderViewDesc)>,
    pub created_views: Vec<ViewHandle>,
    pub releases: Vec<ObjectHandle>,
}

#[derive(Debug, Default)]
struct MockState {
    calls: MockCalls,
    next_context_id: u64,
    refuse_contexts: bool,
    mip_levels: u32,
    owning_device: Option<DeviceHandle>,
    view_failure: Option<HResult>,
}

#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Rc<RefCell<MockState>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> MockCalls {
        self.state.borrow().calls.clone()
    }

    /// Make `immediate_context` return `None`.
    pub fn refuse_contexts(&self, refuse: bool) {
        self.state.borrow_mut().refuse_contexts = refuse;
    }

    /// Mip count reported for every texture.
    pub fn set_mip_levels(&self, mip_levels: u32) {
        self.state.borrow_mut().mip_levels = mip_levels;
    }

    /// Device reported as the creator of every resource.
    pub fn set_owning_device(&self, device: Option<DeviceHandle>) {
        self.state.borrow_mut().owning_device = device;
    }

    /// Make view creation fail with `code`, or succeed for `None`.
    pub fn fail_views_with(&self, code: Option<HResult>) {
        self.state.borrow_mut().view_failure = code;
    }
}

/// A fake immediate context. Dropping it is recorded as a release.
#[derive(Debug)]
pub struct MockContext {
    id: u64,
    device: DeviceHandle,
    state: Rc<RefCell<MockState>>,
}

impl MockContext {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The device this context was fetched from.
    pub fn device(&self) -> DeviceHandle {
        self.device
    }
}

impl Drop for MockContext {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.context_releases += 1;
        state.calls.released_contexts.push(self.id);
    }
}

impl GraphicsDriver for MockDriver {
    type Context = MockContext;

    fn immediate_context(&self, device: DeviceHandle) -> Option<MockContext> {
        let mut state = self.state.borrow_mut();
        state.calls.context_fetches.push(device);
        if state.refuse_contexts {
            return None;
        }
        state.next_context_id += 1;
        Some(MockContext {
            id: state.next_context_id,
            device,
            state: Rc::clone(&self.state),
        })
    }

    fn copy_resource(&self, context: &MockContext, dest: ResourceHandle, src: ResourceHandle) {
        self.state
            .borrow_mut()
            .calls
            .copies
            .push((context.id, dest, src));
    }

    fn owning_device(&self, resource: ResourceHandle) -> Option<DeviceHandle> {
        let mut state = self.state.borrow_mut();
        state.calls.owning_queries.push(resource);
        state.owning_device
    }

    fn texture_mip_levels(&self, texture: TextureHandle) -> u32 {
        let mut state = self.state.borrow_mut();
        state.calls.mip_queries.push(texture);
        state.mip_levels
    }

    fn create_shader_view(
        &self,
        device: DeviceHandle,
        texture: TextureHandle,
        desc: &ShaderViewDesc,
    ) -> Result<ViewHandle, HResult> {
        let mut state = self.state.borrow_mut();
        state.calls.view_requests.push((device, texture, *desc));
        if let Some(code) = state.view_failure {
            return Err(code);
        }
        let view = fake_handle(0x1000 + 0x10 * state.calls.view_requests.len());
        state.calls.created_views.push(view);
        Ok(view)
    }

    fn release(&self, object: ObjectHandle) {
        self.state.borrow_mut().calls.releases.push(object);
    }
}
