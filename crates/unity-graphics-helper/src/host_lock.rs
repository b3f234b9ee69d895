//! Process-wide state shared between the exported entry points and the
//! host's device event callback.
//!
//! The mod calls exports from the managed main thread while the engine fires
//! device events from its render thread, so events wait for the lock like
//! every other call. The one exception is an event the engine delivers
//! synchronously from inside `RegisterDeviceEventCallback` while plugin load
//! already holds the lock on the same thread: that event is skipped, and
//! load binds the device itself.

use std::cell::Cell;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

thread_local! {
    static LOADING: Cell<bool> = const { Cell::new(false) };
}

/// Clears the loading flag when plugin load finishes or unwinds.
struct LoadingGuard;

impl LoadingGuard {
    fn enter() -> Self {
        LOADING.with(|loading| loading.set(true));
        LoadingGuard
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        LOADING.with(|loading| loading.set(false));
    }
}

/// Whether plugin load is running on the calling thread.
pub fn is_loading() -> bool {
    LOADING.with(Cell::get)
}

pub struct HostLock<T> {
    state: Mutex<T>,
}

impl<T> HostLock<T> {
    pub fn new(state: T) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Run `f` with the state locked, waiting for any other holder.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        // Poisoning is ignored: every binding update is a plain assignment.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Run plugin load. Device events delivered on this thread before `f`
    /// returns are skipped by [`HostLock::with_device_event`].
    pub fn with_loading<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let _loading = LoadingGuard::enter();
        self.with(f)
    }

    /// Deliver a device event. Returns `false` when the event arrived
    /// re-entrantly during plugin load and was skipped.
    pub fn with_device_event(&self, event: i32, f: impl FnOnce(&mut T, i32)) -> bool {
        if is_loading() {
            debug!(event, "device event during load, skipped");
            return false;
        }
        self.with(|state| f(state, event));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use gpu_interop::mock::MockDriver;
    use unity_plugin_api::fake::FakeHost;
    use unity_plugin_api::DeviceEvent;

    use crate::abi;
    use crate::helper::GraphicsHelper;

    #[test]
    fn event_from_another_thread_waits_for_the_lock() {
        let lock = Arc::new(HostLock::new(Vec::new()));
        let (held_tx, held_rx) = mpsc::channel();

        let holder = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                lock.with(|events: &mut Vec<i32>| {
                    held_tx.send(()).unwrap();
                    thread::sleep(Duration::from_millis(50));
                    events.push(-1);
                })
            })
        };

        held_rx.recv().unwrap();
        let delivered = lock.with_device_event(1, |events, event| events.push(event));
        holder.join().unwrap();

        assert!(delivered);
        assert_eq!(lock.with(|events| events.clone()), vec![-1, 1]);
    }

    #[test]
    fn event_inside_load_on_the_same_thread_is_skipped() {
        let lock = HostLock::new(Vec::new());

        let delivered = lock.with_loading(|_: &mut Vec<i32>| {
            assert!(is_loading());
            // The lock is already held here; waiting on it would deadlock.
            lock.with_device_event(0, |events, event| events.push(event))
        });

        assert!(!delivered);
        assert!(!is_loading());
        assert!(lock.with(|events| events.is_empty()));
    }

    #[test]
    fn loading_flag_is_per_thread() {
        let lock = Arc::new(HostLock::new(0));
        let (loading_tx, loading_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let loader = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                let _loading = LoadingGuard::enter();
                loading_tx.send(()).unwrap();
                done_rx.recv().unwrap();
                lock.with(|count| *count += 1);
            })
        };

        loading_rx.recv().unwrap();
        assert!(!is_loading());
        assert!(lock.with_device_event(3, |count, _| *count += 10));
        done_tx.send(()).unwrap();
        loader.join().unwrap();

        assert_eq!(lock.with(|count| *count), 11);
    }

    #[test]
    fn loading_flag_is_cleared_after_a_panic() {
        let lock = HostLock::new(());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            lock.with_loading(|_| panic!("load failed"))
        }));

        assert!(result.is_err());
        assert!(!is_loading());
        assert!(lock.with_device_event(1, |_, _| {}));
    }

    #[test]
    fn shutdown_after_load_unbinds_the_helper() {
        let host = FakeHost::d3d11(0x100 as *mut _);
        let lock = HostLock::new(GraphicsHelper::new(MockDriver::new()));

        lock.with_loading(|helper| helper.on_load(host.interfaces(), None));
        assert!(lock.with(|helper| helper.bridge().is_bound()));

        let shutdown = DeviceEvent::Shutdown as i32;
        assert!(lock.with_device_event(shutdown, abi::device_event));
        assert!(!lock.with(|helper| helper.bridge().is_bound()));
    }
}
