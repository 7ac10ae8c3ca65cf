//! Process-wide backend handle.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global atomic counter for unique device ids.
static NEXT_DEVICE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct DeviceInner {
    id: u64,
}

/// Handle to a tracing backend instance.
///
/// A device owns no mutable state of its own; it identifies the backend
/// instance that scenes are bound to. Cloning is cheap and all clones refer
/// to the same instance, so a [`Scene`](crate::Scene) can hold onto its
/// device for as long as it lives. Dropping the last clone releases it.
#[derive(Debug, Clone)]
pub struct Device {
    inner: Arc<DeviceInner>,
}

impl Device {
    /// Create a new device.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DeviceInner {
                id: NEXT_DEVICE_ID.fetch_add(1, Ordering::Relaxed),
            }),
        }
    }

    /// Unique id of this device within the process.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Whether two handles refer to the same backend instance.
    pub fn same_instance(&self, other: &Device) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "raybatch device #{} (core {})",
            self.inner.id,
            env!("CARGO_PKG_VERSION")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_ids_unique() {
        let a = Device::new();
        let b = Device::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_device_clone_is_same_instance() {
        let a = Device::new();
        let b = a.clone();
        assert!(a.same_instance(&b));
        assert!(!a.same_instance(&Device::new()));
    }

    #[test]
    fn test_device_display_reports_version() {
        let device = Device::new();
        let repr = device.to_string();
        assert!(repr.contains("raybatch device"));
        assert!(repr.contains(env!("CARGO_PKG_VERSION")));
    }
}
