//! Native payloads carried through a DOM tree without interpretation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased payload.
///
/// Opaque values compare equal only when they share the same payload.
#[derive(Clone)]
pub struct OpaqueValue(Arc<dyn Any + Send + Sync>);

impl OpaqueValue {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self(Arc::new(payload))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn ptr_eq(&self, other: &OpaqueValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueValue(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_and_identity() {
        let a = OpaqueValue::new(42u32);
        let b = a.clone();
        let c = OpaqueValue::new(42u32);

        assert_eq!(a.downcast_ref::<u32>(), Some(&42));
        assert!(a.is::<u32>());
        assert!(a.downcast_ref::<String>().is_none());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
