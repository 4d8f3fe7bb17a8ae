// Licensed under the Apache-2.0 license

//! Wrapper type for safe pointers to static memory.

use core::ops::Deref;

/// A pointer to statically allocated data such as memory mapped I/O registers.
///
/// Dereferencing yields a `&'static T`; the register types behind it use interior
/// mutability, so copies of the same `StaticRef` may be held by several drivers.
#[derive(Debug)]
pub struct StaticRef<T> {
    ptr: *const T,
}

impl<T> StaticRef<T> {
    /// Create a new `StaticRef` from a raw pointer
    ///
    /// ## Safety
    ///
    /// Callers must pass in a reference to statically allocated memory which
    /// does not overlap with other values.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef { ptr }
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T: 'static> Deref for StaticRef<T> {
    type Target = T;
    fn deref(&self) -> &'static T {
        unsafe { &*self.ptr }
    }
}
