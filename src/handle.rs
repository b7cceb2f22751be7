//! Ownership of one native session pointer.
//!
//! Every coder facade owns exactly one [`SessionHandle`]. The handle stores
//! the pointer together with its matching destroy function and guarantees the
//! destroy function runs exactly once, whether release comes from an explicit
//! `close()`, from `Drop`, or from both racing each other. A released handle
//! holds a null pointer, which is never passed to a native call: all access
//! goes through [`SessionHandle::get`], which fails with the disposed error
//! once the pointer is gone.

use std::fmt;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use libc::c_int;
use log::trace;

use crate::error::{Error, Result};
use crate::ffi;

pub(crate) struct SessionHandle<T> {
    ptr: AtomicPtr<T>,
    destroy: unsafe extern "C" fn(*mut T),
    what: &'static str,
}

// The raw pointer is only dereferenced by native calls issued through the
// owning facade's `&mut self` methods; release is an atomic swap.
unsafe impl<T> Send for SessionHandle<T> {}
unsafe impl<T> Sync for SessionHandle<T> {}

impl<T> SessionHandle<T> {
    /// Wraps the result of a native create call that reports errors through
    /// an out-parameter.
    ///
    /// A null pointer is a failure no matter what `code` says. A non-null
    /// pointer paired with a failing code is destroyed on the spot so it
    /// cannot leak.
    pub fn from_create(
        what: &'static str,
        ptr: *mut T,
        code: c_int,
        destroy: unsafe extern "C" fn(*mut T),
    ) -> Result<Self> {
        if ptr.is_null() {
            let code = if code < 0 { code } else { ffi::OPUS_ALLOC_FAIL };
            return Err(Error::native(what, code));
        }
        if code != ffi::OPUS_OK {
            unsafe { destroy(ptr) };
            return Err(Error::native(what, code));
        }
        trace!("{}: session acquired", what);
        Ok(SessionHandle {
            ptr: AtomicPtr::new(ptr),
            destroy,
            what,
        })
    }

    /// Wraps the result of a native create call with no error channel
    /// (e.g. `opus_repacketizer_create`), where null means allocation failure.
    pub fn from_ptr(
        what: &'static str,
        ptr: *mut T,
        destroy: unsafe extern "C" fn(*mut T),
    ) -> Result<Self> {
        Self::from_create(what, ptr, ffi::OPUS_OK, destroy)
    }

    /// The live pointer, or the disposed error once the handle is closed.
    ///
    /// `what` names the native call the pointer is about to be passed to.
    pub fn get(&self, what: &'static str) -> Result<*mut T> {
        let ptr = self.ptr.load(Ordering::Acquire);
        if ptr.is_null() {
            Err(Error::disposed(what))
        } else {
            Ok(ptr)
        }
    }

    pub fn is_open(&self) -> bool {
        !self.ptr.load(Ordering::Acquire).is_null()
    }

    /// Releases the native session. Idempotent and race-free: the swap makes
    /// sure exactly one caller observes the live pointer and runs destroy.
    pub fn close(&self) {
        let ptr = self.ptr.swap(ptr::null_mut(), Ordering::AcqRel);
        if !ptr.is_null() {
            unsafe { (self.destroy)(ptr) };
            trace!("{}: session released", self.what);
        }
    }
}

impl<T> fmt::Debug for SessionHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("what", &self.what)
            .field("open", &self.is_open())
            .finish()
    }
}

impl<T> Drop for SessionHandle<T> {
    fn drop(&mut self) {
        self.close();
    }
}
