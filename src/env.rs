//! Thin wrapper around the creator thread's JNI environment.
//!
//! Only the calls the adapter needs are wrapped. Every call that can leave a
//! Java exception pending is followed by [`JniEnv::clear_pending_exception`],
//! so a failed lookup never poisons the next JNI call.

use std::ffi::CString;

use log::{debug, trace};

use crate::sys::jni;

/// Upper bound on method parameters set by the class file format.
const MAX_METHOD_PARAMS: usize = 255;

/// Wrapper around a raw `JNIEnv*`.
///
/// A `JniEnv` is tied to the thread that created the VM and is neither
/// `Send` nor `Sync`.
#[derive(Clone, Copy)]
pub struct JniEnv {
    env: *mut jni::JNIEnv,
}

impl JniEnv {
    /// Creates a JniEnv wrapper from a raw pointer.
    ///
    /// # Safety
    ///
    /// The pointer must be a valid `JNIEnv*` for the current thread and must
    /// outlive every call made through the wrapper.
    pub unsafe fn from_raw(env: *mut jni::JNIEnv) -> Self {
        JniEnv { env }
    }

    /// Finds a class by its binary name (`java/lang/System`).
    pub fn find_class(&self, name: &str) -> Option<jni::jclass> {
        let c_name = CString::new(name).ok()?;
        let cls = unsafe { crate::jni_call!(self.env, FindClass, c_name.as_ptr()) };
        self.clear_pending_exception();
        trace!("FindClass({name}) -> {cls:p}");
        if cls.is_null() { None } else { Some(cls) }
    }

    /// Gets the method ID of a static method.
    pub fn get_static_method_id(&self, cls: jni::jclass, name: &str, sig: &str) -> Option<jni::jmethodID> {
        let c_name = CString::new(name).ok()?;
        let c_sig = CString::new(sig).ok()?;
        let mid = unsafe {
            crate::jni_call!(self.env, GetStaticMethodID, cls, c_name.as_ptr(), c_sig.as_ptr())
        };
        self.clear_pending_exception();
        trace!("GetStaticMethodID({name}{sig}) -> {mid:p}");
        if mid.is_null() { None } else { Some(mid) }
    }

    /// Calls a static void method with no arguments.
    ///
    /// A method that declares parameters receives zero/null for each of them.
    pub fn call_static_void_method(&self, cls: jni::jclass, method_id: jni::jmethodID) {
        let zeroed = [jni::jvalue { j: 0 }; MAX_METHOD_PARAMS];
        unsafe {
            crate::jni_call!(self.env, CallStaticVoidMethodA, cls, method_id, zeroed.as_ptr())
        };
        self.clear_pending_exception();
    }

    /// Checks if an exception is pending.
    pub fn exception_check(&self) -> bool {
        let pending = unsafe { crate::jni_call!(self.env, ExceptionCheck) };
        pending != jni::JNI_FALSE
    }

    /// Clears a pending exception without printing it.
    ///
    /// Returns `true` when an exception was pending.
    pub fn clear_pending_exception(&self) -> bool {
        if !self.exception_check() {
            return false;
        }
        unsafe { crate::jni_call!(self.env, ExceptionClear) };
        debug!("cleared pending Java exception");
        true
    }
}
