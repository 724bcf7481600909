// jvm-plugin/src/sys/jni.rs
//
// Raw JNI bindings for the invocation API and the handful of JNIEnv
// functions the adapter drives.
//
// The vtables keep the exact slot layout of the JDK header. Functions the
// adapter never calls are kept as opaque pointer padding so that the named
// slots land at the same offsets as in jni.h:
//   - FindClass               (index 6)
//   - ExceptionClear          (index 17)
//   - GetStaticMethodID       (index 113)
//   - CallStaticVoidMethodA   (index 143)
//   - ExceptionCheck          (index 228)

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::ffi::c_void;
use std::os::raw::c_char;

// =============================================================================
// Primitive Types
// =============================================================================

pub type jint = i32;
pub type jlong = i64;
pub type jbyte = i8;
pub type jboolean = u8;
pub type jchar = u16;
pub type jshort = i16;
pub type jfloat = f32;
pub type jdouble = f64;
pub type jsize = jint;

// =============================================================================
// Reference and ID Types (opaque pointers)
// =============================================================================

pub type jobject = *mut c_void;
pub type jclass = jobject;
pub type jmethodID = *mut c_void;

// =============================================================================
// jvalue Union
// =============================================================================

#[repr(C)]
#[derive(Copy, Clone)]
pub union jvalue {
    pub z: jboolean,
    pub b: jbyte,
    pub c: jchar,
    pub s: jshort,
    pub i: jint,
    pub j: jlong,
    pub f: jfloat,
    pub d: jdouble,
    pub l: jobject,
}

// =============================================================================
// Constants
// =============================================================================

pub const JNI_OK: jint = 0;
pub const JNI_ERR: jint = -1;
pub const JNI_EDETACHED: jint = -2;
pub const JNI_EVERSION: jint = -3;
pub const JNI_ENOMEM: jint = -4;
pub const JNI_EEXIST: jint = -5;
pub const JNI_EINVAL: jint = -6;

pub const JNI_TRUE: jboolean = 1;
pub const JNI_FALSE: jboolean = 0;

pub const JNI_VERSION_1_1: jint = 0x00010001;
pub const JNI_VERSION_1_2: jint = 0x00010002;
pub const JNI_VERSION_1_4: jint = 0x00010004;
pub const JNI_VERSION_1_6: jint = 0x00010006;
pub const JNI_VERSION_1_8: jint = 0x00010008;
pub const JNI_VERSION_9: jint = 0x00090000;
pub const JNI_VERSION_10: jint = 0x000a0000;
pub const JNI_VERSION_21: jint = 0x00150000;

/// Symbolic name of a JNI return code, for diagnostics.
pub fn result_name(code: jint) -> &'static str {
    match code {
        JNI_OK => "JNI_OK",
        JNI_ERR => "JNI_ERR",
        JNI_EDETACHED => "JNI_EDETACHED",
        JNI_EVERSION => "JNI_EVERSION",
        JNI_ENOMEM => "JNI_ENOMEM",
        JNI_EEXIST => "JNI_EEXIST",
        JNI_EINVAL => "JNI_EINVAL",
        _ => "unknown JNI error",
    }
}

// =============================================================================
// JNINativeInterface_ - The JNI function table (vtable)
// =============================================================================
//
// 236 slots total. The `unusedN` arrays stand in for the functions between
// the named slots; their lengths must add up exactly.

#[repr(C)]
pub struct JNINativeInterface_ {
    // 0-3
    pub reserved: [*mut c_void; 4],

    // 4-5: GetVersion, DefineClass
    pub unused4: [*mut c_void; 2],

    // 6
    pub FindClass: unsafe extern "system" fn(env: *mut JNIEnv, name: *const c_char) -> jclass,

    // 7-15: reflection, superclass, Throw, ExceptionOccurred
    pub unused7: [*mut c_void; 9],

    // 16-17
    pub ExceptionDescribe: unsafe extern "system" fn(env: *mut JNIEnv),
    pub ExceptionClear: unsafe extern "system" fn(env: *mut JNIEnv),

    // 18-112: references, object creation, instance calls, fields
    pub unused18: [*mut c_void; 95],

    // 113
    pub GetStaticMethodID: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        name: *const c_char,
        sig: *const c_char,
    ) -> jmethodID,

    // 114-142: static calls up to the variadic/va_list void forms
    pub unused114: [*mut c_void; 29],

    // 143
    pub CallStaticVoidMethodA: unsafe extern "system" fn(
        env: *mut JNIEnv,
        cls: jclass,
        methodID: jmethodID,
        args: *const jvalue,
    ),

    // 144-227: static fields, strings, arrays, monitors, weak refs
    pub unused144: [*mut c_void; 84],

    // 228
    pub ExceptionCheck: unsafe extern "system" fn(env: *mut JNIEnv) -> jboolean,

    // 229-235: direct buffers, ref type, modules, virtual threads
    pub unused229: [*mut c_void; 7],
}

// =============================================================================
// JNIEnv - Pointer to the JNI function table
// =============================================================================
//
// In C JNI, JNIEnv is directly a pointer to the vtable:
//   typedef const struct JNINativeInterface_ *JNIEnv;

pub type JNIEnv = *const JNINativeInterface_;

// =============================================================================
// JNIInvokeInterface_ - The JavaVM function table
// =============================================================================

#[repr(C)]
pub struct JNIInvokeInterface_ {
    pub reserved: [*mut c_void; 3],

    pub DestroyJavaVM: unsafe extern "system" fn(vm: *mut JavaVM) -> jint,

    // AttachCurrentThread, DetachCurrentThread, GetEnv, AttachCurrentThreadAsDaemon
    pub unused4: [*mut c_void; 4],
}

/// JavaVM is directly the vtable pointer (C ABI definition)
pub type JavaVM = *const JNIInvokeInterface_;

// =============================================================================
// JavaVMInitArgs and JavaVMOption for JNI_CreateJavaVM
// =============================================================================

#[repr(C)]
pub struct JavaVMOption {
    pub optionString: *mut c_char,
    pub extraInfo: *mut c_void,
}

#[repr(C)]
pub struct JavaVMInitArgs {
    pub version: jint,
    pub nOptions: jint,
    pub options: *mut JavaVMOption,
    pub ignoreUnrecognized: jboolean,
}

/// Signature of the `JNI_CreateJavaVM` export of libjvm.
pub type JNI_CreateJavaVM = unsafe extern "system" fn(
    pvm: *mut *mut JavaVM,
    penv: *mut *mut JNIEnv,
    args: *mut JavaVMInitArgs,
) -> jint;

// =============================================================================
// Helper macros
// =============================================================================

/// Helper to call JNI functions through the vtable.
/// env_ptr: *mut JNIEnv = *mut *const JNINativeInterface_
/// Usage: jni_call!(env, FindClass, name.as_ptr())
#[macro_export]
macro_rules! jni_call {
    ($env:expr, $func:ident $(, $args:expr)*) => {{
        let env_ptr = $env;
        ((**env_ptr).$func)(env_ptr $(, $args)*)
    }};
}

/// Helper to call JavaVM functions through the vtable.
/// vm_ptr: *mut JavaVM = *mut *const JNIInvokeInterface_
#[macro_export]
macro_rules! jvm_call {
    ($vm:expr, $func:ident $(, $args:expr)*) => {{
        let vm_ptr = $vm;
        ((**vm_ptr).$func)(vm_ptr $(, $args)*)
    }};
}
