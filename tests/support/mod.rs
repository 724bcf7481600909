//! In-process fake of the JNI invocation API.
//!
//! `fake_create` stands in for `JNI_CreateJavaVM`. It hands out vtables
//! owned by a thread-local `FakeState` and recording into it, so every test
//! thread sees its own VM. [`reset`] frees them.

#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::ptr;

use jvm_plugin::sys::jni;
use jvm_plugin::{CreationError, VmBuilder, VmHandle};

#[derive(Default)]
pub struct FakeState {
    pub create_calls: usize,
    pub fail_create_with: Option<jni::jint>,
    pub return_null_vm: bool,
    pub seen_version: jni::jint,
    pub seen_ignore_unrecognized: jni::jboolean,
    pub seen_options: Vec<String>,

    pub classes: Vec<String>,
    pub static_methods: Vec<(String, String, String)>,
    pub find_class_calls: usize,
    pub get_static_method_calls: usize,

    pub throw_on_call: bool,
    pub invoked: Vec<(String, String)>,
    pub args_ptr_null: Vec<bool>,

    pub pending_exception: bool,
    pub exceptions_described: usize,
    pub exceptions_cleared: usize,

    pub destroy_calls: usize,

    vm_tables: Vec<(Box<jni::JNIInvokeInterface_>, Box<jni::JavaVM>)>,
    env_tables: Vec<(Box<jni::JNINativeInterface_>, Box<jni::JNIEnv>)>,
}

thread_local! {
    static STATE: RefCell<FakeState> = RefCell::new(FakeState::default());
}

pub fn reset() {
    STATE.with(|s| *s.borrow_mut() = FakeState::default());
}

pub fn with_state<R>(f: impl FnOnce(&mut FakeState) -> R) -> R {
    STATE.with(|s| f(&mut s.borrow_mut()))
}

pub fn define_class(name: &str) {
    with_state(|s| s.classes.push(name.to_string()));
}

pub fn define_static_method(class: &str, name: &str, sig: &str) {
    with_state(|s| {
        s.static_methods
            .push((class.to_string(), name.to_string(), sig.to_string()))
    });
}

/// Start a fake VM through the real builder path.
pub fn create_vm(options: &[&str]) -> Result<VmHandle, CreationError> {
    let builder = VmBuilder::default().options(options)?;
    unsafe { builder.create_with(fake_create) }
}

// =============================================================================
// Handles
// =============================================================================

struct FakeMethod {
    class: String,
    name: String,
}

fn class_name<'a>(cls: jni::jclass) -> &'a str {
    unsafe { (*(cls as *const String)).as_str() }
}

unsafe fn c_str(p: *const c_char) -> String {
    CStr::from_ptr(p).to_string_lossy().into_owned()
}

// =============================================================================
// JNIEnv functions
// =============================================================================

unsafe extern "system" fn find_class(_env: *mut jni::JNIEnv, name: *const c_char) -> jni::jclass {
    let name = c_str(name);
    with_state(|s| {
        s.find_class_calls += 1;
        if s.classes.contains(&name) {
            Box::into_raw(Box::new(name)) as jni::jclass
        } else {
            s.pending_exception = true;
            ptr::null_mut()
        }
    })
}

unsafe extern "system" fn get_static_method_id(
    _env: *mut jni::JNIEnv,
    clazz: jni::jclass,
    name: *const c_char,
    sig: *const c_char,
) -> jni::jmethodID {
    let class = class_name(clazz).to_string();
    let name = c_str(name);
    let sig = c_str(sig);
    with_state(|s| {
        s.get_static_method_calls += 1;
        let known = s
            .static_methods
            .iter()
            .any(|(c, n, g)| *c == class && *n == name && *g == sig);
        if known {
            Box::into_raw(Box::new(FakeMethod { class, name })) as jni::jmethodID
        } else {
            s.pending_exception = true;
            ptr::null_mut()
        }
    })
}

unsafe extern "system" fn call_static_void_method_a(
    _env: *mut jni::JNIEnv,
    _cls: jni::jclass,
    method_id: jni::jmethodID,
    args: *const jni::jvalue,
) {
    let method = &*(method_id as *const FakeMethod);
    with_state(|s| {
        s.invoked.push((method.class.clone(), method.name.clone()));
        s.args_ptr_null.push(args.is_null());
        if s.throw_on_call {
            s.pending_exception = true;
        }
    });
}

unsafe extern "system" fn exception_check(_env: *mut jni::JNIEnv) -> jni::jboolean {
    if with_state(|s| s.pending_exception) {
        jni::JNI_TRUE
    } else {
        jni::JNI_FALSE
    }
}

unsafe extern "system" fn exception_describe(_env: *mut jni::JNIEnv) {
    with_state(|s| s.exceptions_described += 1);
}

unsafe extern "system" fn exception_clear(_env: *mut jni::JNIEnv) {
    with_state(|s| {
        s.pending_exception = false;
        s.exceptions_cleared += 1;
    });
}

// =============================================================================
// JavaVM functions
// =============================================================================

unsafe extern "system" fn destroy_java_vm(_vm: *mut jni::JavaVM) -> jni::jint {
    with_state(|s| s.destroy_calls += 1);
    jni::JNI_OK
}

fn env_table() -> jni::JNINativeInterface_ {
    jni::JNINativeInterface_ {
        reserved: [ptr::null_mut(); 4],
        unused4: [ptr::null_mut(); 2],
        FindClass: find_class,
        unused7: [ptr::null_mut(); 9],
        ExceptionDescribe: exception_describe,
        ExceptionClear: exception_clear,
        unused18: [ptr::null_mut(); 95],
        GetStaticMethodID: get_static_method_id,
        unused114: [ptr::null_mut(); 29],
        CallStaticVoidMethodA: call_static_void_method_a,
        unused144: [ptr::null_mut(); 84],
        ExceptionCheck: exception_check,
        unused229: [ptr::null_mut(); 7],
    }
}

fn vm_table() -> jni::JNIInvokeInterface_ {
    jni::JNIInvokeInterface_ {
        reserved: [ptr::null_mut(); 3],
        DestroyJavaVM: destroy_java_vm,
        unused4: [ptr::null_mut::<c_void>(); 4],
    }
}

/// Stand-in for libjvm's `JNI_CreateJavaVM`.
pub unsafe extern "system" fn fake_create(
    pvm: *mut *mut jni::JavaVM,
    penv: *mut *mut jni::JNIEnv,
    args: *mut jni::JavaVMInitArgs,
) -> jni::jint {
    let args = &*args;
    let options: Vec<String> = (0..args.nOptions as usize)
        .map(|i| c_str((*args.options.add(i)).optionString))
        .collect();

    let (fail, null_vm) = with_state(|s| {
        s.create_calls += 1;
        s.seen_version = args.version;
        s.seen_ignore_unrecognized = args.ignoreUnrecognized;
        s.seen_options = options.clone();
        (s.fail_create_with, s.return_null_vm)
    });

    if let Some(code) = fail {
        return code;
    }
    if options.iter().any(|o| o.starts_with("-Xbogus")) {
        return jni::JNI_EINVAL;
    }
    if null_vm {
        return jni::JNI_OK;
    }

    let vm_vtable = Box::new(vm_table());
    let env_vtable = Box::new(env_table());
    let mut vm: Box<jni::JavaVM> = Box::new(&*vm_vtable as jni::JavaVM);
    let mut env: Box<jni::JNIEnv> = Box::new(&*env_vtable as jni::JNIEnv);
    *pvm = &mut *vm;
    *penv = &mut *env;
    with_state(|s| {
        s.vm_tables.push((vm_vtable, vm));
        s.env_tables.push((env_vtable, env));
    });
    jni::JNI_OK
}
