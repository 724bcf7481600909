//! The embedded VM adapter.
//!
//! [`VmBuilder`] starts a JVM through `JNI_CreateJavaVM`; the resulting
//! [`VmHandle`] is a reference-counted owner of the `JavaVM*`, the creator
//! thread's `JNIEnv*`, the option strings and the loaded `libjvm`.
//!
//! ```rust,ignore
//! use jvm_plugin::prelude::*;
//!
//! let vm = VmHandle::create(["-Xmx256m", "-Djava.class.path=./app.jar"])?;
//! let main = vm.find_class("com/example/Main");
//! let run = vm.get_static_method(main, "run", "()V");
//! vm.call_static_void_method(main, run);
//! ```

use std::cell::RefCell;
use std::ffi::c_void;
use std::path::Path;
use std::ptr::{self, NonNull};
use std::rc::Rc;

use log::{debug, info, trace, warn};

use crate::env::JniEnv;
use crate::error::CreationError;
use crate::locate;
use crate::options::OptionList;
use crate::sys::jni;

/// Startup configuration for one VM.
///
/// The plugin's `create` goes through [`VmHandle::create`], which is this
/// builder with defaults: `JNI_VERSION_1_8`, unrecognized options rejected.
pub struct VmBuilder {
    version: jni::jint,
    options: OptionList,
    ignore_unrecognized: bool,
}

impl Default for VmBuilder {
    fn default() -> Self {
        Self::new(jni::JNI_VERSION_1_8)
    }
}

impl VmBuilder {
    /// Request `version` of the JNI interface from the VM.
    pub fn new(version: jni::jint) -> Self {
        Self {
            version,
            options: OptionList::new(),
            ignore_unrecognized: false,
        }
    }

    /// Append one startup option. Fails if it contains a NUL byte.
    pub fn option(mut self, opt: &str) -> Result<Self, CreationError> {
        self.options.push(opt)?;
        Ok(self)
    }

    /// Append options in order, stopping at the first one with a NUL byte.
    pub fn options<I, S>(mut self, opts: I) -> Result<Self, CreationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for opt in opts {
            self.options.push(opt.as_ref())?;
        }
        Ok(self)
    }

    /// Let the VM skip `-X`/`_` options it does not know instead of failing.
    pub fn ignore_unrecognized(mut self, value: bool) -> Self {
        self.ignore_unrecognized = value;
        self
    }

    /// Start the VM through an already resolved bootstrap entry point.
    ///
    /// # Safety
    /// `create` must behave like libjvm's `JNI_CreateJavaVM`, and whatever
    /// backs it must outlive the handle.
    pub unsafe fn create_with(self, create: jni::JNI_CreateJavaVM) -> Result<VmHandle, CreationError> {
        self.create_inner(create, None)
    }

    /// Open the VM library at `path` and start the VM from it. The library
    /// stays loaded until the handle is torn down.
    pub fn create_from_library<P: AsRef<Path>>(self, path: P) -> Result<VmHandle, CreationError> {
        debug!("loading {}", path.as_ref().display());
        let lib = unsafe { libloading::Library::new(path.as_ref())? };
        let create: jni::JNI_CreateJavaVM = unsafe {
            let symbol: libloading::Symbol<jni::JNI_CreateJavaVM> = lib.get(b"JNI_CreateJavaVM\0")?;
            *symbol
        };
        unsafe { self.create_inner(create, Some(lib)) }
    }

    /// Start the VM from the library named by the environment, see [`locate::find_libjvm`].
    pub fn create(self) -> Result<VmHandle, CreationError> {
        let path = locate::find_libjvm()?;
        self.create_from_library(path)
    }

    /// Start the VM from the JDK installed at `java_home`.
    pub fn create_from_java_home<P: AsRef<Path>>(self, java_home: P) -> Result<VmHandle, CreationError> {
        let path = locate::find_libjvm_in(java_home.as_ref())?;
        self.create_from_library(path)
    }

    unsafe fn create_inner(
        self,
        create: jni::JNI_CreateJavaVM,
        lib: Option<libloading::Library>,
    ) -> Result<VmHandle, CreationError> {
        let VmBuilder {
            version,
            mut options,
            ignore_unrecognized,
        } = self;
        debug!("creating JVM with {} option(s): {:?}", options.len(), options);

        let mut args = options.init_args(version, ignore_unrecognized);
        let mut vm: *mut jni::JavaVM = ptr::null_mut();
        let mut env: *mut jni::JNIEnv = ptr::null_mut();

        // `options` and `lib` are dropped on every early return below.
        let res = create(&mut vm, &mut env, &mut args);
        if res != jni::JNI_OK {
            warn!("JNI_CreateJavaVM failed: {} ({res})", jni::result_name(res));
            return Err(CreationError::Jni { code: res });
        }
        if vm.is_null() || env.is_null() {
            warn!("JNI_CreateJavaVM returned JNI_OK with a null VM or env");
            return Err(CreationError::NullVm);
        }

        info!("JVM created");
        Ok(VmHandle {
            inner: Rc::new(RefCell::new(Some(VmInstance {
                vm,
                env: JniEnv::from_raw(env),
                options,
                _lib: lib,
            }))),
        })
    }
}

/// Live VM state. Field order matters: the VM is destroyed in `drop`, then
/// the option strings are freed, then `libjvm` is unloaded.
struct VmInstance {
    vm: *mut jni::JavaVM,
    env: JniEnv,
    options: OptionList,
    _lib: Option<libloading::Library>,
}

impl Drop for VmInstance {
    fn drop(&mut self) {
        let res = unsafe { crate::jvm_call!(self.vm, DestroyJavaVM) };
        if res == jni::JNI_OK {
            info!("JVM destroyed");
        } else {
            warn!("DestroyJavaVM failed: {} ({res})", jni::result_name(res));
        }
    }
}

/// Reference-counted handle to an embedded JVM.
///
/// Clones share one VM. The VM is shut down when the last clone is dropped
/// or on the first [`VmHandle::destroy`], whichever comes first. Afterwards
/// every clone behaves as an invalid handle: lookups return `None` and calls
/// do nothing.
///
/// The handle is bound to the thread that created the VM.
#[derive(Clone)]
pub struct VmHandle {
    inner: Rc<RefCell<Option<VmInstance>>>,
}

impl VmHandle {
    /// Start a JVM with the given options, locating `libjvm` from the environment.
    pub fn create<I, S>(options: I) -> Result<Self, CreationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        VmBuilder::default().options(options)?.create()
    }

    fn env(&self) -> Option<JniEnv> {
        self.inner.borrow().as_ref().map(|instance| instance.env)
    }

    /// Whether the handle still owns a running VM.
    pub fn is_alive(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// The options the VM was started with; empty once destroyed.
    pub fn options(&self) -> Vec<String> {
        self.inner
            .borrow()
            .as_ref()
            .map(|instance| instance.options.to_strings())
            .unwrap_or_default()
    }

    /// Resolve a class by binary name, e.g. `java/lang/System`.
    pub fn find_class(&self, name: &str) -> Option<ClassRef> {
        let Some(env) = self.env() else {
            trace!("find_class({name}) on a destroyed VM");
            return None;
        };
        env.find_class(name).and_then(ClassRef::from_raw)
    }

    /// Resolve a static method by name and JNI descriptor, e.g. `("main", "([Ljava/lang/String;)V")`.
    pub fn get_static_method(&self, class: Option<ClassRef>, name: &str, signature: &str) -> Option<MethodRef> {
        let env = self.env()?;
        let class = class?;
        env.get_static_method_id(class.as_raw(), name, signature)
            .and_then(MethodRef::from_raw)
    }

    /// Invoke a static void method with no arguments.
    pub fn call_static_void_method(&self, class: Option<ClassRef>, method: Option<MethodRef>) {
        let (Some(env), Some(class), Some(method)) = (self.env(), class, method) else {
            trace!("call_static_void_method skipped: invalid VM, class or method");
            return;
        };
        env.call_static_void_method(class.as_raw(), method.as_raw());
    }

    /// Shut the VM down and release the option strings.
    ///
    /// Returns `true` if this call performed the teardown, `false` if the VM
    /// was already gone.
    pub fn destroy(&self) -> bool {
        let instance = self.inner.borrow_mut().take();
        match instance {
            Some(instance) => {
                drop(instance);
                true
            }
            None => false,
        }
    }

    /// Whether two handles share the same VM.
    pub fn same_vm(&self, other: &VmHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for VmHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmHandle")
            .field("alive", &self.is_alive())
            .field("options", &self.options())
            .finish()
    }
}

/// Non-owning reference to a resolved class. Only valid while its VM is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassRef(NonNull<c_void>);

impl ClassRef {
    pub fn from_raw(cls: jni::jclass) -> Option<Self> {
        NonNull::new(cls).map(ClassRef)
    }

    pub fn as_raw(&self) -> jni::jclass {
        self.0.as_ptr()
    }
}

/// Non-owning reference to a resolved static method. Only valid while its VM is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodRef(NonNull<c_void>);

impl MethodRef {
    pub fn from_raw(mid: jni::jmethodID) -> Option<Self> {
        NonNull::new(mid).map(MethodRef)
    }

    pub fn as_raw(&self) -> jni::jmethodID {
        self.0.as_ptr()
    }
}
