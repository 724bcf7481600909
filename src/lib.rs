//! # jvm-plugin
//!
//! Embed a Java Virtual Machine behind a scripting host's extension table.
//!
//! The plugin lets a host script:
//! - start a JVM with a list of option strings
//! - resolve a class by name and a static method by name and descriptor
//! - invoke a static `void` method
//!
//! `libjvm` is located at runtime (`JVM_LIB_PATH`, then `JAVA_HOME`) and
//! loaded with `libloading`; nothing links against it at build time.
//!
//! ## Quick Start
//!
//! From Rust:
//!
//! ```rust,ignore
//! use jvm_plugin::prelude::*;
//!
//! let vm = VmHandle::create(["-Djava.class.path=./hello.jar"])?;
//! let hello = vm.find_class("com/example/Hello");
//! let greet = vm.get_static_method(hello, "greet", "()V");
//! vm.call_static_void_method(hello, greet);
//! vm.destroy();
//! ```
//!
//! From a host, through the extension table:
//!
//! ```rust,ignore
//! let ext = jvm_plugin::plugin::init();
//! let vm = ext.call("create_JavaVM", &[Value::List(vec!["-Xmx256m".into()])])?;
//! let cls = ext.call("find_class", &[vm.clone(), "java/lang/System".into()])?;
//! let gc = ext.call("get_static_method", &[vm.clone(), cls.clone(), "gc".into(), "()V".into()])?;
//! ext.call("call_static_void_method", &[vm, cls, gc, Value::List(vec![])])?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Host scripting runtime                   │
//! ├─────────────────────────────────────────────────────────┤
//! │            plugin::Extension (name → callable)           │
//! │     create_JavaVM, find_class, get_static_method, ...    │
//! ├─────────────────────────────────────────────────────────┤
//! │                  vm::VmHandle adapter                    │
//! │   Rc-owned JavaVM*, JNIEnv*, option strings, libjvm      │
//! ├─────────────────────────────────────────────────────────┤
//! │         env::JniEnv            locate / options          │
//! ├─────────────────────────────────────────────────────────┤
//! │              Raw FFI Bindings (sys::jni)                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure model
//!
//! Only VM creation fails loudly, with [`CreationError`]. Looking up a class
//! or method that does not exist, or using a destroyed VM, yields `None`
//! (`null` on the host side); calling with a missing class or method does
//! nothing. Java exceptions raised by a lookup or call are printed by the VM
//! and cleared.
//!
//! ## Threading
//!
//! Everything here is single-threaded. The `JNIEnv*` kept by [`VmHandle`]
//! belongs to the thread that created the VM, and the handle is `!Send`.

pub mod sys;
pub mod env;
pub mod error;
pub mod locate;
pub mod options;
pub mod plugin;
pub mod prelude;
pub mod vm;

pub use crate::sys::jni;
pub use error::{CallError, CreationError};
pub use plugin::{init, Extension, Value};
pub use vm::{ClassRef, MethodRef, VmBuilder, VmHandle};
