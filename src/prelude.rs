//! Common imports for driving an embedded JVM.

pub use crate::error::{CallError, CreationError};
pub use crate::plugin::{Extension, Value};
pub use crate::sys::jni;
pub use crate::vm::{ClassRef, MethodRef, VmBuilder, VmHandle};
