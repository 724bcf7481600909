//! Error types.
//!
//! Only VM creation reports an adapter error. Lookups and calls against a
//! dead handle or a null reference degrade to `None` / no-op instead.

use std::ffi::NulError;

use crate::sys::jni;

/// Why an embedded JVM could not be started.
#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    /// An option string contains an interior NUL byte.
    #[error("invalid option (NUL byte): {0}")]
    InvalidOption(#[from] NulError),

    /// `libjvm` could not be found.
    #[error("{0}")]
    Locate(String),

    /// `libjvm` could not be loaded or does not export `JNI_CreateJavaVM`.
    #[error("failed to load libjvm: {0}")]
    Load(#[from] libloading::Error),

    /// `JNI_CreateJavaVM` returned an error code.
    #[error("JNI_CreateJavaVM failed: {} ({code})", code_name(.code))]
    Jni { code: jni::jint },

    /// `JNI_CreateJavaVM` reported success without handing back a VM and env.
    #[error("JNI_CreateJavaVM returned a null JavaVM or JNIEnv")]
    NullVm,
}

fn code_name(code: &jni::jint) -> &'static str {
    jni::result_name(*code)
}

/// Host-side misuse of a plugin callable.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("no function named `{0}` in the jvm extension")]
    UnknownFunction(String),

    #[error("{function}: expected {expected} argument(s), got {got}")]
    Arity {
        function: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{function}: argument {index} expected {expected}, got {got}")]
    TypeMismatch {
        function: &'static str,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error(transparent)]
    Creation(#[from] CreationError),
}
