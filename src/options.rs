//! Owned JVM option strings.

use std::ffi::{CStr, CString, NulError};
use std::os::raw::c_char;
use std::ptr;

use crate::sys::jni;

/// Ordered JVM startup options (`-Xmx256m`, `-Djava.class.path=...`).
///
/// Each string is copied into owned NUL-terminated storage. The
/// `JavaVMOption` array handed to `JNI_CreateJavaVM` points into that
/// storage, so the list must stay alive for as long as the VM does.
#[derive(Default)]
pub struct OptionList {
    strings: Vec<CString>,
    raw: Vec<jni::JavaVMOption>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every option, failing on the first one with an interior NUL.
    pub fn from_strs<I, S>(opts: I) -> Result<Self, NulError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for opt in opts {
            list.push(opt.as_ref())?;
        }
        Ok(list)
    }

    pub fn push(&mut self, opt: &str) -> Result<(), NulError> {
        let owned = CString::new(opt)?;
        // The CString's heap buffer does not move when `strings` reallocates.
        self.raw.push(jni::JavaVMOption {
            optionString: owned.as_ptr() as *mut c_char,
            extraInfo: ptr::null_mut(),
        });
        self.strings.push(owned);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.strings.iter().map(CString::as_c_str)
    }

    /// Lossy UTF-8 copies of the options, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|s| s.to_string_lossy().into_owned()).collect()
    }

    /// Build the descriptor for `JNI_CreateJavaVM`.
    ///
    /// The returned struct borrows this list's storage through raw pointers.
    pub fn init_args(&mut self, version: jni::jint, ignore_unrecognized: bool) -> jni::JavaVMInitArgs {
        jni::JavaVMInitArgs {
            version,
            nOptions: self.raw.len() as jni::jint,
            options: if self.raw.is_empty() {
                ptr::null_mut()
            } else {
                self.raw.as_mut_ptr()
            },
            ignoreUnrecognized: if ignore_unrecognized { jni::JNI_TRUE } else { jni::JNI_FALSE },
        }
    }
}

impl std::fmt::Debug for OptionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_args_point_at_owned_strings() {
        let mut list = OptionList::from_strs(["-Xmx64m", "-Dfoo=bar"]).unwrap();
        let args = list.init_args(jni::JNI_VERSION_1_8, false);

        assert_eq!(args.version, jni::JNI_VERSION_1_8);
        assert_eq!(args.nOptions, 2);
        assert_eq!(args.ignoreUnrecognized, jni::JNI_FALSE);

        let opts = unsafe { std::slice::from_raw_parts(args.options, 2) };
        let second = unsafe { CStr::from_ptr(opts[1].optionString) };
        assert_eq!(second.to_str().unwrap(), "-Dfoo=bar");
        assert!(opts[0].extraInfo.is_null());
    }

    #[test]
    fn empty_list_passes_null_options() {
        let mut list = OptionList::new();
        let args = list.init_args(jni::JNI_VERSION_1_8, true);
        assert_eq!(args.nOptions, 0);
        assert!(args.options.is_null());
        assert_eq!(args.ignoreUnrecognized, jni::JNI_TRUE);
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert!(OptionList::from_strs(["-Xss1m", "-Dbad=\0"]).is_err());
    }

    #[test]
    fn pointers_survive_growth() {
        let mut list = OptionList::new();
        for i in 0..64 {
            list.push(&format!("-Dkey{i}=value")).unwrap();
        }
        let args = list.init_args(jni::JNI_VERSION_1_8, false);
        let opts = unsafe { std::slice::from_raw_parts(args.options, 64) };
        let first = unsafe { CStr::from_ptr(opts[0].optionString) };
        assert_eq!(first.to_str().unwrap(), "-Dkey0=value");
        assert_eq!(list.to_strings()[63], "-Dkey63=value");
    }
}
