//! Locating the `libjvm` shared library.
//!
//! Lookup order: `JVM_LIB_PATH` (an explicit path to the library), then the
//! usual server/client layouts under `JAVA_HOME`.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::CreationError;

/// Environment variable naming the library file directly.
pub const JVM_LIB_PATH: &str = "JVM_LIB_PATH";
/// Environment variable naming the JDK/JRE root.
pub const JAVA_HOME: &str = "JAVA_HOME";

#[cfg(target_os = "windows")]
const LIBJVM: &str = "jvm.dll";
#[cfg(target_os = "macos")]
const LIBJVM: &str = "libjvm.dylib";
#[cfg(all(unix, not(target_os = "macos")))]
const LIBJVM: &str = "libjvm.so";

/// Directories under `JAVA_HOME` that hold `libjvm`. `{arch}` is replaced by
/// the target architecture.
const JDK_LAYOUTS: &[&str] = &[
    "lib/server",
    "jre/lib/server",
    "lib/{arch}/server",
    "jre/lib/{arch}/server",
];

/// Windows JDKs keep the VM next to the launchers instead.
const WINDOWS_LAYOUTS: &[&str] = &["bin/server", "jre/bin/server", "bin/client", "jre/bin/client"];

/// Platform file name of the VM library.
pub fn libjvm_filename() -> &'static str {
    LIBJVM
}

/// Every path under `java_home` that may hold `libjvm`, in lookup order.
pub fn candidates_from_java_home(java_home: &Path) -> Vec<PathBuf> {
    let windows: &[&str] = if cfg!(target_os = "windows") { WINDOWS_LAYOUTS } else { &[] };
    JDK_LAYOUTS
        .iter()
        .chain(windows)
        .map(|dir| {
            java_home
                .join(dir.replace("{arch}", std::env::consts::ARCH))
                .join(LIBJVM)
        })
        .collect()
}

/// First existing `libjvm` under `java_home`.
pub fn find_libjvm_in(java_home: &Path) -> Result<PathBuf, CreationError> {
    candidates_from_java_home(java_home)
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| {
            CreationError::Locate(format!(
                "Could not find {} under {JAVA_HOME}={}. Set {JVM_LIB_PATH} explicitly.",
                libjvm_filename(),
                java_home.display()
            ))
        })
}

/// Try to locate `libjvm` using `JVM_LIB_PATH` or `JAVA_HOME`.
pub fn find_libjvm() -> Result<PathBuf, CreationError> {
    if let Some(path) = std::env::var_os(JVM_LIB_PATH) {
        let path = PathBuf::from(path);
        if path.exists() {
            debug!("using libjvm from {JVM_LIB_PATH}: {}", path.display());
            return Ok(path);
        }
        return Err(CreationError::Locate(format!(
            "{JVM_LIB_PATH} is set but does not exist: {}",
            path.display()
        )));
    }

    if let Some(java_home) = std::env::var_os(JAVA_HOME) {
        let path = find_libjvm_in(Path::new(&java_home))?;
        debug!("using libjvm from {JAVA_HOME}: {}", path.display());
        return Ok(path);
    }

    Err(CreationError::Locate(format!(
        "{JAVA_HOME} is not set. Set {JAVA_HOME} or {JVM_LIB_PATH} to locate libjvm."
    )))
}
