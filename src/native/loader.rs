//! Shared-library loader.
//!
//! Resolves a symbolic library name ("fluidsynth") to a platform artifact
//! through the system's dynamic-linker search path and loads it into the
//! process. Loaded libraries are cached per name for the life of the process;
//! loading the same library twice is idempotent at the OS level, so the cache
//! only saves the repeated lookups.

use super::binding::BindingError;
use libloading::Library;
use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Major versions tried when the unversioned development symlink is absent.
const SONAME_VERSIONS: [u32; 3] = [3, 2, 1];

static LOADED: OnceLock<Mutex<HashMap<String, Arc<Library>>>> = OnceLock::new();

/// Loads a shared library by symbolic name.
///
/// # Arguments
///
/// * `name` - Library name without prefix, suffix or version ("fluidsynth")
///
/// # Returns
///
/// The loaded library, shared with every other caller that asked for the
/// same name.
///
/// # Errors
///
/// `LibraryNotFound` if none of the candidate file names can be loaded.
pub fn load_library(name: &str) -> Result<Arc<Library>, BindingError> {
    let cache = LOADED.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(library) = cache.get(name) {
        return Ok(Arc::clone(library));
    }

    for candidate in candidate_file_names(name) {
        // SAFETY: loading runs the library's initialisers; the libraries we
        // load are plain C libraries without unusual constructors.
        match unsafe { Library::new(&candidate) } {
            Ok(library) => {
                tracing::debug!("Loaded {} from {:?}", name, candidate);
                let library = Arc::new(library);
                cache.insert(name.to_string(), Arc::clone(&library));
                return Ok(library);
            }
            Err(e) => tracing::trace!("Cannot load {:?}: {}", candidate, e),
        }
    }

    Err(BindingError::LibraryNotFound {
        name: name.to_string(),
    })
}

/// Returns the file names tried for a symbolic library name, most specific
/// platform convention first.
pub fn candidate_file_names(name: &str) -> Vec<OsString> {
    let mut candidates = vec![libloading::library_filename(name)];

    for version in SONAME_VERSIONS {
        if cfg!(target_os = "macos") {
            candidates.push(format!("lib{name}.{version}.dylib").into());
        } else if cfg!(windows) {
            candidates.push(format!("lib{name}-{version}.dll").into());
        } else {
            candidates.push(format!("lib{name}.so.{version}").into());
        }
    }

    candidates
}
