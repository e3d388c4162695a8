//! Environment variable lookup.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::hash::BuildHasher;

/// Source of environment variables for one resolution.
pub trait Environment {
    /// Returns the value of `name`, or `None` when it is not set or not
    /// valid Unicode.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Returns the raw value of `name`, or `None` when it is not set.
    ///
    /// Resolution reads variables through this method, so a variable that is
    /// set to non-Unicode data is reported instead of skipped.
    fn lookup_os(&self, name: &str) -> Option<OsString> {
        self.lookup(name).map(OsString::from)
    }
}

/// The environment of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn lookup_os(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }

    fn lookup_os(&self, name: &str) -> Option<OsString> {
        (**self).lookup_os(name)
    }
}
