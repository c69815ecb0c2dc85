//! System package set value object

use crate::error::{StrataError, StrataResult};

/// Ordered, de-duplicated list of OS packages.
///
/// Declaration order is kept because it is part of the install command and
/// therefore of the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageSet {
    names: Vec<String>,
}

impl PackageSet {
    pub fn new<I, S>(names: I) -> StrataResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            let name = name.as_ref().trim();
            if !is_valid_package_name(name) {
                return Err(StrataError::InvalidPackage {
                    name: name.to_string(),
                });
            }
            if !set.names.iter().any(|existing| existing == name) {
                set.names.push(name.to_string());
            }
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Space-separated form substituted for `{packages}`
    pub fn joined(&self) -> String {
        self.names.join(" ")
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Debian-style package names plus an optional `=version` pin.
fn is_valid_package_name(name: &str) -> bool {
    let (pkg, version) = match name.split_once('=') {
        Some((pkg, version)) => (pkg, Some(version)),
        None => (name, None),
    };
    let pkg_ok = pkg
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
        && pkg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | ':'));
    let version_ok = version.map_or(true, |v| {
        !v.is_empty()
            && v.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | ':' | '~'))
    });
    pkg_ok && version_ok
}
