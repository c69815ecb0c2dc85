//! Base image reference value object

use std::fmt;

use crate::error::{StrataError, StrataResult};

/// A pinned base runtime reference such as `python:3.10-slim` or
/// `python@sha256:...`.
///
/// Unpinned references (no tag, or `latest`) are rejected so two builds of
/// the same recipe never pick up different interpreters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseImage {
    reference: String,
}

impl BaseImage {
    pub fn parse(reference: &str) -> StrataResult<Self> {
        let reference = reference.trim();
        let unpinned = || StrataError::UnpinnedBase {
            reference: reference.to_string(),
        };

        if reference.is_empty() || reference.chars().any(char::is_whitespace) {
            return Err(unpinned());
        }

        if let Some((name, digest)) = reference.split_once('@') {
            let hex = digest.strip_prefix("sha256:").ok_or_else(unpinned)?;
            if name.is_empty() || hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(unpinned());
            }
            return Ok(Self {
                reference: reference.to_string(),
            });
        }

        // The tag follows the last ':' after the last '/', so a registry
        // port (`host:5000/python`) is not mistaken for a tag.
        let last_segment = reference.rsplit('/').next().unwrap_or(reference);
        match last_segment.split_once(':') {
            Some((name, tag)) if !name.is_empty() && !tag.is_empty() && tag != "latest" => {
                Ok(Self {
                    reference: reference.to_string(),
                })
            }
            _ => Err(unpinned()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for BaseImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}
