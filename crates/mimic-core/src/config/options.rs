//! Handler construction options.

use crate::config::error::ConfigResult;
use crate::config::parser::{load_file, parse_config};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options fixed at handler construction.
///
/// Missing fields take their defaults, so `{}` is a valid options document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerOptions {
    /// Compare URIs as written instead of lowercased. Methods are always
    /// compared exactly.
    pub case_sensitive: bool,
    /// Fail with `MissingRegistration` instead of returning no response
    pub throw_on_missing_registration: bool,
}

impl HandlerOptions {
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    pub fn throw_on_missing_registration(mut self, value: bool) -> Self {
        self.throw_on_missing_registration = value;
        self
    }

    /// Parse options from content; `path` only selects the format.
    pub fn from_content(content: &str, path: &str) -> ConfigResult<Self> {
        parse_config(content, path)
    }

    /// Read options from a YAML, JSON or JSONC file.
    pub async fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        load_file(path.as_ref()).await
    }
}
