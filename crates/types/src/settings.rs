//! Target platform settings

use crate::options::BuildType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The platform triple a package is built for
///
/// `os`, `compiler`, and `arch` are free-form, matching whatever the
/// surrounding driver declares; `build_type` is enumerated because the
/// generator backend maps it onto a cache variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub os: String,
    pub compiler: String,
    pub build_type: BuildType,
    pub arch: String,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.os, self.compiler, self.build_type, self.arch
        )
    }
}
