//! Host platform utility functions

use std::path::PathBuf;

/// Environment variable holding the root directory of the navigation software.
pub const SW_ROOT_ENV_VAR: &str = "NAV_SW_ROOT";

/// Get the root directory of the software, under which the `params` and `sessions` directories
/// are found.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
