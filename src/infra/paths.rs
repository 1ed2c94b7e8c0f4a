// src/infra/paths.rs — Config file location
//
// PARABLE_HOME overrides everything. Otherwise config lives in ~/.parable/.

use std::path::PathBuf;

/// Returns the PARABLE_HOME override, if set.
fn parable_home() -> Option<PathBuf> {
    std::env::var_os("PARABLE_HOME").map(PathBuf::from)
}

/// Configuration directory: $PARABLE_HOME/ or ~/.parable/
pub fn config_dir() -> PathBuf {
    if let Some(home) = parable_home() {
        return home;
    }
    dirs_home().join(".parable")
}

/// Home directory, or the working directory when none can be determined
/// (containers running as a user without a passwd entry).
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_is_named_config_toml() {
        let path = config_file_path();
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
