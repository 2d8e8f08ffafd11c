use crate::tree::BuildConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "gst";
const CONFIG_FILE: &str = "config.json";

/// Load the build configuration
///
/// An explicit path must exist. Without one, the config file in the app
/// data directory is used when present, defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<BuildConfig> {
    match explicit {
        Some(path) => read_config(path),
        None => match get_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(BuildConfig::default()),
        },
    }
}

/// Save config to `path`, or to the app data directory
pub fn save_config(config: &BuildConfig, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = get_app_data_dir()?;
            fs::create_dir_all(&dir)?;
            dir.join(CONFIG_FILE)
        }
    };
    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, content).context("Failed to write config file")?;
    Ok(path)
}

fn read_config(path: &Path) -> Result<BuildConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: BuildConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Get the path to the default config file
pub fn get_config_path() -> Option<PathBuf> {
    get_app_data_dir().ok().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    Ok(base.join(APP_NAME))
}
