use std::{env, io, path::PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";

#[cfg(all(target_family = "unix", not(target_os = "macos")))]
pub fn config_dir() -> Result<PathBuf, io::Error> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Ok(PathBuf::from(xdg).join("releasefeed"));
        }
    }
    env::var("HOME")
        .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "HOME not found"))
        .map(|home| PathBuf::from(home).join(".config/releasefeed"))
}

#[cfg(target_os = "macos")]
pub fn config_dir() -> Result<PathBuf, io::Error> {
    env::var("HOME")
        .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "HOME not found"))
        .map(|home| PathBuf::from(home).join("Library/Application Support/releasefeed"))
}

#[cfg(target_family = "windows")]
pub fn config_dir() -> Result<PathBuf, io::Error> {
    env::var("APPDATA")
        .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "APPDATA not found"))
        .map(|appdata| PathBuf::from(appdata).join("releasefeed"))
}

pub fn default_config_path() -> Result<PathBuf, io::Error> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
