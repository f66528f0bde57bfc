use crate::{AppConfig, DirCompareError};
use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "dircompare.toml";

/// Locate `dircompare.toml`. A copy beside the executable wins when it exists
/// or when `portable` is set; otherwise the per-user config directory is used.
pub fn config_path(portable: bool) -> Result<PathBuf, DirCompareError> {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)));

    match beside_exe {
        Some(path) if portable || path.is_file() => Ok(path),
        _ => ProjectDirs::from("", "", "dircompare")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or_else(|| DirCompareError::Config("no home directory to look for dircompare.toml in".to_string())),
    }
}

/// Read settings from `path`. A missing file means defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, DirCompareError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(e.into()),
    };

    // toml's Display spans several lines with a source excerpt; keep one
    toml::from_str(&data)
        .map_err(|e| DirCompareError::Config(format!("{}: {}", path.display(), e.message())))
}
