//! Data and config directory resolution

use std::path::PathBuf;

use directories::ProjectDirs;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        std::env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        std::env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "feedkit", env!("CARGO_PKG_NAME"))
}

/// Where logs and other runtime data go. Overridable with `FEEDKIT_DATA`.
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = DATA_FOLDER.clone() {
        dir
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

/// Where a host's config file is looked up. Overridable with `FEEDKIT_CONFIG`.
pub fn get_config_dir() -> PathBuf {
    if let Some(dir) = CONFIG_FOLDER.clone() {
        dir
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

pub fn version() -> String {
    let commit = env!("_GIT_INFO");
    let data_dir = get_data_dir().display().to_string();
    let config_dir = get_config_dir().display().to_string();

    format!("{commit}\n\nData directory: {data_dir}\nConfig directory: {config_dir}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_resolve_to_something() {
        assert!(!get_data_dir().as_os_str().is_empty());
        assert!(!get_config_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_log_names() {
        assert_eq!(LOG_FILE.as_str(), "feedkit.log");
        assert_eq!(LOG_ENV.as_str(), "FEEDKIT_LOGLEVEL");
    }

    #[test]
    fn test_version_mentions_directories() {
        let version = version();
        assert!(version.contains("Data directory:"));
        assert!(version.contains("Config directory:"));
    }
}
