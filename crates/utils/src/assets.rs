use std::{env, path::PathBuf};

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
const ASSET_DIR_ENV: &str = "CONF_ASSET_DIR";

/// Data directory for the server: the SQLite database and the uploads root
/// live here. Resolution order: `CONF_ASSET_DIR` override, a repo-local
/// `dev_assets/` directory in debug builds, then the platform data dir.
pub fn asset_dir() -> PathBuf {
    let path = if let Ok(custom_dir) = env::var(ASSET_DIR_ENV) {
        PathBuf::from(custom_dir)
    } else if cfg!(debug_assertions) {
        PathBuf::from(PROJECT_ROOT).join("../../dev_assets")
    } else {
        ProjectDirs::from("org", "confdesk", "confdesk")
            .expect("OS didn't give us a home directory")
            .data_dir()
            .to_path_buf()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).expect("Failed to create asset directory");
    }

    path
    // ✔ macOS → ~/Library/Application Support/confdesk
    // ✔ Linux → ~/.local/share/confdesk (respects XDG_DATA_HOME)
    // ✔ Windows → %APPDATA%\confdesk\confdesk
}

/// Root directory for uploaded abstract documents and payment proofs.
/// Stored filenames are only ever joined onto this root, never caller paths.
pub fn uploads_dir() -> PathBuf {
    let path = asset_dir().join("uploads");
    if !path.exists() {
        std::fs::create_dir_all(&path).expect("Failed to create uploads directory");
    }
    path
}
