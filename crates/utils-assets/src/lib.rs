use std::path::PathBuf;

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
const DATA_DIR_ENV: &str = "TASKDECK_DATA_DIR";

/// Resolve the app data directory, creating it if necessary.
///
/// `TASKDECK_DATA_DIR` overrides everything (tests point it at a temp dir);
/// debug builds fall back to a repo-local `dev_assets/` so developer state
/// never lands in the real user profile.
pub fn asset_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var(DATA_DIR_ENV) {
        let override_dir = override_dir.trim();
        if !override_dir.is_empty() {
            let path = PathBuf::from(override_dir);
            if !path.exists() {
                std::fs::create_dir_all(&path).expect("Failed to create data directory");
            }
            return path;
        }
    }

    let path = if cfg!(debug_assertions) {
        PathBuf::from(PROJECT_ROOT).join("../../dev_assets")
    } else {
        ProjectDirs::from("", "", "taskdeck")
            .expect("OS didn't give us a home directory")
            .data_dir()
            .to_path_buf()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).expect("Failed to create data directory");
    }

    path
    // ✔ macOS → ~/Library/Application Support/taskdeck
    // ✔ Linux → ~/.local/share/taskdeck   (respects XDG_DATA_HOME)
    // ✔ Windows → %APPDATA%\taskdeck
}

pub fn db_path() -> PathBuf {
    asset_dir().join("db.sqlite")
}

pub fn session_path() -> PathBuf {
    asset_dir().join("session.json")
}

pub fn guest_tasks_path() -> PathBuf {
    asset_dir().join("guest-tasks.json")
}

pub fn port_file_path() -> PathBuf {
    asset_dir().join("taskdeckd.port")
}

/// Record the server's bound port so a local client can find it without
/// configuration.
pub fn write_port_file(port: u16) -> std::io::Result<()> {
    std::fs::write(port_file_path(), port.to_string())
}

/// Read back the recorded port, if a server has written one.
pub fn read_port_file() -> Option<u16> {
    let contents = std::fs::read_to_string(port_file_path()).ok()?;
    contents.trim().parse().ok()
}
