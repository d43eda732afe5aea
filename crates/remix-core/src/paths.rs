use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const REMIX_DIR: &str = ".remix";
pub const CONFIG_FILE: &str = "config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn remix_dir(root: &Path) -> PathBuf {
    root.join(REMIX_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    remix_dir(root).join(CONFIG_FILE)
}
