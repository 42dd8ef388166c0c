use std::env;
use std::path::PathBuf;

/// Name of the SQLite database file inside the GiveLink directory
pub const DATABASE_FILE_NAME: &str = "givelink.db";

/// Get the path to the GiveLink directory (~/.givelink)
pub fn givelink_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".givelink")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".givelink")
    }
}

/// Default database location (~/.givelink/givelink.db)
pub fn database_file() -> PathBuf {
    givelink_dir().join(DATABASE_FILE_NAME)
}
