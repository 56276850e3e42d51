pub mod load;
pub mod save;
pub mod types;

pub use save::{add_recent_path, save_settings};
pub use types::{
    Config, DEFAULT_INTERVAL_SECONDS, DEFAULT_JPEG_QUALITY, FileTypeTable, MAX_RECENT_PATHS,
    UserSettings,
};
