pub mod loader;
pub mod overrides;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{
    Config, FetchConfig, MAX_LINES_SETTING, MessagesConfig, PasteConfig, RedirectConfig,
};
