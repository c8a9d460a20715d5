pub mod paths;
pub mod settings;
pub mod store;

pub use paths::PathManager;
pub use settings::{RadarrSettings, Settings, SonarrSettings, TraktSettings};
pub use store::{SettingsStore, TraktAuthPatch};
