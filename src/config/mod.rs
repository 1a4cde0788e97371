mod manager;

pub use manager::{
    ChatSection, ConfigFile, ConfigManager, EngineSection, ResolveOptions, ResolvedConfig,
    resolve_config,
};
