//! Configuration for the hearth session server.
//!
//! Provides TOML-based configuration with:
//! - `[server]` and `[session]` sections, all fields optional
//! - Config file layering (user config dir + project-local `hearth.toml`)
//! - Session key resolution (env var → config file, with warning)

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, config_dir, load_config, load_config_file, load_config_with_options,
    user_config_path,
};
pub use error::{ConfigError, Result};
pub use secrets::{
    ResolvedKey, SESSION_KEY_ENV, SESSION_KEY_LEN, SecretSource, decode_session_key,
    encode_session_key, resolve_session_key, resolve_session_key_with,
};
pub use types::*;
