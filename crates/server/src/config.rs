use std::{collections::HashMap, fs, path::PathBuf};

use serde::Deserialize;

#[derive(Debug)]
pub struct Settings {
    pub server_bind: String,
    /// Directory the scrapers write `devices_*.json` and bandwidth logs into.
    pub output_dir: PathBuf,
}

/// Keys accepted in `server.toml`; unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            output_dir: PathBuf::from("./output"),
        }
    }
}

pub fn load_settings() -> Settings {
    let file_cfg = fs::read_to_string("server.toml").ok();
    let env: HashMap<String, String> = std::env::vars().collect();
    settings_from(file_cfg.as_deref(), &env)
}

/// Defaults, then `server.toml`, then environment; later sources win.
pub(crate) fn settings_from(file_cfg: Option<&str>, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_cfg {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.output_dir {
                    settings.output_dir = v;
                }
            }
            Err(error) => tracing::warn!(%error, "ignoring unparsable server.toml"),
        }
    }

    for key in ["SERVER_BIND", "APP__BIND_ADDR"] {
        if let Some(v) = non_empty(env, key) {
            settings.server_bind = v.to_string();
        }
    }
    for key in ["OUTPUT_DIR", "APP__OUTPUT_DIR"] {
        if let Some(v) = non_empty(env, key) {
            settings.output_dir = PathBuf::from(v);
        }
    }

    settings
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
