//! Environment-driven settings.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `RUST_PORT` | `8080` | listen port |
//! | `RUST_APP` | `posts` | route set: `posts`, `basics` or `errors` |
//! | `RUST_STORE_BUFFER` | `32` | posts store channel capacity, at least 1 |
//! | `RUST_PUBLIC_DIR` | unset | static asset directory |

use std::{env, fmt::Display, num::NonZeroUsize, path::PathBuf, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Which route set the server mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Posts,
    Basics,
    Errors,
}

impl FromStr for AppKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posts" => Ok(AppKind::Posts),
            "basics" => Ok(AppKind::Basics),
            "errors" => Ok(AppKind::Errors),
            other => Err(format!("unknown app {other:?}, expected posts, basics or errors")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub app: AppKind,
    pub store_buffer: NonZeroUsize,
    pub public_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "8080")?,
            app: try_load(&lookup, "RUST_APP", "posts")?,
            store_buffer: try_load(&lookup, "RUST_STORE_BUFFER", "32")?,
            public_dir: lookup("RUST_PUBLIC_DIR").map(PathBuf::from),
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.app, AppKind::Posts);
        assert_eq!(config.store_buffer.get(), 32);
        assert_eq!(config.public_dir, None);
    }

    #[test]
    fn values_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("RUST_PORT", "3000"),
            ("RUST_APP", "Errors"),
            ("RUST_PUBLIC_DIR", "public"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.app, AppKind::Errors);
        assert_eq!(config.public_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[("RUST_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "RUST_PORT"));

        assert!(Config::from_lookup(lookup(&[("RUST_APP", "shop")])).is_err());

        let err = Config::from_lookup(lookup(&[("RUST_STORE_BUFFER", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "RUST_STORE_BUFFER"));
    }
}
