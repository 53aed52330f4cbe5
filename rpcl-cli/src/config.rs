//! Config file profiles.
//!
//! The config file is TOML. Top-level keys form the base profile and named
//! profiles live under `[profiles.<name>]`:
//!
//! ```toml
//! descriptor = "~/api/descriptor.json"
//! target = "127.0.0.1:8080"
//!
//! [metadata]
//! x-team = ["core"]
//!
//! [profiles.staging]
//! target = "staging.internal:443"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub descriptor: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    base: Profile,

    #[serde(default)]
    profiles: HashMap<String, Profile>,
}

impl Profile {
    /// Overlay `other` on top of `self`; set options and metadata keys win.
    pub fn merge(mut self, other: Profile) -> Profile {
        if other.target.is_some() {
            self.target = other.target;
        }
        if other.descriptor.is_some() {
            self.descriptor = other.descriptor;
        }
        for (key, values) in other.metadata {
            self.metadata.insert(key.to_lowercase(), values);
        }
        self
    }

    /// Append metadata pairs from the command line.
    pub fn append_metadata(&mut self, pairs: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in pairs {
            self.metadata.entry(key).or_default().push(value);
        }
    }

    /// Resolved descriptor path; a descriptor is required.
    pub fn descriptor_path(&self) -> Result<PathBuf> {
        match &self.descriptor {
            Some(descriptor) => Ok(resolve_path(descriptor)),
            None => bail!("descriptor cannot be empty, you must set it in the config file or pass it as argument"),
        }
    }
}

/// Default config location, `<config dir>/rpcl/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rpcl").join("config.toml"))
}

/// Load `profile` from the config file at `path`.
///
/// A missing file yields an empty profile.
pub fn load_profile(path: &Path, profile: &str) -> Result<Profile> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot open config file {}", path.display()))?;
        toml::from_str::<ConfigFile>(&content)
            .with_context(|| format!("cannot parse config file {}", path.display()))?
    } else {
        ConfigFile::default()
    };

    if profile == DEFAULT_PROFILE {
        return Ok(config.base);
    }

    let mut profiles = config.profiles;
    match profiles.remove(profile) {
        Some(named) => Ok(config.base.merge(named)),
        None => bail!("unknown profile {profile} in config file {}", path.display()),
    }
}

/// Expand a leading `~` to the home directory.
pub fn resolve_path(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const CONFIG: &str = r#"
descriptor = "api.json"
target = "localhost:8080"

[metadata]
x-team = ["core"]
x-env = ["dev"]

[profiles.staging]
target = "staging:443"

[profiles.staging.metadata]
x-env = ["staging"]
"#;

    #[test]
    fn default_profile_is_the_base() {
        let file = config(CONFIG);
        let profile = load_profile(file.path(), DEFAULT_PROFILE).unwrap();
        assert_eq!(profile.descriptor.as_deref(), Some("api.json"));
        assert_eq!(profile.target.as_deref(), Some("localhost:8080"));
        assert_eq!(profile.metadata["x-env"], vec!["dev"]);
    }

    #[test]
    fn named_profile_overrides_base() {
        let file = config(CONFIG);
        let profile = load_profile(file.path(), "staging").unwrap();
        assert_eq!(profile.descriptor.as_deref(), Some("api.json"));
        assert_eq!(profile.target.as_deref(), Some("staging:443"));
        assert_eq!(profile.metadata["x-env"], vec!["staging"]);
        assert_eq!(profile.metadata["x-team"], vec!["core"]);
    }

    #[test]
    fn unknown_profile_fails() {
        let file = config(CONFIG);
        let err = load_profile(file.path(), "prod").unwrap_err();
        assert!(err.to_string().contains("unknown profile prod"));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let profile = load_profile(&dir.path().join("none.toml"), DEFAULT_PROFILE).unwrap();
        assert_eq!(profile, Profile::default());
        assert!(profile.descriptor_path().is_err());
    }

    #[test]
    fn malformed_file_fails() {
        let file = config("descriptor = [");
        assert!(load_profile(file.path(), DEFAULT_PROFILE).is_err());
    }

    #[test]
    fn metadata_flags_append() {
        let mut profile = Profile::default().merge(Profile {
            metadata: BTreeMap::from([("x-a".to_string(), vec!["1".to_string()])]),
            ..Profile::default()
        });
        profile.append_metadata([("x-a".to_string(), "2".to_string()), ("x-b".to_string(), "3".to_string())]);
        assert_eq!(profile.metadata["x-a"], vec!["1", "2"]);
        assert_eq!(profile.metadata["x-b"], vec!["3"]);
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir");
        assert_eq!(resolve_path("~/api.json"), home.join("api.json"));
        assert_eq!(resolve_path("~"), home);
        assert_eq!(resolve_path("./api.json"), PathBuf::from("./api.json"));
    }
}
