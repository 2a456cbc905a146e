use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use hitstand_client::controller::DEFAULT_TOURNAMENT_HANDS;
use serde::{Deserialize, Serialize};

pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Values remembered between runs. Flags given on the command line win over these.
///
/// Log verbosity is per run and never saved.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedConfig {
    pub url: Option<String>,
    pub hands: Option<i64>,
    pub emoji: Option<bool>,
}

/// Effective settings after merging flags, persisted config and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: String,
    pub hands: i64,
    pub emoji: bool,
    pub verbose: bool,
}

impl Settings {
    /// `emoji` is `Some` only when `--emoji` or `--no-emoji` was given.
    pub fn resolve(
        url: Option<String>,
        hands: Option<i64>,
        emoji: Option<bool>,
        verbose: bool,
        cfg: &PersistedConfig,
    ) -> Self {
        let hands = match hands.or(cfg.hands) {
            None | Some(0) => DEFAULT_TOURNAMENT_HANDS,
            Some(hands) => hands,
        };
        Self {
            url: url
                .or_else(|| cfg.url.clone())
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            hands,
            emoji: emoji.or(cfg.emoji).unwrap_or(false),
            verbose,
        }
    }

    pub fn persisted(&self) -> PersistedConfig {
        PersistedConfig {
            url: Some(self.url.clone()),
            hands: Some(self.hands),
            emoji: Some(self.emoji),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "hitstand", "terminal")
}

fn config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.json"))
}

/// Where the interactive client writes its log.
pub fn log_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().join("hitstand.log"))
}

pub fn load_config() -> Option<PersistedConfig> {
    let path = config_path()?;
    let data = std::fs::read(path).ok()?;
    serde_json::from_slice(&data).ok()
}

pub fn save_config(cfg: &PersistedConfig) -> Result<()> {
    if let Some(path) = config_path() {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create config dir {}", dir.display()))?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        std::fs::write(&path, data).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags_or_config() {
        let settings = Settings::resolve(None, None, None, false, &PersistedConfig::default());
        assert_eq!(settings.url, DEFAULT_URL);
        assert_eq!(settings.hands, 1000);
        assert!(!settings.emoji);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_flags_override_persisted() {
        let cfg = PersistedConfig {
            url: Some("http://sim.local:8080".into()),
            hands: Some(250),
            emoji: Some(true),
        };
        let from_cfg = Settings::resolve(None, None, None, false, &cfg);
        assert_eq!(from_cfg.url, "http://sim.local:8080");
        assert_eq!(from_cfg.hands, 250);
        assert!(from_cfg.emoji);

        let flagged = Settings::resolve(Some("http://other:5000".into()), Some(50), None, true, &cfg);
        assert_eq!(flagged.url, "http://other:5000");
        assert_eq!(flagged.hands, 50);
        assert!(flagged.verbose);
    }

    #[test]
    fn test_emoji_can_be_turned_off_again() {
        let on = Settings::resolve(None, None, Some(true), false, &PersistedConfig::default());
        let cfg = on.persisted();
        assert_eq!(cfg.emoji, Some(true));

        let off = Settings::resolve(None, None, Some(false), false, &cfg);
        assert!(!off.emoji);
        assert_eq!(off.persisted().emoji, Some(false));
    }

    #[test]
    fn test_verbose_is_not_remembered() {
        let verbose = Settings::resolve(None, None, None, true, &PersistedConfig::default());
        let json = serde_json::to_value(verbose.persisted()).unwrap();
        assert!(json.get("verbose").is_none());

        let next = Settings::resolve(None, None, None, false, &verbose.persisted());
        assert!(!next.verbose);
    }

    #[test]
    fn test_zero_hands_falls_back() {
        let settings = Settings::resolve(None, Some(0), None, false, &PersistedConfig::default());
        assert_eq!(settings.hands, DEFAULT_TOURNAMENT_HANDS);
    }

    #[test]
    fn test_persisted_round_trip() {
        let settings = Settings::resolve(None, Some(64), Some(true), false, &PersistedConfig::default());
        let cfg = settings.persisted();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PersistedConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(Settings::resolve(None, None, None, false, &back), settings);
    }

    #[test]
    fn test_older_config_with_verbose_still_loads() {
        let cfg: PersistedConfig =
            serde_json::from_str(r#"{"url":null,"hands":10,"emoji":false,"verbose":true}"#).unwrap();
        assert_eq!(cfg.hands, Some(10));
    }
}
