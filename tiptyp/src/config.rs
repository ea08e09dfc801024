use std::path::PathBuf;

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use tally::{Configuration, GenerationMode, Language, SupplyRequest, clock::Duration};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "TIPTYP_";

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),
}

/// Where target words come from
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Generator {
    #[default]
    Words,
    Model,
    Syllable,
}

impl From<Generator> for GenerationMode {
    fn from(value: Generator) -> Self {
        match value {
            Generator::Words => Self::Words,
            Generator::Model => Self::Model,
            Generator::Syllable => Self::Syllable,
        }
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WordLanguage {
    #[default]
    Ru,
    En,
}

impl From<WordLanguage> for Language {
    fn from(value: WordLanguage) -> Self {
        match value {
            WordLanguage::Ru => Self::Ru,
            WordLanguage::En => Self::En,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    pub letter_limit: usize,
    pub word_limit: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        let defaults = Configuration::default();
        Self {
            letter_limit: defaults.letter_report_limit,
            word_limit: defaults.word_list_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub word_count: usize,
    pub generator: Generator,
    pub language: WordLanguage,
    pub tick_interval_ms: u64,
    pub report: ReportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_count: SupplyRequest::DEFAULT_COUNT,
            generator: Generator::default(),
            language: WordLanguage::default(),
            tick_interval_ms: 200,
            report: ReportSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings: defaults, then `settings.toml`, then `TIPTYP_*` variables
    ///
    /// Nested keys use a double underscore, e.g. `TIPTYP_REPORT__WORD_LIMIT`.
    pub fn load(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Grab default configuration
        let mut settings = Figment::from(Serialized::defaults(Self::default()));

        // Check for toml file location
        let config_dir = override_path
            .or_else(config_dir)
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let settings_toml = config_dir.join(SETTINGS_FILE);
        if settings_toml.exists() {
            settings = settings.merge(Toml::file(&settings_toml));
        }

        settings = settings.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut settings: Self = settings.extract().map_err(Box::new)?;
        settings.word_count = settings
            .word_count
            .clamp(SupplyRequest::MIN_COUNT, SupplyRequest::MAX_COUNT);

        tracing::debug!(?settings, dir = %config_dir.display(), "loaded settings");
        Ok(settings)
    }

    /// Engine configuration derived from these settings
    pub fn engine_configuration(&self) -> Configuration {
        Configuration {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            letter_report_limit: self.report.letter_limit,
            word_list_limit: self.report.word_limit,
        }
    }

    pub fn supply_request(&self) -> SupplyRequest {
        SupplyRequest::new(
            self.word_count,
            self.generator.into(),
            self.language.into(),
        )
    }
}

pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "TipTyp", "TipTyp").map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|jail| {
            let settings = Settings::load(Some(jail.directory().to_path_buf()))
                .map_err(|error| error.to_string())?;
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.engine_configuration(), Configuration::default());
            assert_eq!(settings.supply_request(), SupplyRequest::default());
            Ok(())
        });
    }

    #[test]
    fn test_settings_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE,
                r#"
                word_count = 40
                generator = "syllable"
                language = "en"

                [report]
                word_limit = 5
                "#,
            )?;

            let settings = Settings::load(Some(jail.directory().to_path_buf()))
                .map_err(|error| error.to_string())?;
            assert_eq!(settings.word_count, 40);
            assert_eq!(settings.generator, Generator::Syllable);
            assert_eq!(settings.language, WordLanguage::En);
            assert_eq!(settings.report.word_limit, 5);
            assert_eq!(settings.report.letter_limit, 8);

            let request = settings.supply_request();
            assert_eq!(request.mode, GenerationMode::Syllable);
            assert_eq!(request.language, Language::En);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(SETTINGS_FILE, "word_count = 40\ntick_interval_ms = 100")?;
            jail.set_env("TIPTYP_WORD_COUNT", "60");
            jail.set_env("TIPTYP_REPORT__LETTER_LIMIT", "3");

            let settings = Settings::load(Some(jail.directory().to_path_buf()))
                .map_err(|error| error.to_string())?;
            assert_eq!(settings.word_count, 60);
            assert_eq!(settings.tick_interval_ms, 100);
            assert_eq!(settings.report.letter_limit, 3);
            assert_eq!(
                settings.engine_configuration().tick_interval,
                Duration::from_millis(100)
            );
            Ok(())
        });
    }

    #[test]
    fn test_word_count_is_clamped() {
        Jail::expect_with(|jail| {
            jail.set_env("TIPTYP_WORD_COUNT", "500");
            let settings = Settings::load(Some(jail.directory().to_path_buf()))
                .map_err(|error| error.to_string())?;
            assert_eq!(settings.word_count, 100);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_generator_is_a_parse_error() {
        Jail::expect_with(|jail| {
            jail.create_file(SETTINGS_FILE, r#"generator = "markov""#)?;
            let result = Settings::load(Some(jail.directory().to_path_buf()));
            assert!(matches!(result, Err(ConfigError::Parse(_))));
            Ok(())
        });
    }

    #[test]
    fn test_creates_missing_directory() {
        Jail::expect_with(|jail| {
            let dir = jail.directory().join("nested").join("config");
            Settings::load(Some(dir.clone())).map_err(|error| error.to_string())?;
            assert!(dir.is_dir());
            Ok(())
        });
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(Generator::VARIANTS, &["words", "model", "syllable"]);
        assert_eq!("model".parse::<Generator>().ok(), Some(Generator::Model));
        assert_eq!(WordLanguage::En.to_string(), "en");
        let name: &'static str = Generator::Syllable.into();
        assert_eq!(name, "syllable");
    }
}
