//! Settings: word list location, bag exclusions, rack and board sizes
//!
//! Read from `wordgrid.toml` in the platform config directory (via the
//! `directories` crate). Every field is optional; missing fields keep their
//! defaults. `WORDGRID_WORDS` overrides the word list path.

use crate::game::bag::Bag;
use crate::game::board::{Board, Viewport};
use crate::game::dictionary::{Dictionary, DictionaryError};
use crate::game::rack::{Rack, DEFAULT_RACK_SIZE};
use crate::game::turn::Session;
use derive_more::{Display, Error};
use directories::ProjectDirs;
use rand::Rng;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "wordgrid.toml";

/// Environment variable naming an encoded word list to load instead of the
/// bundled one
pub const WORDS_ENV: &str = "WORDGRID_WORDS";

/// Errors that can occur while loading settings.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[display("failed to read {path}: {message}")]
    Read { path: String, message: String },
    /// Config file is not valid TOML or has unknown fields
    #[display("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    /// A value is out of range
    #[display("invalid setting: {reason}")]
    Invalid { reason: String },
    /// The configured word list could not be loaded
    #[display("{_0}")]
    Dictionary(DictionaryError),
}

impl From<DictionaryError> for ConfigError {
    fn from(e: DictionaryError) -> Self {
        ConfigError::Dictionary(e)
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Size and behaviour of the playing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardSettings {
    /// Visible columns
    pub width: u32,
    /// Visible rows
    pub height: u32,
    /// Reject tiles placed outside the visible area
    pub bounded: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: 7,
            height: 10,
            bounded: false,
        }
    }
}

/// Game settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Encoded word list to use instead of the bundled one
    pub words_path: Option<PathBuf>,
    /// Letters to leave out of the bag, e.g. "QZ"
    pub excluded_letters: String,
    /// Number of rack slots
    pub rack_size: usize,
    pub board: BoardSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            words_path: None,
            excluded_letters: String::new(),
            rack_size: DEFAULT_RACK_SIZE,
            board: BoardSettings::default(),
        }
    }
}

impl Settings {
    /// Where the config file lives on this platform.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wordgrid").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load settings from the platform config file (defaults if there is
    /// none) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        let settings = settings.with_env_overrides(|key| std::env::var_os(key));
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let settings: Settings = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from the environment; `lookup` is usually
    /// `std::env::var_os`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        if let Some(path) = lookup(WORDS_ENV).filter(|p| !p.is_empty()) {
            self.words_path = Some(PathBuf::from(path));
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rack_size == 0 {
            return Err(invalid("rack_size must be at least 1"));
        }
        if self.board.width == 0 || self.board.height == 0 {
            return Err(invalid("board width and height must be at least 1"));
        }
        self.excluded_letters()?;
        Ok(())
    }

    /// The letters to leave out of the bag, upper-cased. Whitespace and
    /// commas between letters are ignored.
    pub fn excluded_letters(&self) -> Result<Vec<char>, ConfigError> {
        self.excluded_letters
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    Ok(c.to_ascii_uppercase())
                } else {
                    Err(invalid(format!("cannot exclude {:?} from the bag", c)))
                }
            })
            .collect()
    }

    /// The dictionary these settings describe. The word list file, if any,
    /// is read now; the trie is still built on first lookup.
    pub fn dictionary(&self) -> Result<Dictionary, ConfigError> {
        match &self.words_path {
            Some(path) => Ok(Dictionary::from_file(path)?),
            None => Ok(Dictionary::bundled()),
        }
    }

    /// A fresh game session sharing `dictionary`.
    pub fn new_session(&self, dictionary: Arc<Dictionary>) -> Result<Session, ConfigError> {
        self.new_session_with_rng(dictionary, &mut rand::rng())
    }

    /// Like [`Settings::new_session`] with the bag shuffled by `rng`.
    pub fn new_session_with_rng<R: Rng + ?Sized>(
        &self,
        dictionary: Arc<Dictionary>,
        rng: &mut R,
    ) -> Result<Session, ConfigError> {
        let viewport = Viewport::new(self.board.width, self.board.height);
        let board = if self.board.bounded {
            Board::bounded(viewport.rect())
        } else {
            Board::new()
        };
        let bag = Bag::excluding_with_rng(&self.excluded_letters()?, rng);
        let rack = Rack::new(self.rack_size);
        Ok(Session::new(dictionary, board, bag, rack, viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dictionary::encode;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.rack_size, 7);
        assert_eq!(settings.board.width, 7);
        assert_eq!(settings.board.height, 10);
        assert!(!settings.board.bounded);
        assert!(settings.words_path.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let settings = Settings::from_toml_str(
            r#"
            words_path = "/tmp/words.enc"
            excluded_letters = "q, z"
            rack_size = 8

            [board]
            width = 5
            height = 5
            bounded = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.words_path, Some(PathBuf::from("/tmp/words.enc")));
        assert_eq!(settings.excluded_letters().unwrap(), vec!['Q', 'Z']);
        assert_eq!(settings.rack_size, 8);
        assert_eq!(
            settings.board,
            BoardSettings {
                width: 5,
                height: 5,
                bounded: true
            }
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str("[board]\nheight = 12\n").unwrap();
        assert_eq!(settings.board.height, 12);
        assert_eq!(settings.board.width, 7);
        assert_eq!(settings.rack_size, 7);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Settings::from_toml_str("colour = \"blue\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_toml_str("rack_size = 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Settings::from_toml_str("[board]\nwidth = 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Settings::from_toml_str("excluded_letters = \"Q?\"\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_env_override() {
        let settings = Settings::default().with_env_overrides(|key| {
            (key == WORDS_ENV).then(|| OsString::from("/data/big.enc"))
        });
        assert_eq!(settings.words_path, Some(PathBuf::from("/data/big.enc")));

        let settings = Settings::default().with_env_overrides(|_| Some(OsString::new()));
        assert!(settings.words_path.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.enc");
        std::fs::write(&words, encode(["alpha", "beta"])).unwrap();
        let config = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &config,
            format!("words_path = {:?}\nexcluded_letters = \"Q\"\n", words.display().to_string()),
        )
        .unwrap();

        let settings = Settings::load_from(&config).unwrap();
        let dictionary = settings.dictionary().unwrap();
        assert!(dictionary.check_word("BETA"));
        assert!(!dictionary.check_word("GAMMA"));

        let session = settings.new_session(Arc::new(dictionary)).unwrap();
        assert_eq!(session.bag().remain(), 99 - 7);
        assert!(session.rack().is_full());
    }

    #[test]
    fn test_missing_files() {
        let err = Settings::load_from(Path::new("/no/such/wordgrid.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let settings = Settings {
            words_path: Some(PathBuf::from("/no/such/words.enc")),
            ..Settings::default()
        };
        assert!(matches!(
            settings.dictionary(),
            Err(ConfigError::Dictionary(DictionaryError::Read { .. }))
        ));
    }

    #[test]
    fn test_bounded_session() {
        let settings = Settings::from_toml_str("[board]\nbounded = true\n").unwrap();
        let mut session = settings
            .new_session(Arc::new(Dictionary::from_words(["AT"])))
            .unwrap();
        assert!(session.board_mut().set_tile(7, 0, 'A').is_err());
        assert!(session.board_mut().set_tile(6, 9, 'A').is_ok());
    }
}
