//! Embedded language files for status text and settings labels

use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_LANGUAGE: &str = "en-US";

const LANGUAGE_FILES: &[&str] = &[
    include_str!("../lang/en_US.json"),
    include_str!("../lang/de_DE.json"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageFile {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub country: Option<String>,
    pub translations: HashMap<String, String>,
}

pub fn parse_language(contents: &str) -> Result<LanguageFile, serde_json::Error> {
    serde_json::from_str(contents)
}

/// Resolves localization keys for one language, falling back to English
#[derive(Debug, Clone, Default)]
pub struct Localization {
    code: String,
    selected: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Localization {
    pub fn new(code: &str) -> Self {
        let mut selected = None;
        let mut fallback = HashMap::new();

        for contents in LANGUAGE_FILES {
            let file = match parse_language(contents) {
                Ok(file) => file,
                Err(e) => {
                    tracing::error!("Failed to parse embedded language file: {}", e);
                    continue;
                }
            };

            if file.code == DEFAULT_LANGUAGE {
                fallback.clone_from(&file.translations);
            }
            if file.code.eq_ignore_ascii_case(code) {
                selected = Some(file);
            }
        }

        let (code, selected) = match selected {
            Some(file) => {
                tracing::debug!("Using language {} ({})", file.code, file.language);
                (file.code, file.translations)
            }
            None => {
                tracing::warn!("Unknown language {}, using {}", code, DEFAULT_LANGUAGE);
                (DEFAULT_LANGUAGE.to_string(), fallback.clone())
            }
        };

        Self {
            code,
            selected,
            fallback,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn available_languages() -> Vec<String> {
        LANGUAGE_FILES
            .iter()
            .filter_map(|contents| parse_language(contents).ok())
            .map(|file| file.code)
            .collect()
    }

    /// Returns the text for `key`, or the key itself if no language defines it.
    pub fn get(&self, key: &str) -> String {
        self.selected
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingKey;
    use crate::status::ActivityStatus;

    #[test]
    fn test_embedded_files_parse() {
        let languages = Localization::available_languages();
        assert!(languages.contains(&"en-US".to_string()));
        assert!(languages.contains(&"de-DE".to_string()));
    }

    #[test]
    fn test_every_status_has_english_text() {
        let lang = Localization::new(DEFAULT_LANGUAGE);
        let statuses = [
            ActivityStatus::None,
            ActivityStatus::ViewingAchievements,
            ActivityStatus::ViewingContentStore,
            ActivityStatus::ViewingThemeManager,
            ActivityStatus::ViewingSettings,
            ActivityStatus::ViewingAbout,
        ];

        for status in statuses {
            let key = status.localization_key();
            assert_ne!(lang.get(key), key);
        }
        for key in SettingKey::ALL {
            assert_ne!(lang.get(&key.label_key()), key.label_key());
        }
    }

    #[test]
    fn test_selected_language_with_fallback() {
        let lang = Localization::new("de-de");
        assert_eq!(lang.code(), "de-DE");
        assert_eq!(
            lang.get("presence.status.viewingSettings"),
            "Ändert Einstellungen"
        );
        // Not translated in German
        assert_eq!(lang.get("presence.settings"), "Discord RPC");
    }

    #[test]
    fn test_unknown_language_and_key() {
        let lang = Localization::new("xx-XX");
        assert_eq!(lang.code(), DEFAULT_LANGUAGE);
        assert_eq!(lang.get("presence.status.viewingAbout"), "Reading about ImHex");
        assert_eq!(lang.get("no.such.key"), "no.such.key");
    }
}
