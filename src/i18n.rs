//! Translation dictionaries for the download page.
//!
//! Dictionaries are JSON documents compiled into the binary, one per
//! supported locale. They are parsed once at startup and handed to the view
//! explicitly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

use crate::locale::{DEFAULT_LOCALE, Locale};

const EN: &str = include_str!("../locales/en.json");
const RU: &str = include_str!("../locales/ru.json");
const UA: &str = include_str!("../locales/ua.json");
const ES: &str = include_str!("../locales/es.json");

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Dictionary {
    #[serde(rename = "Info")]
    pub info: Info,
    #[serde(rename = "Translations")]
    pub translations: Translations,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Info {
    pub locale: Locale,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Translations {
    pub downloads: DownloadsText,
    pub assets: AssetLabels,
}

/// Messages shown by the download view.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct DownloadsText {
    pub title: String,
    pub loading: String,
    /// Prefix placed before the fetch error message.
    pub error: String,
    pub try_to_refresh: String,
    pub getting_platform: String,
    /// Used in the "(requires Visual C++ Redistributable)" note.
    pub requires: String,
    pub platforms: PlatformNames,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlatformNames {
    pub linux: String,
    pub macos: String,
    pub windows: String,
}

/// Words used when turning asset filenames into display names.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AssetLabels {
    pub package: String,
    pub portable: String,
    pub installer: String,
    pub legacy: String,
}

impl Dictionary {
    pub fn locale(&self) -> Locale {
        self.info.locale
    }

    pub fn downloads(&self) -> &DownloadsText {
        &self.translations.downloads
    }

    pub fn assets(&self) -> &AssetLabels {
        &self.translations.assets
    }
}

/// All built-in dictionaries, keyed by locale.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    entries: HashMap<Locale, Dictionary>,
    fallback: Dictionary,
}

impl Dictionaries {
    /// Parse the built-in dictionaries.
    ///
    /// Fails if any document is malformed or declares a locale other than
    /// the one it is registered under.
    pub fn builtin() -> Result<Self> {
        let sources = [
            (Locale::En, EN),
            (Locale::Ru, RU),
            (Locale::Ua, UA),
            (Locale::Es, ES),
        ];

        let mut entries = HashMap::with_capacity(sources.len());
        for (locale, source) in sources {
            let dictionary: Dictionary = serde_json::from_str(source)
                .with_context(|| format!("Failed to parse dictionary for locale '{}'", locale))?;
            if dictionary.locale() != locale {
                anyhow::bail!(
                    "Dictionary registered as '{}' declares locale '{}'",
                    locale,
                    dictionary.locale()
                );
            }
            entries.insert(locale, dictionary);
        }

        let fallback = entries
            .get(&DEFAULT_LOCALE)
            .cloned()
            .context("Default dictionary is missing")?;

        Ok(Self { entries, fallback })
    }

    /// Dictionary for `locale`, falling back to the default locale.
    pub fn get(&self, locale: Locale) -> &Dictionary {
        self.entries.get(&locale).unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dictionaries_parse() {
        let dictionaries = Dictionaries::builtin().unwrap();
        for locale in Locale::ALL {
            let dictionary = dictionaries.get(locale);
            assert_eq!(dictionary.locale(), locale);
            assert!(!dictionary.downloads().loading.is_empty());
            assert!(!dictionary.downloads().error.is_empty());
            assert!(!dictionary.downloads().try_to_refresh.is_empty());
            assert!(!dictionary.downloads().getting_platform.is_empty());
            assert!(!dictionary.downloads().requires.is_empty());
        }
    }

    #[test]
    fn test_english_texts() {
        let dictionaries = Dictionaries::builtin().unwrap();
        let en = dictionaries.get(Locale::En);
        assert_eq!(en.downloads().loading, "Loading releases...");
        assert_eq!(en.downloads().requires, "requires");
        assert_eq!(en.assets().installer, "Installer");
    }

    #[test]
    fn test_dictionary_kebab_case_keys() {
        let json = r#"{
            "Info": { "locale": "es" },
            "Translations": {
                "downloads": {
                    "title": "t",
                    "loading": "l",
                    "error": "e",
                    "try-to-refresh": "r",
                    "getting-platform": "g",
                    "requires": "q",
                    "platforms": { "linux": "L", "macos": "M", "windows": "W" }
                },
                "assets": { "package": "p", "portable": "o", "installer": "i", "legacy": "y" }
            }
        }"#;
        let dictionary: Dictionary = serde_json::from_str(json).unwrap();
        assert_eq!(dictionary.locale(), Locale::Es);
        assert_eq!(dictionary.downloads().try_to_refresh, "r");
        assert_eq!(dictionary.downloads().getting_platform, "g");
    }

    #[test]
    fn test_dictionary_rejects_unknown_locale() {
        let json = r#"{ "Info": { "locale": "de" }, "Translations": {} }"#;
        assert!(serde_json::from_str::<Dictionary>(json).is_err());
    }
}
