//! Supported locales and locale resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cookie that stores the visitor's chosen locale.
pub const COOKIE_LOCALE_KEY: &str = "locale";

/// Locale used when nothing else resolves.
pub const DEFAULT_LOCALE: Locale = Locale::En;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
    Ua,
    Es,
}

impl Locale {
    /// All supported locales, in the order they are offered to visitors.
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Ru, Locale::Ua, Locale::Es];

    pub const fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Ua => "ua",
            Locale::Es => "es",
        }
    }

    /// Map a language tag from `Accept-Language` (e.g. `ru-RU`, `uk`) to a locale.
    ///
    /// Only the primary subtag is considered. `uk` is the ISO code for
    /// Ukrainian, while the site itself uses `ua`.
    pub fn from_language_tag(tag: &str) -> Option<Locale> {
        let primary = tag.split(['-', '_']).next()?.trim().to_ascii_lowercase();
        match primary.as_str() {
            "uk" => Some(Locale::Ua),
            other => other.parse().ok(),
        }
    }

    /// Pick the first supported locale from an `Accept-Language` header value.
    ///
    /// Entries are taken in the order they appear; quality weights are ignored
    /// apart from `q=0`, which excludes an entry.
    pub fn from_accept_language(header: &str) -> Option<Locale> {
        header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                let excluded = parts.any(|p| {
                    let p = p.trim();
                    p == "q=0" || p == "q=0.0" || p == "q=0.00" || p == "q=0.000"
                });
                if excluded { None } else { Some(tag) }
            })
            .find_map(Locale::from_language_tag)
    }

    /// Return the first candidate that names a supported locale, or the default.
    pub fn resolve<'a, I>(candidates: I) -> Locale
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        candidates
            .into_iter()
            .flatten()
            .find_map(|c| c.parse().ok())
            .unwrap_or(DEFAULT_LOCALE)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            "ua" => Ok(Locale::Ua),
            "es" => Ok(Locale::Es),
            _ => anyhow::bail!("Unsupported locale: {}. Expected en, ru, ua, or es.", s),
        }
    }
}
