// SPDX-License-Identifier: MPL-2.0
//! The closed set of UI locales and the language tags derived from them.

use std::fmt;
use std::str::FromStr;
use unic_langid::{langid, LanguageIdentifier};

/// A UI locale. Each variant has one translation table and one speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    En,
    Zh,
    Fr,
}

impl Locale {
    /// All locales, in display order.
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Zh, Locale::Fr];

    /// Table consulted when the current locale lacks a key.
    pub const FALLBACK: Locale = Locale::En;

    /// Locale used when no valid preference has been stored.
    pub const INITIAL: Locale = Locale::Zh;

    /// Short identifier, also the value written to preference storage.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::Fr => "fr",
        }
    }

    /// Parses a short identifier. Case-sensitive, like the stored values.
    pub fn from_code(code: &str) -> Option<Locale> {
        match code {
            "en" => Some(Locale::En),
            "zh" => Some(Locale::Zh),
            "fr" => Some(Locale::Fr),
            _ => None,
        }
    }

    /// Identifier handed to the Fluent bundle for plural rules and formatting.
    pub fn language_id(self) -> LanguageIdentifier {
        match self {
            Locale::En => langid!("en"),
            Locale::Zh => langid!("zh"),
            Locale::Fr => langid!("fr"),
        }
    }

    /// Tag understood by the speech-recognition engine.
    pub fn speech_tag(self) -> LanguageIdentifier {
        match self {
            Locale::En => langid!("en-US"),
            Locale::Zh => langid!("zh-CN"),
            Locale::Fr => langid!("fr-FR"),
        }
    }

    /// Value of the document-level `lang` attribute.
    pub fn document_lang(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh-CN",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an identifier outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported locale: {}", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_code(s).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_code(locale.code()), Some(locale));
            assert_eq!(locale.to_string().parse::<Locale>(), Ok(locale));
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(Locale::from_code("xx"), None);
        assert_eq!(Locale::from_code("EN"), None);
        assert_eq!(Locale::from_code(""), None);
        assert!("zh-CN".parse::<Locale>().is_err());
    }

    #[test]
    fn speech_tags_match_table() {
        assert_eq!(Locale::En.speech_tag().to_string(), "en-US");
        assert_eq!(Locale::Zh.speech_tag().to_string(), "zh-CN");
        assert_eq!(Locale::Fr.speech_tag().to_string(), "fr-FR");
    }

    #[test]
    fn document_lang_uses_region_only_for_chinese() {
        assert_eq!(Locale::Zh.document_lang(), "zh-CN");
        assert_eq!(Locale::En.document_lang(), "en");
        assert_eq!(Locale::Fr.document_lang(), "fr");
    }
}
