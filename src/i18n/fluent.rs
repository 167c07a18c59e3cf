// SPDX-License-Identifier: MPL-2.0
use super::catalog::Catalog;
use super::locale::Locale;
use super::surface::{Marker, Surface};
use crate::app::storage::PreferenceStore;
use unic_langid::LanguageIdentifier;

/// Preference-store key holding the selected locale code.
pub const LOCALE_STORAGE_KEY: &str = "ehr-lang";

/// Key whose value becomes the document title.
pub const TITLE_KEY: &str = "appTitle";

/// Callback run after every successful locale change.
pub type LocaleHook = Box<dyn FnMut(Locale)>;

/// Translation resolver: owns the tables, the current locale and the
/// preference store the locale is persisted to.
pub struct I18n {
    catalog: Catalog,
    current_locale: Locale,
    store: Box<dyn PreferenceStore>,
    on_locale_change: Option<LocaleHook>,
}

impl I18n {
    /// Resolver over the embedded tables.
    ///
    /// The starting locale is the CLI override if valid, then the persisted
    /// preference if valid, then [`Locale::INITIAL`].
    pub fn new(cli_lang: Option<&str>, store: Box<dyn PreferenceStore>) -> Self {
        Self::with_catalog(Catalog::embedded(), cli_lang, store)
    }

    pub fn with_catalog(
        catalog: Catalog,
        cli_lang: Option<&str>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let persisted = store.get(LOCALE_STORAGE_KEY);
        let current_locale = resolve_locale(cli_lang, persisted.as_deref(), &catalog);
        tracing::debug!(locale = %current_locale, "i18n initialized");

        Self {
            catalog,
            current_locale,
            store,
            on_locale_change: None,
        }
    }

    pub fn current_locale(&self) -> Locale {
        self.current_locale
    }

    pub fn available_locales(&self) -> Vec<Locale> {
        self.catalog.locales()
    }

    /// Registers the hook run after each successful [`I18n::set_locale`].
    pub fn set_locale_hook(&mut self, hook: impl FnMut(Locale) + 'static) {
        self.on_locale_change = Some(Box::new(hook));
    }

    /// Translates `key` in the current locale.
    ///
    /// Falls back to the English table, then to `key` itself.
    pub fn tr(&self, key: &str) -> String {
        self.catalog.resolve(self.current_locale, key)
    }

    /// Switches to `candidate` and re-renders `surface`.
    ///
    /// Unknown candidates are ignored: nothing changes, nothing is written.
    /// On success the choice is persisted before the surface is touched, then
    /// the document language and every bound element are updated and the
    /// locale hook runs. A failed persistence write only loses the choice for
    /// the next start. Returns whether the locale was applied.
    pub fn set_locale<D>(&mut self, candidate: &str, surface: &mut D) -> bool
    where
        D: Surface + ?Sized,
    {
        let Some(locale) = Locale::from_code(candidate).filter(|l| self.catalog.contains(*l))
        else {
            tracing::debug!(candidate, "ignoring unsupported locale");
            return false;
        };

        self.current_locale = locale;
        if let Err(err) = self.store.set(LOCALE_STORAGE_KEY, locale.code()) {
            tracing::warn!(locale = %locale, error = %err, "locale preference not persisted");
        }

        surface.set_lang(locale.document_lang());
        self.apply_all(surface);

        if let Some(hook) = self.on_locale_change.as_mut() {
            hook(locale);
        }
        true
    }

    /// Writes the current translation of every bound element and the title.
    ///
    /// Idempotent: a second pass writes the same values.
    pub fn apply_all<D>(&self, surface: &mut D)
    where
        D: Surface + ?Sized,
    {
        for marker in Marker::ALL {
            for binding in surface.bindings(marker) {
                let value = self.tr(&binding.key);
                if !value.is_empty() {
                    surface.write(&binding.handle, marker, &value);
                }
            }
        }

        let title = self.tr(TITLE_KEY);
        if !title.is_empty() {
            surface.set_title(&title);
        }
    }

    /// Speech-recognition tag for the current locale.
    pub fn speech_language_tag(&self) -> LanguageIdentifier {
        self.current_locale.speech_tag()
    }
}

fn resolve_locale(cli_lang: Option<&str>, persisted: Option<&str>, catalog: &Catalog) -> Locale {
    let usable = |code: &str| Locale::from_code(code).filter(|l| catalog.contains(*l));

    // 1. CLI override
    if let Some(locale) = cli_lang.and_then(usable) {
        return locale;
    }

    // 2. Persisted preference
    if let Some(locale) = persisted.and_then(usable) {
        return locale;
    }

    // 3. Fixed default, or the first table present if that one is missing
    if catalog.contains(Locale::INITIAL) {
        Locale::INITIAL
    } else {
        catalog
            .locales()
            .first()
            .copied()
            .unwrap_or(Locale::INITIAL)
    }
}
