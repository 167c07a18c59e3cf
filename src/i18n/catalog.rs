// SPDX-License-Identifier: MPL-2.0
//! Translation tables, one Fluent bundle per locale.
//!
//! The `.ftl` files under `assets/i18n/` are embedded at compile time; the
//! file stem selects the locale (`en.ftl`, `zh.ftl`, `fr.ftl`). Tables are
//! read-only once built.

use super::locale::Locale;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

pub struct Catalog {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
}

impl Catalog {
    /// Builds the catalog from the embedded `.ftl` files.
    pub fn embedded() -> Self {
        let mut catalog = Self::empty();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(stem) = filename.strip_suffix(".ftl") else {
                continue;
            };
            let Some(locale) = Locale::from_code(stem) else {
                tracing::debug!(file = filename, "skipping translation file for unknown locale");
                continue;
            };
            if let Some(content) = Asset::get(filename) {
                let source = String::from_utf8_lossy(content.data.as_ref()).into_owned();
                catalog.insert_source(locale, source);
            }
        }

        catalog
    }

    /// Builds a catalog from in-memory Fluent sources.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (Locale, &'a str)>) -> Self {
        let mut catalog = Self::empty();
        for (locale, source) in sources {
            catalog.insert_source(locale, source.to_string());
        }
        catalog
    }

    fn empty() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Parses `source` into the bundle for `locale`.
    ///
    /// Syntax errors are logged and the entries that did parse are kept.
    fn insert_source(&mut self, locale: Locale, source: String) {
        let resource = match FluentResource::try_new(source) {
            Ok(resource) => resource,
            Err((partial, errors)) => {
                tracing::error!(
                    locale = %locale,
                    errors = errors.len(),
                    "translation table has syntax errors, keeping valid entries"
                );
                partial
            }
        };

        let bundle = self.bundles.entry(locale).or_insert_with(|| {
            let mut bundle = FluentBundle::new(vec![locale.language_id()]);
            bundle.set_use_isolating(false);
            bundle
        });
        if let Err(errors) = bundle.add_resource(resource) {
            tracing::warn!(locale = %locale, errors = errors.len(), "duplicate translation keys ignored");
        }
    }

    /// Whether a table exists for `locale`.
    pub fn contains(&self, locale: Locale) -> bool {
        self.bundles.contains_key(&locale)
    }

    /// Locales with a table, in display order.
    pub fn locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|locale| self.contains(*locale))
            .collect()
    }

    /// Looks `key` up in a single table. `None` when the table or key is absent.
    pub fn lookup(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(&locale)?;
        let message = bundle.get_message(key)?;
        let pattern = message.value()?;

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!(locale = %locale, key, errors = ?errors, "formatting errors");
        }
        Some(value.into_owned())
    }

    /// Resolves `key` for `locale`: that locale's table, then the fallback
    /// table, then the key itself. Never fails.
    pub fn resolve(&self, locale: Locale, key: &str) -> String {
        self.resolve_with_args(locale, key, None)
    }

    /// [`Catalog::resolve`] with Fluent arguments for placeables.
    pub fn resolve_with_args(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> String {
        self.lookup(locale, key, args)
            .or_else(|| self.lookup(Locale::FALLBACK, key, args))
            .unwrap_or_else(|| key.to_string())
    }
}
