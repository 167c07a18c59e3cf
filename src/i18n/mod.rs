// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Translation tables are Fluent resources embedded in the binary, one per
//! [`Locale`]. The [`I18n`] resolver owns the tables and the current locale,
//! persists locale changes, and re-renders any [`Surface`] it is handed.
//!
//! # Lookup
//!
//! A key is looked up in the current locale, then in the English table, and
//! if both miss the key itself is returned. Lookups never fail, so a missing
//! translation shows up as English or as the raw key, never as an error.

mod catalog;
pub mod fluent;
mod locale;
mod surface;

pub use catalog::Catalog;
pub use fluent::{I18n, LocaleHook, LOCALE_STORAGE_KEY, TITLE_KEY};
pub use locale::{Locale, UnknownLocale};
pub use surface::{Binding, Marker, Surface};
