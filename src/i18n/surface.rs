// SPDX-License-Identifier: MPL-2.0
//! Document abstraction used to push translated text into the UI.
//!
//! Elements opt into translation by carrying one of four marker attributes
//! whose value is a translation key. The resolver never touches a concrete
//! DOM: it asks a [`Surface`] for the bound elements and writes values back
//! through it.

/// How a translated value is applied to a bound element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Replace the element's text content.
    Text,
    /// Replace the element's placeholder attribute.
    Placeholder,
    /// Replace the element's inner markup verbatim.
    ///
    /// The value is inserted without escaping. Keys bound with this marker
    /// must resolve to static, trusted strings from the translation table,
    /// never to user input.
    Markup,
    /// Replace the visible label of an `option` element.
    OptionLabel,
}

impl Marker {
    pub const ALL: [Marker; 4] = [
        Marker::Text,
        Marker::Placeholder,
        Marker::Markup,
        Marker::OptionLabel,
    ];

    /// Attribute name carrying the translation key.
    pub fn attribute(self) -> &'static str {
        match self {
            Marker::Text => "data-i18n",
            Marker::Placeholder => "data-i18n-placeholder",
            Marker::Markup => "data-i18n-html",
            Marker::OptionLabel => "data-i18n-opt",
        }
    }
}

/// An element found by a marker scan, with the key it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<H> {
    pub handle: H,
    pub key: String,
}

/// A document the resolver can scan and write into.
pub trait Surface {
    /// Opaque reference to one element of the document.
    type Handle;

    /// All elements carrying `marker`, in document order.
    ///
    /// For [`Marker::OptionLabel`] only `option` elements are returned.
    fn bindings(&self, marker: Marker) -> Vec<Binding<Self::Handle>>;

    /// Applies `value` to the element as `marker` prescribes.
    fn write(&mut self, handle: &Self::Handle, marker: Marker, value: &str);

    /// Sets the document title.
    fn set_title(&mut self, title: &str);

    /// Sets the document-level language attribute.
    fn set_lang(&mut self, lang: &str);
}
