// SPDX-License-Identifier: MPL-2.0
//! In-memory document model.
//!
//! `Page` is a flat list of elements with the handful of properties the
//! application writes: text or markup content, placeholder, disabled flag and
//! attributes. It implements [`Surface`] so the resolver can render into it,
//! and doubles as the test double for a browser DOM.

use crate::i18n::{Binding, Marker, Surface};
use std::collections::BTreeMap;

/// Index of an element within its [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Text(String),
    Markup(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    attributes: BTreeMap<String, String>,
    content: Content,
    placeholder: Option<String>,
    disabled: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            attributes: BTreeMap::new(),
            content: Content::Text(String::new()),
            placeholder: None,
            disabled: false,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.content = Content::Text(text.to_string());
        self
    }

    /// Shorthand for an element whose text is bound to `key`.
    #[must_use]
    pub fn translated(self, key: &str) -> Self {
        self.with_attr(Marker::Text.attribute(), key)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content, `None` when the element holds markup.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Markup(_) => None,
        }
    }

    /// Inner markup, `None` when the element holds plain text.
    pub fn markup(&self) -> Option<&str> {
        match &self.content {
            Content::Markup(markup) => Some(markup),
            Content::Text(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_text(&mut self, text: &str) {
        self.content = Content::Text(text.to_string());
    }

    pub fn set_markup(&mut self, markup: &str) {
        self.content = Content::Markup(markup.to_string());
    }

    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = Some(placeholder.to_string());
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    title: String,
    lang: String,
    elements: Vec<Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skeleton of the consultation screen with every translatable binding.
    pub fn consultation() -> Self {
        let mut page = Self::new();
        let mut add = |element: Element| {
            page.push(element);
        };

        add(Element::new("h1").translated("appTitle"));
        add(Element::new("p").translated("appSubtitle"));

        add(Element::new("h2").translated("patientInfo"));
        for (label, input, placeholder) in [
            ("patientName", "patient-name", "patientNamePlaceholder"),
            ("patientAge", "patient-age", "patientAgePlaceholder"),
            ("patientHistory", "patient-history", "patientHistoryPlaceholder"),
            ("patientAllergies", "patient-allergies", "patientAllergiesPlaceholder"),
            ("patientMeds", "patient-medications", "patientMedsPlaceholder"),
        ] {
            add(Element::new("label").translated(label));
            add(Element::new("input")
                .with_id(input)
                .with_attr(Marker::Placeholder.attribute(), placeholder));
        }

        add(Element::new("label").translated("patientGender"));
        add(Element::new("select").with_id("patient-gender"));
        for (value, key) in [
            ("not_provided", "patientGenderPlaceholder"),
            ("male", "patientGenderMale"),
            ("female", "patientGenderFemale"),
            ("other", "patientGenderOther"),
        ] {
            add(Element::new("option")
                .with_attr("value", value)
                .with_attr(Marker::OptionLabel.attribute(), key));
        }

        add(Element::new("h2").translated("consultation"));
        add(Element::new("button").with_id("start-recording").translated("startRecording"));
        add(Element::new("button").with_id("stop-recording").translated("stopRecording"));
        add(Element::new("button").with_id("clear-text").translated("clear"));
        add(Element::new("div").with_id("recording-status"));
        add(Element::new("textarea")
            .with_id("consultation-text")
            .with_attr(Marker::Placeholder.attribute(), "consultationPlaceholder"));
        add(Element::new("span").translated("charCount"));
        add(Element::new("span").with_id("char-count").with_text("0"));

        add(Element::new("button").with_id("generate-soap").translated("generateSOAP"));
        add(Element::new("button").with_id("recommend-exams").translated("recommendExams"));
        add(Element::new("button").with_id("check-drugs").translated("checkDrugs"));
        add(Element::new("button").with_id("save-report").translated("saveReport"));

        add(Element::new("h2").translated("soapNote"));
        add(Element::new("div").with_id("soap-content"));
        add(Element::new("h2").translated("recommendedExams"));
        add(Element::new("div").with_id("examinations-content"));
        add(Element::new("h2").translated("drugCheck"));
        add(Element::new("div").with_id("drug-check-content"));

        page
    }

    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    /// First element with the given `id` attribute.
    pub fn find(&self, id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|element| element.id() == Some(id))
            .map(ElementId)
    }

    pub fn by_id(&self, id: &str) -> Option<&Element> {
        self.find(id).and_then(|handle| self.element(handle))
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        let handle = self.find(id)?;
        self.element_mut(handle)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }
}

impl Surface for Page {
    type Handle = ElementId;

    fn bindings(&self, marker: Marker) -> Vec<Binding<ElementId>> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| marker != Marker::OptionLabel || element.tag == "option")
            .filter_map(|(index, element)| {
                element.attr(marker.attribute()).map(|key| Binding {
                    handle: ElementId(index),
                    key: key.to_string(),
                })
            })
            .collect()
    }

    fn write(&mut self, handle: &ElementId, marker: Marker, value: &str) {
        let Some(element) = self.element_mut(*handle) else {
            return;
        };
        match marker {
            Marker::Text | Marker::OptionLabel => element.set_text(value),
            Marker::Placeholder => element.set_placeholder(value),
            Marker::Markup => element.set_markup(value),
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_lang(&mut self, lang: &str) {
        self.lang = lang.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::storage::MemoryStore;
    use crate::i18n::I18n;

    fn english() -> I18n {
        I18n::new(Some("en"), Box::new(MemoryStore::new()))
    }

    #[test]
    fn bindings_follow_document_order() {
        let mut page = Page::new();
        let first = page.push(Element::new("h1").translated("appTitle"));
        page.push(Element::new("div"));
        let second = page.push(Element::new("p").translated("appSubtitle"));

        let keys: Vec<_> = page
            .bindings(Marker::Text)
            .into_iter()
            .map(|b| (b.handle, b.key))
            .collect();
        assert_eq!(
            keys,
            vec![
                (first, "appTitle".to_string()),
                (second, "appSubtitle".to_string())
            ]
        );
    }

    #[test]
    fn option_marker_only_matches_option_elements() {
        let mut page = Page::new();
        page.push(Element::new("span").with_attr("data-i18n-opt", "patientGenderMale"));
        let option = page.push(Element::new("OPTION").with_attr("data-i18n-opt", "patientGenderMale"));

        let bindings = page.bindings(Marker::OptionLabel);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].handle, option);
    }

    #[test]
    fn apply_all_writes_every_marker_kind() {
        let mut page = Page::new();
        let text = page.push(Element::new("span").translated("clear"));
        let input = page.push(Element::new("input").with_attr("data-i18n-placeholder", "patientAgePlaceholder"));
        let html = page.push(Element::new("div").with_attr("data-i18n-html", "noRisk"));
        let option = page.push(Element::new("option").with_attr("data-i18n-opt", "patientGenderFemale"));

        english().apply_all(&mut page);

        assert_eq!(page.element(text).and_then(Element::text), Some("Clear"));
        assert_eq!(page.element(input).and_then(Element::placeholder), Some("Enter age"));
        assert_eq!(
            page.element(html).and_then(Element::markup),
            Some("No significant drug conflicts or safety risks detected.")
        );
        assert_eq!(page.element(option).and_then(Element::text), Some("Female"));
        assert_eq!(page.title(), "EHR Agent - Electronic Health Record Assistant");
    }

    #[test]
    fn markup_is_inserted_verbatim() {
        let catalog = crate::i18n::Catalog::from_sources([(
            crate::i18n::Locale::En,
            "rich = <b>bold</b> & more\n",
        )]);
        let i18n = I18n::with_catalog(catalog, Some("en"), Box::new(MemoryStore::new()));
        let mut page = Page::new();
        let div = page.push(Element::new("div").with_attr("data-i18n-html", "rich"));

        i18n.apply_all(&mut page);
        assert_eq!(page.element(div).and_then(Element::markup), Some("<b>bold</b> & more"));
    }

    #[test]
    fn apply_all_is_idempotent() {
        let i18n = english();
        let mut once = Page::consultation();
        i18n.apply_all(&mut once);

        let mut twice = Page::consultation();
        i18n.apply_all(&mut twice);
        i18n.apply_all(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_keys_render_raw() {
        let mut page = Page::new();
        let el = page.push(Element::new("span").translated("noSuchKey"));
        english().apply_all(&mut page);
        assert_eq!(page.element(el).and_then(Element::text), Some("noSuchKey"));
    }

    #[test]
    fn consultation_page_has_known_controls() {
        let page = Page::consultation();
        for id in [
            "start-recording",
            "stop-recording",
            "recording-status",
            "consultation-text",
            "soap-content",
            "examinations-content",
            "drug-check-content",
        ] {
            assert!(page.find(id).is_some(), "missing #{id}");
        }
    }
}
