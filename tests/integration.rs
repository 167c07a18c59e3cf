// SPDX-License-Identifier: MPL-2.0
use ehr_agent::app::storage::{FileStore, MemoryStore, PreferenceStore};
use ehr_agent::app::Session;
use ehr_agent::config::{self, Config};
use ehr_agent::error::Result;
use ehr_agent::i18n::{Catalog, I18n, Locale, LOCALE_STORAGE_KEY};
use ehr_agent::recording::SpeechEngine;
use ehr_agent::service::types::{DrugCheck, DrugCheckOutcome};
use ehr_agent::ui::page::Page;
use ehr_agent::ui::report::{self, Fragment};
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::tempdir;
use unic_langid::LanguageIdentifier;

#[derive(Default)]
struct LoggingEngine {
    tags: Vec<String>,
}

impl SpeechEngine for LoggingEngine {
    fn set_language(&mut self, tag: &LanguageIdentifier) {
        self.tags.push(tag.to_string());
    }

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}
}

fn ftl_keys(path: &Path) -> BTreeSet<String> {
    let content = std::fs::read_to_string(path).expect("readable ftl file");
    content
        .lines()
        .filter(|line| line.starts_with(|c: char| c.is_ascii_alphabetic()))
        .filter_map(|line| line.split_once('=').map(|(key, _)| key.trim().to_string()))
        .collect()
}

#[test]
fn locale_choice_survives_restart() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let mut first = I18n::new(None, Box::new(FileStore::open_in(Some(dir.path().to_path_buf()))));
    assert_eq!(first.current_locale(), Locale::Zh);
    assert!(first.set_locale("fr", &mut Page::new()));

    let store = FileStore::open_in(Some(dir.path().to_path_buf()));
    assert_eq!(store.get(LOCALE_STORAGE_KEY).as_deref(), Some("fr"));

    let second = I18n::new(None, Box::new(store));
    assert_eq!(second.current_locale(), Locale::Fr);
    assert_eq!(second.tr("startRecording"), "Démarrer l'enregistrement");
}

#[test]
fn cli_language_overrides_persisted_choice() {
    let store = MemoryStore::new().with_entry(LOCALE_STORAGE_KEY, "fr");
    let i18n = I18n::new(Some("en"), Box::new(store));
    assert_eq!(i18n.current_locale(), Locale::En);
}

#[test]
fn zh_to_en_then_unknown_code() {
    let mut page = Page::consultation();
    let mut i18n = I18n::new(None, Box::new(MemoryStore::new()));
    i18n.apply_all(&mut page);
    assert_eq!(page.title(), "EHR Agent - 电子病历辅助系统");
    assert_eq!(
        page.by_id("start-recording").and_then(|e| e.text()),
        Some("开始录音")
    );

    assert!(i18n.set_locale("en", &mut page));
    assert_eq!(page.lang(), "en");
    assert_eq!(page.title(), "EHR Agent - Electronic Health Record Assistant");
    assert_eq!(
        page.by_id("start-recording").and_then(|e| e.text()),
        Some("Start Recording")
    );
    assert_eq!(i18n.speech_language_tag().to_string(), "en-US");

    let snapshot = page.clone();
    assert!(!i18n.set_locale("xx", &mut page));
    assert_eq!(i18n.current_locale(), Locale::En);
    assert_eq!(page, snapshot);
}

#[test]
fn failed_persistence_still_switches() {
    let mut page = Page::consultation();
    let mut i18n = I18n::new(None, Box::new(MemoryStore::write_denied()));
    assert!(i18n.set_locale("en", &mut page));
    assert_eq!(i18n.current_locale(), Locale::En);
    assert_eq!(page.lang(), "en");
}

#[test]
fn missing_key_falls_back_to_english_then_key() {
    let catalog = Catalog::from_sources([
        (Locale::En, "greeting = Hello\nonlyEnglish = Only here\n"),
        (Locale::Zh, "greeting = 你好\n"),
    ]);
    let i18n = I18n::with_catalog(catalog, Some("zh"), Box::new(MemoryStore::new()));

    assert_eq!(i18n.tr("greeting"), "你好");
    assert_eq!(i18n.tr("onlyEnglish"), "Only here");
    assert_eq!(i18n.tr("nowhere"), "nowhere");
}

#[test]
fn severity_high_label_per_locale() {
    let outcome = DrugCheckOutcome {
        check: DrugCheck {
            has_conflicts: true,
            severity: Some("高".to_string()),
            ..DrugCheck::default()
        },
        prescribed_drugs: Vec::new(),
    };

    for (lang, label) in [("en", "High Risk"), ("zh", "高风险"), ("fr", "Risque élevé")] {
        let i18n = I18n::new(Some(lang), Box::new(MemoryStore::new()));
        let Fragment::Markup(html) = report::drug_check(&i18n, &outcome) else {
            panic!("drug check renders markup");
        };
        assert!(html.contains(&format!("⚠️ {label}")), "{lang}: {html}");
    }
}

#[test]
fn translation_tables_define_the_same_keys() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/i18n");
    let english = ftl_keys(&dir.join("en.ftl"));
    assert!(english.contains("appTitle"));

    for locale in ["zh", "fr"] {
        let keys = ftl_keys(&dir.join(format!("{locale}.ftl")));
        let missing: Vec<_> = english.difference(&keys).collect();
        let extra: Vec<_> = keys.difference(&english).collect();
        assert!(missing.is_empty(), "{locale}.ftl is missing {missing:?}");
        assert!(extra.is_empty(), "{locale}.ftl has extra {extra:?}");
    }
}

#[test]
fn session_switch_keeps_engine_in_step() {
    let i18n = I18n::new(None, Box::new(MemoryStore::new()));
    let mut session = Session::new(i18n, Some(LoggingEngine::default()));
    session.startup();
    assert_eq!(session.page().lang(), "zh-CN");

    assert!(session.switch_language("fr"));
    assert!(!session.switch_language("de"));
    assert!(session.start_recording());

    let tags = session
        .recorder()
        .engine()
        .map(|e| e.tags.clone())
        .unwrap_or_default();
    assert_eq!(tags, vec!["zh-CN", "fr-FR", "fr-FR"]);
    assert_eq!(session.page().lang(), "fr");
}

#[test]
fn config_round_trip_through_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut config = Config::default();
    config.service.base_url = "http://backend.local:8080".to_string();
    config.service.timeout_secs = 5000;
    config::save_to_path(&config, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config from path");
    assert_eq!(loaded, config);
    assert_eq!(loaded.service.timeout().as_secs(), 600);
}
