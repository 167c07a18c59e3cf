// SPDX-License-Identifier: MPL-2.0
use ehr_agent::app::storage::FileStore;
use ehr_agent::app::{paths, Flags, Session};
use ehr_agent::config;
use ehr_agent::error::{Error, Result};
use ehr_agent::i18n::{I18n, Surface};
use ehr_agent::recording::SpeechEngine;
use ehr_agent::service::ServiceClient;
use ehr_agent::ui::page::Page;
use ehr_agent::ui::report;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use unic_langid::LanguageIdentifier;

const HELP: &str = "\
ehr-agent

USAGE:
  ehr-agent [OPTIONS] [KEY...]

Prints the translation of each KEY in the active language.

OPTIONS:
  --lang LANG          Use LANG (en, zh, fr) for this run
  --set-lang LANG      Switch to LANG and remember it
  --config-dir DIR     Directory holding settings.toml
  --data-dir DIR       Directory holding storage.toml
  --speech-tag         Print the speech-recognition tag
  --report TEXT        Run the consultation workflow on TEXT and print the report
  --save               With --report, also store the report on the backend
  -h, --help           Print this help
";

struct Args {
    flags: Flags,
    set_lang: Option<String>,
    speech_tag: bool,
    report: Option<String>,
    save: bool,
    keys: Vec<String>,
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
    };
    let set_lang = args.opt_value_from_str("--set-lang")?;
    let speech_tag = args.contains("--speech-tag");
    let report = args.opt_value_from_str("--report")?;
    let save = args.contains("--save");
    let keys = args
        .finish()
        .into_iter()
        .filter_map(|s| s.into_string().ok())
        .collect();

    Ok(Some(Args {
        flags,
        set_lang,
        speech_tag,
        report,
        save,
        keys,
    }))
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("ehr-agent: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    paths::init_cli_overrides(args.flags.data_dir.clone(), args.flags.config_dir.clone());
    let (config, config_warning) = config::load();
    init_tracing(&config.logging.filter);
    if let Some(warning) = config_warning {
        tracing::warn!(warning = %warning, "configuration not loaded");
    }

    let mut i18n = I18n::new(args.flags.lang.as_deref(), Box::new(FileStore::open()));

    if let Some(lang) = args.set_lang.as_deref() {
        let mut page = Page::consultation();
        if !i18n.set_locale(lang, &mut page) {
            eprintln!("ehr-agent: unsupported language '{lang}'");
            return ExitCode::from(2);
        }
        tracing::debug!(title = page.title(), lang = page.lang(), "page re-rendered");
    }

    if args.speech_tag {
        println!("{}", i18n.speech_language_tag());
    }

    for key in &args.keys {
        println!("{}", i18n.tr(key));
    }

    if let Some(transcript) = args.report.as_deref() {
        return run_report(i18n, &config, transcript, args.save).await;
    }

    if args.set_lang.is_none() && !args.speech_tag && args.keys.is_empty() {
        let mut page = Page::consultation();
        page.set_lang(i18n.current_locale().document_lang());
        i18n.apply_all(&mut page);
        println!("{} [{}]", page.title(), page.lang());
    }

    ExitCode::SUCCESS
}

/// The command line has no microphone.
struct NoSpeech;

impl SpeechEngine for NoSpeech {
    fn set_language(&mut self, _tag: &LanguageIdentifier) {}

    fn start(&mut self) -> Result<()> {
        Err(Error::Speech("no capture device".to_string()))
    }

    fn stop(&mut self) {}
}

async fn run_report(i18n: I18n, config: &config::Config, transcript: &str, save: bool) -> ExitCode {
    let client = match ServiceClient::new(&config.service) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", report::error_message(&i18n, &err));
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::<NoSpeech>::new(i18n, None);
    session.startup();
    session.set_transcript(transcript);

    if !session.generate_soap(&client).await {
        eprintln!("{}", session.notice().unwrap_or_default());
        return ExitCode::FAILURE;
    }
    // Later steps only enrich the page; the report is printed either way.
    if !session.recommend_examinations(&client).await {
        eprintln!("{}", session.notice().unwrap_or_default());
    }
    let checked = session.check_drug_conflicts(&client).await;
    if !checked {
        eprintln!("{}", session.notice().unwrap_or_default());
    }

    print!("{}", session.text_report());

    if save && checked {
        let saved = session.save_report(&client).await;
        eprintln!("{}", session.notice().unwrap_or_default());
        if !saved {
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
