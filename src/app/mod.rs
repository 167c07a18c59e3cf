// SPDX-License-Identifier: MPL-2.0
//! Session wiring between the resolver, the document, the recorder and the
//! consultation backend.
//!
//! A [`Session`] owns one [`I18n`], the consultation [`Page`] and the
//! [`RecordingController`]. Language switches go through the session so the
//! recorder's speech tag and the recording controls stay in step with the
//! document. The consultation workflow runs in four steps, each unlocking the
//! next one's button: generate the SOAP note, recommend examinations, check
//! drug conflicts, save the report.

pub mod paths;
pub mod storage;

use crate::error::Error;
use crate::i18n::{I18n, Surface};
use crate::recording::{RecordingController, SpeechEngine};
use crate::service::types::SoapNote;
use crate::service::ServiceClient;
use crate::ui::page::Page;
use crate::ui::report::{self, Fragment, PatientForm};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

const START_RECORDING: &str = "start-recording";
const STOP_RECORDING: &str = "stop-recording";
const RECORDING_STATUS: &str = "recording-status";
const CONSULTATION_TEXT: &str = "consultation-text";
const CHAR_COUNT: &str = "char-count";
const GENERATE_SOAP: &str = "generate-soap";
const RECOMMEND_EXAMS: &str = "recommend-exams";
const CHECK_DRUGS: &str = "check-drugs";
const SAVE_REPORT: &str = "save-report";
const SOAP_CONTENT: &str = "soap-content";
const EXAMINATIONS_CONTENT: &str = "examinations-content";
const DRUG_CHECK_CONTENT: &str = "drug-check-content";

/// Startup options from the command line.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Locale override (`en`, `zh`, `fr`). Ignored when unsupported.
    pub lang: Option<String>,
    /// Data directory override (for `storage.toml`).
    /// Takes precedence over `EHR_AGENT_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Config directory override (for `settings.toml`).
    /// Takes precedence over `EHR_AGENT_CONFIG_DIR`.
    pub config_dir: Option<String>,
}

pub struct Session<E> {
    i18n: I18n,
    page: Page,
    recorder: Rc<RefCell<RecordingController<E>>>,
    patient: PatientForm,
    soap: Option<SoapNote>,
    drugs_checked: bool,
    /// Last message for the user (validation failure, backend error, saved file).
    notice: Option<String>,
}

impl<E: SpeechEngine + 'static> Session<E> {
    /// Builds a session over the consultation page. Nothing is rendered
    /// until [`Session::startup`].
    pub fn new(i18n: I18n, engine: Option<E>) -> Self {
        Self::with_page(i18n, Page::consultation(), engine)
    }

    pub fn with_page(mut i18n: I18n, page: Page, engine: Option<E>) -> Self {
        let recorder = Rc::new(RefCell::new(RecordingController::new(engine, &i18n)));
        let hooked = Rc::clone(&recorder);
        i18n.set_locale_hook(move |locale| hooked.borrow_mut().on_locale_change(locale));

        Self {
            i18n,
            page,
            recorder,
            patient: PatientForm::default(),
            soap: None,
            drugs_checked: false,
            notice: None,
        }
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn recorder(&self) -> Ref<'_, RecordingController<E>> {
        self.recorder.borrow()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn soap_note(&self) -> Option<&SoapNote> {
        self.soap.as_ref()
    }

    /// First render: document language, every bound element, the title and
    /// the control states.
    pub fn startup(&mut self) {
        let locale = self.i18n.current_locale();
        tracing::info!(%locale, "starting session");
        self.page.set_lang(locale.document_lang());
        self.i18n.apply_all(&mut self.page);
        self.sync_recording_controls();
        self.sync_workflow_controls();
    }

    /// Switches the interface language. Unsupported codes change nothing.
    pub fn switch_language(&mut self, code: &str) -> bool {
        if !self.i18n.set_locale(code, &mut self.page) {
            return false;
        }
        self.sync_recording_controls();
        true
    }

    pub fn start_recording(&mut self) -> bool {
        let started = self.recorder.borrow_mut().start(&self.i18n);
        self.sync_recording_controls();
        started
    }

    pub fn stop_recording(&mut self) {
        self.recorder.borrow_mut().stop(&self.i18n);
        self.sync_recording_controls();
    }

    pub fn recording_error(&mut self, detail: &str) {
        self.recorder.borrow_mut().on_error(detail, &self.i18n);
        self.sync_recording_controls();
    }

    pub fn transcript(&self) -> String {
        self.page
            .by_id(CONSULTATION_TEXT)
            .and_then(|e| e.text())
            .unwrap_or_default()
            .to_string()
    }

    pub fn set_transcript(&mut self, text: &str) {
        if let Some(area) = self.page.by_id_mut(CONSULTATION_TEXT) {
            area.set_text(text);
        }
        self.sync_workflow_controls();
    }

    /// Appends a final recognition result, separated by a space.
    pub fn append_transcript(&mut self, text: &str) {
        let mut transcript = self.transcript();
        transcript.push_str(text);
        transcript.push(' ');
        self.set_transcript(&transcript);
    }

    pub fn set_patient(&mut self, form: PatientForm) {
        self.patient = form;
    }

    /// Plain-text report of the patient, the transcript and the SOAP note.
    pub fn text_report(&self) -> String {
        let patient = report::patient_info(&self.i18n, &self.patient);
        report::text_report(&self.i18n, &patient, &self.transcript(), self.soap.as_ref())
    }

    /// Sends the transcript for SOAP generation and renders the note.
    pub async fn generate_soap(&mut self, client: &ServiceClient) -> bool {
        let transcript = self.transcript();
        let transcript = transcript.trim();
        if transcript.is_empty() {
            let message = self.i18n.tr("enterTranscript");
            self.notify(message);
            return false;
        }

        let patient = report::patient_info(&self.i18n, &self.patient);
        let result = client.generate_soap(transcript, &patient).await;
        match result {
            Ok(note) => {
                let fragment = report::soap(&self.i18n, &note);
                self.render(SOAP_CONTENT, &fragment);
                self.soap = Some(note);
                self.sync_workflow_controls();
                true
            }
            Err(err) => {
                self.fail(&err);
                false
            }
        }
    }

    /// Asks for examinations based on the current SOAP note.
    pub async fn recommend_examinations(&mut self, client: &ServiceClient) -> bool {
        let Some(note) = self.soap.as_ref() else {
            let message = self.i18n.tr("generateFirst");
            self.notify(message);
            return false;
        };

        let transcript = self.transcript();
        let result = client.recommend_examinations(note, transcript.trim()).await;
        match result {
            Ok(exams) => {
                let fragment = report::examinations(&self.i18n, &exams);
                self.render(EXAMINATIONS_CONTENT, &fragment);
                true
            }
            Err(err) => {
                self.fail(&err);
                false
            }
        }
    }

    /// Checks the SOAP plan for drug conflicts. Requires a non-blank plan.
    pub async fn check_drug_conflicts(&mut self, client: &ServiceClient) -> bool {
        let Some(plan) = self
            .soap
            .as_ref()
            .and_then(SoapNote::plan_text)
            .map(str::to_string)
        else {
            let message = self.i18n.tr("generateFirst");
            self.notify(message);
            return false;
        };

        let patient = report::patient_info(&self.i18n, &self.patient);
        let result = client.check_drug_conflicts(&plan, &patient).await;
        match result {
            Ok(outcome) => {
                let fragment = report::drug_check(&self.i18n, &outcome);
                self.render(DRUG_CHECK_CONTENT, &fragment);
                self.drugs_checked = true;
                self.sync_workflow_controls();
                true
            }
            Err(err) => {
                self.fail(&err);
                false
            }
        }
    }

    /// Stores the text report on the backend.
    pub async fn save_report(&mut self, client: &ServiceClient) -> bool {
        let content = self.text_report();
        let result = client.save_report(&content).await;
        match result {
            Ok(filename) => {
                let message = format!("{}{}", self.i18n.tr("reportSaved"), filename);
                self.notify(message);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving report failed");
                let detail = match &err {
                    Error::Service(service) => service.detail().to_string(),
                    other => other.to_string(),
                };
                let message = format!("{}{}", self.i18n.tr("saveFailed"), detail);
                self.notify(message);
                false
            }
        }
    }

    fn notify(&mut self, message: String) {
        tracing::info!(%message, "notice");
        self.notice = Some(message);
    }

    fn fail(&mut self, err: &Error) {
        tracing::warn!(error = %err, "consultation step failed");
        let message = report::error_message(&self.i18n, err);
        self.notice = Some(message);
    }

    fn render(&mut self, id: &str, fragment: &Fragment) {
        if let Some(element) = self.page.by_id_mut(id) {
            fragment.apply_to(element);
        }
    }

    fn sync_workflow_controls(&mut self) {
        let transcript = self.transcript();
        let has_soap = self.soap.is_some();

        if let Some(count) = self.page.by_id_mut(CHAR_COUNT) {
            count.set_text(&transcript.chars().count().to_string());
        }
        for (id, enabled) in [
            (GENERATE_SOAP, !transcript.trim().is_empty()),
            (RECOMMEND_EXAMS, has_soap),
            (CHECK_DRUGS, has_soap),
            (SAVE_REPORT, self.drugs_checked),
        ] {
            if let Some(button) = self.page.by_id_mut(id) {
                button.set_disabled(!enabled);
            }
        }
    }

    fn sync_recording_controls(&mut self) {
        let recorder = self.recorder.borrow();
        let unsupported = recorder.unsupported_label(&self.i18n);

        if let Some(start) = self.page.by_id_mut(START_RECORDING) {
            start.set_disabled(!recorder.can_start());
            if let Some(label) = &unsupported {
                start.set_text(label);
            }
        }
        if let Some(stop) = self.page.by_id_mut(STOP_RECORDING) {
            stop.set_disabled(!recorder.can_stop());
        }

        let status = recorder.status();
        if !status.message.is_empty() {
            if let Some(line) = self.page.by_id_mut(RECORDING_STATUS) {
                line.set_text(&status.message);
                line.set_attr("class", if status.recording { "status recording" } else { "status" });
            }
        }
    }
}
