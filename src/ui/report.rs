// SPDX-License-Identifier: MPL-2.0
//! Rendering of backend results with localized labels.
//!
//! Headings and severity labels come from the translation tables and are
//! trusted. Everything the backend returns is escaped before it is placed in
//! markup.

use super::page::Element;
use crate::error::Error;
use crate::i18n::I18n;
use crate::service::types::{DrugCheckOutcome, Examination, PatientInfo, Priority, SoapNote};
use std::fmt::Write as _;

/// Content destined for one result container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Markup(String),
}

impl Fragment {
    pub fn apply_to(&self, element: &mut Element) {
        match self {
            Fragment::Text(text) => element.set_text(text),
            Fragment::Markup(markup) => element.set_markup(markup),
        }
    }
}

/// Raw patient form values before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub medical_history: String,
    pub allergies: String,
    pub current_medications: String,
}

/// Escapes text for inclusion in markup.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Translation key for a gender form value, if it is one of the fixed choices.
pub fn gender_key(value: &str) -> Option<&'static str> {
    match value {
        "not_provided" => Some("patientGenderPlaceholder"),
        "male" => Some("patientGenderMale"),
        "female" => Some("patientGenderFemale"),
        "other" => Some("patientGenderOther"),
        _ => None,
    }
}

/// Builds the payload sent to the backend, filling empty fields with the
/// localized "not provided" / "none" placeholders.
pub fn patient_info(i18n: &I18n, form: &PatientForm) -> PatientInfo {
    let not_provided = i18n.tr("notProvided");
    let none = i18n.tr("none");
    let or = |value: &str, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    PatientInfo {
        name: or(&form.name, &not_provided),
        age: or(&form.age, &not_provided),
        gender: form.gender.clone(),
        gender_display: gender_key(&form.gender)
            .map_or_else(|| form.gender.clone(), |key| i18n.tr(key)),
        medical_history: or(&form.medical_history, &none),
        allergies: or(&form.allergies, &none),
        current_medications: or(&form.current_medications, &none),
    }
}

/// SOAP note with one heading per section.
pub fn soap(i18n: &I18n, note: &SoapNote) -> Fragment {
    if let Some(error) = non_blank(note.error.as_deref()) {
        return Fragment::Text(format!("{}{}", i18n.tr("error"), error));
    }

    let not_provided = i18n.tr("notProvided");
    let mut html = String::new();
    let mut section = |key: &str, body: &str| {
        let _ = write!(html, "<h3>{}</h3><p>{}</p>", i18n.tr(key), escape(body));
    };

    section(
        "chiefComplaint",
        non_blank(note.chief_complaint.as_deref()).unwrap_or(&not_provided),
    );
    section("subjective", note.subjective.as_deref().unwrap_or_default());
    section("objective", note.objective.as_deref().unwrap_or_default());
    section("assessment", note.assessment.as_deref().unwrap_or_default());
    section("plan", note.plan.as_deref().unwrap_or_default());

    let _ = write!(html, "<h3>{}</h3><ul>", i18n.tr("preliminaryDiagnosis"));
    for diagnosis in &note.preliminary_diagnosis {
        let _ = write!(html, "<li>{}</li>", escape(diagnosis));
    }
    html.push_str("</ul>");

    Fragment::Markup(html)
}

/// Recommended examinations grouped high → medium → low.
///
/// Examinations whose priority is not one of the three levels are not listed.
pub fn examinations(i18n: &I18n, exams: &[Examination]) -> Fragment {
    if exams.is_empty() {
        return Fragment::Text(i18n.tr("noExams"));
    }

    let reason = i18n.tr("reason");
    let mut html = String::new();
    for priority in Priority::ALL {
        let group: Vec<&Examination> = exams
            .iter()
            .filter(|exam| exam.priority() == Some(priority))
            .collect();
        if group.is_empty() {
            continue;
        }

        let _ = write!(html, "<h3>{}</h3><ul>", i18n.tr(priority.i18n_key()));
        for exam in group {
            let _ = write!(
                html,
                "<li><strong>{}</strong> ({})<br>{}: {}</li>",
                escape(&exam.name),
                escape(&exam.kind),
                reason,
                escape(&exam.reason)
            );
        }
        html.push_str("</ul>");
    }

    Fragment::Markup(html)
}

/// Drug conflict assessment.
pub fn drug_check(i18n: &I18n, outcome: &DrugCheckOutcome) -> Fragment {
    let check = &outcome.check;
    let mut html = String::new();

    if !outcome.prescribed_drugs.is_empty() {
        let drugs: Vec<String> = outcome.prescribed_drugs.iter().map(|d| escape(d)).collect();
        let _ = write!(
            html,
            "<h3>{}</h3><p>{}</p>",
            i18n.tr("detectedDrugs"),
            drugs.join(", ")
        );
    }

    if let Some(message) = non_blank(check.message.as_deref()) {
        let _ = write!(html, "<p>{}</p>", escape(message));
        return Fragment::Markup(html);
    }

    let severity = check.severity();
    let _ = write!(
        html,
        "<h3>{}</h3><p>{} {}</p>",
        i18n.tr("overallAssessment"),
        severity.glyph(),
        i18n.tr(severity.i18n_key())
    );

    let interactions: Vec<String> = check.drug_interactions.iter().map(ToString::to_string).collect();
    let lists: [(&str, &str, &[String]); 5] = [
        ("allergyWarnings", "⚠️", check.allergy_warnings.as_slice()),
        ("drugInteractions", "⚠️", interactions.as_slice()),
        ("contraindications", "🚫", check.contraindications.as_slice()),
        ("dosageWarnings", "⚠️", check.dosage_warnings.as_slice()),
        ("recommendations", "💡", check.recommendations.as_slice()),
    ];
    for (key, glyph, items) in lists {
        if items.is_empty() {
            continue;
        }
        let _ = write!(html, "<h3>{}</h3><ul>", i18n.tr(key));
        for item in items {
            let _ = write!(html, "<li>{} {}</li>", glyph, escape(item));
        }
        html.push_str("</ul>");
    }

    if !check.has_conflicts && check.allergy_warnings.is_empty() && check.drug_interactions.is_empty() {
        let _ = write!(html, "<p>✅ {}</p>", i18n.tr("noRisk"));
    }

    Fragment::Markup(html)
}

/// Plain-text report submitted to the backend for saving.
pub fn text_report(
    i18n: &I18n,
    patient: &PatientInfo,
    transcript: &str,
    note: Option<&SoapNote>,
) -> String {
    let rule = "=".repeat(60);
    let mut report = format!("{rule}\nEHR Agent Report\n{rule}\n\n");

    let gender = if patient.gender_display.is_empty() {
        &patient.gender
    } else {
        &patient.gender_display
    };
    let _ = writeln!(report, "{}", i18n.tr("reportPatientInfo"));
    let _ = writeln!(report, "{}: {}", i18n.tr("reportName"), patient.name);
    let _ = writeln!(report, "{}: {}", i18n.tr("reportAge"), patient.age);
    let _ = writeln!(report, "{}: {}", i18n.tr("reportGender"), gender);
    let _ = writeln!(report, "{}: {}", i18n.tr("reportHistory"), patient.medical_history);
    let _ = writeln!(report, "{}: {}", i18n.tr("reportAllergies"), patient.allergies);
    let _ = writeln!(report, "{}: {}\n", i18n.tr("reportMeds"), patient.current_medications);

    let _ = writeln!(report, "{}\n{}\n", i18n.tr("reportConsultation"), transcript);

    if let Some(note) = note {
        let not_provided = i18n.tr("notProvided");
        let _ = writeln!(report, "{}", i18n.tr("reportSOAP"));
        let _ = writeln!(
            report,
            "{}: {}\n",
            i18n.tr("reportChiefComplaint"),
            non_blank(note.chief_complaint.as_deref()).unwrap_or(&not_provided)
        );
        for (label, body) in [
            ("Subjective", &note.subjective),
            ("Objective", &note.objective),
            ("Assessment", &note.assessment),
            ("Plan", &note.plan),
        ] {
            let _ = writeln!(report, "{}:\n{}\n", label, body.as_deref().unwrap_or_default());
        }
        let _ = writeln!(
            report,
            "{}: {}\n",
            i18n.tr("reportDiagnosis"),
            note.preliminary_diagnosis.join(", ")
        );
    }

    report
}

/// User-facing message for a failed operation: localized prefix plus detail.
pub fn error_message(i18n: &I18n, error: &Error) -> String {
    match error {
        Error::Service(err) => format!("{}{}", i18n.tr(err.i18n_key()), err.detail()),
        Error::Network(msg) => format!("{}{}", i18n.tr("requestFailed"), msg),
        other => format!("{}{}", i18n.tr("error"), other),
    }
}
