// SPDX-License-Identifier: MPL-2.0
//! HTTP client for the consultation backend.
//!
//! Every endpoint answers with the same envelope:
//! `{"success": bool, "data": ..., "error": "..."}`. A missing or false
//! `success` is a failure carrying the backend's `error` text. No retries.

pub mod types;

use crate::config::ServiceConfig;
use crate::error::{Error, Result, ServiceError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use types::{DrugCheck, DrugCheckOutcome, Examination, PatientInfo, SoapNote};

const GENERATE_SOAP: &str = "/api/generate-soap";
const RECOMMEND_EXAMINATIONS: &str = "/api/recommend-examinations";
const CHECK_DRUG_CONFLICTS: &str = "/api/check-drug-conflicts";
const SAVE_REPORT: &str = "/api/save-report";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
    #[serde(default)]
    prescribed_drugs: Vec<String>,
    filename: Option<String>,
}

impl<T> Envelope<T> {
    /// Splits a successful envelope, or builds the failure with `failure`.
    fn into_result(self, failure: fn(String) -> ServiceError) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            let message = self.error.unwrap_or_else(|| "unknown error".to_string());
            Err(failure(message).into())
        }
    }
}

pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Builds a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("ehr-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "posting to consultation backend");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;

        // Failures come back with a 4xx/5xx status and the same envelope, so
        // the body is parsed regardless of status.
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        parse_envelope(&text).map_err(|err| {
            tracing::warn!(%url, %status, error = %err, "unreadable backend response");
            err
        })
    }

    /// Sends the transcript and patient details, returns the generated note.
    ///
    /// # Errors
    ///
    /// [`ServiceError::GenerateSoap`] when the backend reports failure,
    /// [`ServiceError::Request`] when the request itself fails.
    pub async fn generate_soap(&self, transcript: &str, patient: &PatientInfo) -> Result<SoapNote> {
        let body = json!({ "transcript": transcript, "patient_info": patient });
        let envelope = self
            .post::<_, SoapNote>(GENERATE_SOAP, &body)
            .await?
            .into_result(ServiceError::GenerateSoap)?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// # Errors
    ///
    /// [`ServiceError::RecommendExaminations`] or [`ServiceError::Request`].
    pub async fn recommend_examinations(
        &self,
        soap: &SoapNote,
        transcript: &str,
    ) -> Result<Vec<Examination>> {
        let body = json!({ "soap_data": soap, "transcript": transcript });
        let envelope = self
            .post::<_, Vec<Examination>>(RECOMMEND_EXAMINATIONS, &body)
            .await?
            .into_result(ServiceError::RecommendExaminations)?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// # Errors
    ///
    /// [`ServiceError::CheckDrugs`] or [`ServiceError::Request`].
    pub async fn check_drug_conflicts(
        &self,
        plan_text: &str,
        patient: &PatientInfo,
    ) -> Result<DrugCheckOutcome> {
        let body = json!({ "plan_text": plan_text, "patient_info": patient });
        let envelope = self
            .post::<_, DrugCheck>(CHECK_DRUG_CONFLICTS, &body)
            .await?
            .into_result(ServiceError::CheckDrugs)?;
        Ok(DrugCheckOutcome {
            check: envelope.data.unwrap_or_default(),
            prescribed_drugs: envelope.prescribed_drugs,
        })
    }

    /// Stores a rendered text report, returns the file name chosen by the backend.
    ///
    /// # Errors
    ///
    /// [`ServiceError::SaveReport`] or [`ServiceError::Request`].
    pub async fn save_report(&self, content: &str) -> Result<String> {
        let body = json!({ "content": content });
        let envelope = self
            .post::<_, serde_json::Value>(SAVE_REPORT, &body)
            .await?
            .into_result(ServiceError::SaveReport)?;
        Ok(envelope.filename.unwrap_or_default())
    }
}

fn parse_envelope<T: DeserializeOwned>(text: &str) -> Result<Envelope<T>> {
    serde_json::from_str(text).map_err(|e| Error::Service(ServiceError::Request(e.to_string())))
}
