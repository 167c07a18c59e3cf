// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Storage(String),
    Network(String),
    Service(ServiceError),
    Speech(String),
}

/// Failures reported by the consultation backend.
///
/// Each variant carries the backend (or transport) message and maps to the
/// localized prefix shown in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// `/api/generate-soap` answered with `success: false`.
    GenerateSoap(String),

    /// `/api/recommend-examinations` answered with `success: false`.
    RecommendExaminations(String),

    /// `/api/check-drug-conflicts` answered with `success: false`.
    CheckDrugs(String),

    /// `/api/save-report` answered with `success: false`.
    SaveReport(String),

    /// The request could not be completed or the body was not understood.
    Request(String),
}

impl ServiceError {
    /// Returns the i18n message key used as a prefix for this failure.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ServiceError::GenerateSoap(_) => "generateSOAPFailed",
            ServiceError::RecommendExaminations(_) => "recommendFailed",
            ServiceError::CheckDrugs(_) => "checkFailed",
            ServiceError::SaveReport(_) => "saveFailed",
            ServiceError::Request(_) => "requestFailed",
        }
    }

    /// The raw message appended after the localized prefix.
    pub fn detail(&self) -> &str {
        match self {
            ServiceError::GenerateSoap(msg)
            | ServiceError::RecommendExaminations(msg)
            | ServiceError::CheckDrugs(msg)
            | ServiceError::SaveReport(msg)
            | ServiceError::Request(msg) => msg,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::GenerateSoap(msg) => write!(f, "SOAP generation failed: {}", msg),
            ServiceError::RecommendExaminations(msg) => {
                write!(f, "Examination recommendation failed: {}", msg)
            }
            ServiceError::CheckDrugs(msg) => write!(f, "Drug conflict check failed: {}", msg),
            ServiceError::SaveReport(msg) => write!(f, "Saving report failed: {}", msg),
            ServiceError::Request(msg) => write!(f, "Request failed: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Storage(e) => write!(f, "Storage Error: {}", e),
            Error::Network(e) => write!(f, "Network Error: {}", e),
            Error::Service(e) => write!(f, "Service Error: {}", e),
            Error::Speech(e) => write!(f, "Speech Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ServiceError> for Error {
    fn from(err: ServiceError) -> Self {
        Error::Service(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
