// SPDX-License-Identifier: MPL-2.0
//! `ehr_agent` is the client side of a medical-consultation assistant.
//!
//! It renders a consultation page in English, Chinese or French, drives a
//! speech engine to capture the consultation, and talks to a backend that
//! turns transcripts into SOAP notes, examination recommendations and drug
//! checks. Interface text comes from Fluent tables through [`i18n::I18n`].

#![doc(html_root_url = "https://docs.rs/ehr_agent/0.1.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod recording;
pub mod service;
pub mod ui;
