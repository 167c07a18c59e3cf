// SPDX-License-Identifier: MPL-2.0
//! Document model and result rendering.

pub mod page;
pub mod report;
