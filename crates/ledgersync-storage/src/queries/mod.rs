// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. All functions accept `&Database` and go through
//! the single writer connection.

pub mod accounts;
pub mod connections;
pub mod jobs;
pub mod transactions;
