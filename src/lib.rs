// Copyright 2026 Rankgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rankgate library — HTTP gateway resolving game usernames to ranked tiers.
//!
//! One component: a [`resolver::Resolver`] that fetches an upstream profile
//! API or HTML profile page and extracts a rank label through an ordered
//! chain of extraction strategies. The REST layer in [`rest`] is a thin
//! mapping from resolver outcomes to HTTP responses.
//!
//! This library crate exposes the core modules for integration testing.

pub mod config;
pub mod error;
pub mod resolver;
pub mod rest;
pub mod types;
