// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Image stream tag synchronization logic.

pub mod filter;
pub mod finalizers;
pub mod image_streams;
pub mod import;
pub mod pull_secret;
pub mod selector;
pub mod syncer;

pub use filter::ObjectFilter;
pub use selector::find_newest;
pub use syncer::RegistrySyncer;
