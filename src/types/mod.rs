// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! OpenShift image API types.

pub mod image;

pub use image::{
    parse_tag_name, Image, ImageStream, ImageStreamImport, ImageStreamImportSpec,
    ImageStreamSpec, ImageStreamTag,
};
