// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Change detection for scene snapshots.
//!
//! A [`Fingerprint`] is the canonical JSON serialization of a [`DiagramState`] plus a fast hash
//! of it. Element order is part of the canonical form (it is the z-order); presentation keys and
//! asset ids are serialized sorted, so their insertion order never matters.

use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;

use rustc_hash::FxHasher;
use serde::Serialize;

use crate::model::{Assets, DiagramElement, DiagramState, PresentationState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalState<'a> {
    elements: &'a [DiagramElement],
    app_state: &'a PresentationState,
    files: &'a Assets,
}

/// Equality token for a scene snapshot. Never persisted.
#[derive(Clone)]
pub struct Fingerprint {
    hash: u64,
    canonical: Arc<str>,
}

impl Fingerprint {
    pub fn digest(&self) -> u64 {
        self.hash
    }

    /// Short hex form used in logs and protocol responses.
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.hash)
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.canonical == other.canonical
    }
}

impl Eq for Fingerprint {}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("hash", &format_args!("{:016x}", self.hash))
            .field("len", &self.canonical.len())
            .finish()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.hash)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to serialize scene for fingerprinting: {0}")]
pub struct FingerprintError(#[from] serde_json::Error);

/// Computes the fingerprint of `state`. Pure; safe to call on every interaction tick.
pub fn fingerprint(state: &DiagramState) -> Result<Fingerprint, FingerprintError> {
    let canonical = serde_json::to_string(&CanonicalState {
        elements: &state.elements,
        app_state: &state.app_state,
        files: &state.files,
    })?;

    let mut hasher = FxHasher::default();
    hasher.write(canonical.as_bytes());

    Ok(Fingerprint { hash: hasher.finish(), canonical: Arc::from(canonical) })
}

/// Signature of a fingerprinting function, so the emission path can be exercised with one that
/// fails.
pub type FingerprintFn = fn(&DiagramState) -> Result<Fingerprint, FingerprintError>;
