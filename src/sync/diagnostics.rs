// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::link::LinkIssue;

/// Degraded-but-recovered conditions reported to the owner. Nothing here is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A snapshot could not be fingerprinted; it was emitted anyway.
    FingerprintFailed { error: String },
    /// An inbound scene had inconsistent links; it was applied as is.
    LinkIssues { issues: Vec<LinkIssue> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FingerprintFailed { error } => {
                write!(f, "fingerprint failed, emitting anyway: {error}")
            }
            Self::LinkIssues { issues } => {
                write!(f, "inbound scene has {} inconsistent link(s)", issues.len())
            }
        }
    }
}

pub type DiagnosticSink = Box<dyn FnMut(Diagnostic)>;

/// Best-effort diagnostic channel shared by the reconciler and the emitter.
#[derive(Clone, Default)]
pub struct Diagnostics {
    sink: Rc<RefCell<Option<DiagnosticSink>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sink(&self, sink: DiagnosticSink) {
        *self.sink.borrow_mut() = Some(sink);
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        // A sink that reports from inside itself would hit the borrow; drop those.
        let Ok(mut sink) = self.sink.try_borrow_mut() else {
            return;
        };
        if let Some(sink) = sink.as_mut() {
            sink(diagnostic);
        }
    }
}
