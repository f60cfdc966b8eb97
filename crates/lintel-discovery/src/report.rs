//! Per-pass outcome reporting.

use crate::filter::Rejection;
use crate::ledger::Epoch;
use lintel_core::TypeKey;
use serde::Serialize;

/// Where an installed interceptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallSource {
    /// Found by scanning the namespace.
    Scan,
    /// Supplied by the application.
    Application,
    /// Installed by the fallback policy.
    Fallback,
}

impl InstallSource {
    /// Returns the label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Application => "application",
            Self::Fallback => "fallback",
        }
    }
}

/// An interceptor installed during the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledInterceptor {
    /// The type key.
    pub key: TypeKey,
    /// The instance's reported name.
    pub name: &'static str,
    /// Where the candidate came from.
    pub source: InstallSource,
}

/// Why a candidate was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "rejection")]
pub enum SkipReason {
    /// The candidate filter rejected it.
    Rejected(Rejection),
    /// It is already registered in the current epoch.
    AlreadyRegistered,
}

/// A candidate that was not installed, without an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    /// The type key.
    pub key: TypeKey,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Category of a recovered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The namespace scan failed.
    Discovery,
    /// A key did not resolve to type metadata.
    Resolution,
    /// A factory failed.
    Instantiation,
}

/// A recovered error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassIssue {
    /// Category.
    pub kind: IssueKind,
    /// The candidate concerned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<TypeKey>,
    /// The error message.
    pub message: String,
}

/// Outcome of one configuration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// The epoch the pass registered in.
    pub epoch: Epoch,
    /// Whether the pass started a new epoch.
    pub restarted: bool,
    /// Installed interceptors, in install order.
    pub installed: Vec<InstalledInterceptor>,
    /// Candidates skipped by decision.
    pub skipped: Vec<SkippedCandidate>,
    /// Errors the pass recovered from.
    pub issues: Vec<PassIssue>,
    /// Whether the fallback interceptor was installed.
    pub fallback_activated: bool,
}

impl PassReport {
    pub(crate) fn new(epoch: Epoch, restarted: bool) -> Self {
        Self {
            epoch,
            restarted,
            installed: Vec::new(),
            skipped: Vec::new(),
            issues: Vec::new(),
            fallback_activated: false,
        }
    }

    /// Returns the installed keys, in install order.
    #[must_use]
    pub fn installed_keys(&self) -> Vec<&TypeKey> {
        self.installed.iter().map(|i| &i.key).collect()
    }

    /// Returns true if `key` was installed by this pass.
    #[must_use]
    pub fn was_installed(&self, key: &TypeKey) -> bool {
        self.installed.iter().any(|i| &i.key == key)
    }

    /// Returns the skip reason recorded for `key`, if any.
    #[must_use]
    pub fn skip_reason(&self, key: &TypeKey) -> Option<SkipReason> {
        self.skipped
            .iter()
            .find(|s| &s.key == key)
            .map(|s| s.reason)
    }

    /// Returns the issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &PassIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Returns true if the pass recovered from no errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn issue(&mut self, kind: IssueKind, key: Option<&TypeKey>, message: String) {
        self.issues.push(PassIssue {
            kind,
            key: key.cloned(),
            message,
        });
    }

    pub(crate) fn skip(&mut self, key: &TypeKey, reason: SkipReason) {
        self.skipped.push(SkippedCandidate {
            key: key.clone(),
            reason,
        });
    }
}
