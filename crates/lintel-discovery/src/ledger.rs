//! Registration ledger.
//!
//! The ledger remembers which interceptor types have been registered, and in
//! which epoch. Within one epoch a key is installed at most once; a restart
//! starts a new epoch in which every key may register again. Entries from
//! older epochs are kept for audit and no longer block.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lintel_core::{MiddlewareDescriptor, TypeKey};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

/// A registration generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch of a fresh ledger.
    pub const INITIAL: Self = Self(1);

    /// Returns the epoch number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
struct LedgerEntry {
    descriptor: MiddlewareDescriptor,
    epoch: Epoch,
    registered_at: DateTime<Utc>,
}

/// One ledger entry, as returned by [`RegistrationLedger::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    /// The registered descriptor.
    pub descriptor: MiddlewareDescriptor,
    /// The epoch the descriptor was registered in.
    pub epoch: Epoch,
    /// When it was registered.
    pub registered_at: DateTime<Utc>,
    /// True if `epoch` is the ledger's current epoch.
    pub live: bool,
}

#[derive(Debug)]
struct LedgerState {
    epoch: Epoch,
    entries: IndexMap<TypeKey, LedgerEntry>,
}

/// Process-wide record of interceptor registrations.
///
/// All methods take `&self`; the ledger is shared as
/// `Arc<RegistrationLedger>` between the engine and diagnostic readers.
///
/// # Example
///
/// ```
/// use lintel_core::{MiddlewareDescriptor, PatternSpec, TypeKey};
/// use lintel_discovery::RegistrationLedger;
///
/// let ledger = RegistrationLedger::new();
/// let descriptor = MiddlewareDescriptor::new(TypeKey::new("app::Auth"), &PatternSpec::match_all());
///
/// let epoch = ledger.current_epoch();
/// assert!(ledger.try_register(&descriptor, epoch));
/// assert!(!ledger.try_register(&descriptor, epoch));
///
/// let epoch = ledger.restart();
/// assert!(ledger.try_register(&descriptor, epoch));
/// ```
#[derive(Debug)]
pub struct RegistrationLedger {
    state: Mutex<LedgerState>,
}

impl RegistrationLedger {
    /// Creates an empty ledger at [`Epoch::INITIAL`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                epoch: Epoch::INITIAL,
                entries: IndexMap::new(),
            }),
        }
    }

    /// Registers `descriptor` in `epoch` unless its key is already
    /// registered in `epoch` or a later one.
    ///
    /// Returns true if the caller should install the interceptor. The check
    /// and the mark happen under one lock, so concurrent callers racing on
    /// the same key and epoch see exactly one `true`.
    pub fn try_register(&self, descriptor: &MiddlewareDescriptor, epoch: Epoch) -> bool {
        let mut state = self.state.lock();

        if let Some(existing) = state.entries.get(descriptor.key()) {
            if existing.epoch >= epoch {
                return false;
            }
        }

        // Re-registration moves the key to the end so the snapshot follows
        // registration order.
        state.entries.shift_remove(descriptor.key());
        state.entries.insert(
            descriptor.key().clone(),
            LedgerEntry {
                descriptor: descriptor.clone(),
                epoch,
                registered_at: Utc::now(),
            },
        );
        true
    }

    /// Removes the registration of `key` made in `epoch`.
    ///
    /// Used when the install that followed a successful
    /// [`try_register`](Self::try_register) failed. Returns false if `key` is
    /// not registered in exactly `epoch`.
    pub fn release(&self, key: &TypeKey, epoch: Epoch) -> bool {
        let mut state = self.state.lock();
        match state.entries.get(key) {
            Some(entry) if entry.epoch == epoch => {
                state.entries.shift_remove(key);
                true
            }
            _ => false,
        }
    }

    /// Starts a new epoch and returns it.
    pub fn restart(&self) -> Epoch {
        let mut state = self.state.lock();
        state.epoch = state.epoch.next();
        state.epoch
    }

    /// Returns the current epoch.
    #[must_use]
    pub fn current_epoch(&self) -> Epoch {
        self.state.lock().epoch
    }

    /// Returns true if `key` is registered in the current epoch.
    #[must_use]
    pub fn is_installed(&self, key: &TypeKey) -> bool {
        let state = self.state.lock();
        state
            .entries
            .get(key)
            .is_some_and(|entry| entry.epoch == state.epoch)
    }

    /// Returns the number of registrations in the current epoch.
    #[must_use]
    pub fn live_count(&self) -> usize {
        let state = self.state.lock();
        state
            .entries
            .values()
            .filter(|entry| entry.epoch == state.epoch)
            .count()
    }

    /// Returns every entry, live and stale, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LedgerRecord> {
        let state = self.state.lock();
        state
            .entries
            .values()
            .map(|entry| LedgerRecord {
                descriptor: entry.descriptor.clone(),
                epoch: entry.epoch,
                registered_at: entry.registered_at,
                live: entry.epoch == state.epoch,
            })
            .collect()
    }
}

impl Default for RegistrationLedger {
    fn default() -> Self {
        Self::new()
    }
}
