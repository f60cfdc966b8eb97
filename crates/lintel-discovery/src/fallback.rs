//! Fallback policy.

/// Install progress of one configuration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackState {
    /// No interceptor has been installed in this pass.
    #[default]
    NothingInstalled,
    /// At least one interceptor has been installed in this pass.
    SomethingInstalled,
}

impl FallbackState {
    /// Records a successful install.
    pub fn record_install(&mut self) {
        *self = Self::SomethingInstalled;
    }

    /// Returns true if the pass must install the fallback interceptor.
    ///
    /// `live_registrations` is the ledger's count for the current epoch. A
    /// pass that installed nothing because every candidate was already
    /// registered earlier in the epoch leaves those earlier installs in
    /// place, so no fallback is needed.
    #[must_use]
    pub fn needs_fallback(self, live_registrations: usize) -> bool {
        self == Self::NothingInstalled && live_registrations == 0
    }
}
