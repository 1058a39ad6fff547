//! Hidden state encryption policy
//!
//! Process-wide, immutable after construction, read concurrently by every
//! rendering request. Individual operations may be exempted from
//! encryption; a form mixing exempt and protected operations is encrypted
//! as a whole, because one operation's exemption must never let another's
//! protected state escape unencrypted.

use std::collections::HashSet;

use tracing::warn;

use formrelay_core::RequestId;

/// Global encryption policy with per-operation exemptions
#[derive(Debug, Clone, Default)]
pub struct EncryptionPolicy {
    encrypt: bool,
    exempt: HashSet<RequestId>,
}

impl EncryptionPolicy {
    /// Encryption off for every form
    pub fn disabled() -> Self {
        EncryptionPolicy::default()
    }

    /// Encryption on, with the given operations exempted
    pub fn enabled<I>(exempt: I) -> Self
    where
        I: IntoIterator<Item = RequestId>,
    {
        EncryptionPolicy {
            encrypt: true,
            exempt: exempt.into_iter().collect(),
        }
    }

    pub fn encrypts(&self) -> bool {
        self.encrypt
    }

    pub fn is_exempt(&self, request_id: &RequestId) -> bool {
        self.exempt.contains(request_id)
    }

    /// Decide whether a form carrying the given request ids is encrypted.
    ///
    /// Encryption applies when the policy is on and at least one
    /// registered id is not exempt. A mixed form is logged once and
    /// encrypted in full: non-exempt wins.
    pub fn needs_encryption(&self, request_ids: &[&RequestId]) -> bool {
        if !self.encrypt {
            return false;
        }

        let non_exempt = request_ids
            .iter()
            .filter(|id| !self.exempt.contains(*id))
            .count();
        if non_exempt == 0 {
            return false;
        }
        if non_exempt < request_ids.len() {
            warn!(
                "form mixes encryption-exempt and protected request ids, encrypting the whole form"
            );
        }
        true
    }
}
