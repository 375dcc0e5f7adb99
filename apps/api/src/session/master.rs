//! Master playback election register
//!
//! At most one connection holds master playback rights at a time. Claiming
//! is an unconditional grant: whoever claims last wins, and a displaced
//! holder is reported back to the caller so it can be notified. There is no
//! arbitration or approval step; a displaced master is demoted to follower
//! view, nothing is lost.

use uuid::Uuid;

/// Result of a claim: who holds master now, and who was displaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// The connection the claim was granted to
    pub granted: Uuid,
    /// The previous holder, if the claim displaced one
    pub revoked: Option<Uuid>,
}

/// Singleton register tracking the current master connection
#[derive(Debug, Default)]
pub struct MasterElection {
    holder: Option<Uuid>,
}

impl MasterElection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant master rights to `connection_id`, displacing any previous
    /// holder. Re-claiming by the current holder is granted with no
    /// revocation.
    pub fn claim(&mut self, connection_id: Uuid) -> ClaimOutcome {
        let revoked = self.holder.filter(|&prev| prev != connection_id);
        self.holder = Some(connection_id);
        ClaimOutcome {
            granted: connection_id,
            revoked,
        }
    }

    /// Release master rights if `connection_id` is the current holder.
    ///
    /// Releasing when not the holder is silently ignored: the holder may
    /// already have changed by the time a release arrives.
    pub fn release(&mut self, connection_id: Uuid) {
        if self.holder == Some(connection_id) {
            self.holder = None;
        }
    }

    /// The current holder, if any
    pub fn holder(&self) -> Option<Uuid> {
        self.holder
    }
}
