//! Ordering of overlapping fetches.
//!
//! Fetches are never cancelled once issued, so their replies can land in any
//! order. Each fetch is tagged with a sequence number; a reply is applied only
//! if it is newer than the last one that completed, successfully or not. A
//! slow older reply can never overwrite a newer one, and a failed newer fetch
//! keeps an older reply for different parameters from being shown.

/// Sequence counter for one kind of fetch.
#[derive(Debug, Default, Clone)]
pub struct RequestSeq {
    issued: u64,
    /// Newest request that has completed, applied or failed.
    settled: u64,
}

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether `seq` is the most recently issued request.
    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }

    /// Record a successful reply; returns false if it is stale.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq > self.settled {
            self.settled = seq;
            true
        } else {
            false
        }
    }

    /// Record a failed request. Older replies arriving later are stale.
    pub fn reject(&mut self, seq: u64) {
        self.settled = self.settled.max(seq);
    }

    pub fn last_issued(&self) -> u64 {
        self.issued
    }
}
