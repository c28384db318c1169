//! Recursive masking of blacklisted fields in arbitrary payloads.

pub mod blacklist;
pub mod engine;

pub use blacklist::Blacklist;
pub use engine::{MAX_DEPTH, sanitize};

use crate::domain::Payload;
use parking_lot::RwLock;
use std::sync::Arc;

pub const DEFAULT_MASK: &str = "[REDACTED]";

/// Blacklist plus mask, shared by every log call of one service.
#[derive(Debug)]
pub struct Redactor {
    blacklist: Blacklist,
    mask: RwLock<Arc<str>>,
}

impl Redactor {
    pub fn new<I, S>(blacklist: I, mask: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mask: String = mask.into();
        Self {
            blacklist: Blacklist::new(blacklist),
            mask: RwLock::new(Arc::from(mask)),
        }
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn mask(&self) -> Arc<str> {
        Arc::clone(&self.mask.read())
    }

    pub fn set_mask(&self, mask: impl Into<String>) {
        let mask: String = mask.into();
        *self.mask.write() = Arc::from(mask);
    }

    /// Sanitize against a consistent snapshot of blacklist and mask.
    pub fn sanitize(&self, payload: &Payload) -> Payload {
        let blacklist = self.blacklist.snapshot();
        let mask = self.mask();
        sanitize(payload, &blacklist, &mask)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), DEFAULT_MASK)
    }
}
