//! Two-phase connection pairing state.
//!
//! The first pairing command stores an endpoint here; the second takes
//! it and attempts the join. The store survives resyncs because
//! endpoints address blocks by permanent identity.

use crate::EndpointRef;

/// At most one remembered endpoint, waiting for its partner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingConnection {
    stored: Option<EndpointRef>,
}

impl PendingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The remembered endpoint, if any.
    #[inline]
    pub fn stored(&self) -> Option<&EndpointRef> {
        self.stored.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stored.is_none()
    }

    /// Remember an endpoint, replacing any previous one.
    pub fn store(&mut self, endpoint: EndpointRef) {
        self.stored = Some(endpoint);
    }

    /// Take the remembered endpoint, leaving the store empty.
    pub fn take(&mut self) -> Option<EndpointRef> {
        self.stored.take()
    }

    /// Drop the remembered endpoint. Returns true if one was present.
    pub fn clear(&mut self) -> bool {
        self.stored.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_take_cycle() {
        let mut pending = PendingConnection::new();
        assert!(pending.is_empty());
        assert_eq!(pending.take(), None);

        pending.store(EndpointRef::next(1));
        assert!(!pending.is_empty());
        assert_eq!(pending.stored(), Some(&EndpointRef::next(1)));

        assert_eq!(pending.take(), Some(EndpointRef::next(1)));
        assert!(pending.is_empty());
    }

    #[test]
    fn second_store_replaces_first() {
        let mut pending = PendingConnection::new();
        pending.store(EndpointRef::next(1));
        pending.store(EndpointRef::previous(2));
        assert_eq!(pending.take(), Some(EndpointRef::previous(2)));
    }

    #[test]
    fn clear_reports_presence() {
        let mut pending = PendingConnection::new();
        assert!(!pending.clear());
        pending.store(EndpointRef::input(3, "VALUE"));
        assert!(pending.clear());
        assert!(pending.is_empty());
    }
}
