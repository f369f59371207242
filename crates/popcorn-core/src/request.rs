//! Tracks the single in-flight request of a controller.
//!
//! Every new request cancels the previous one and gets a fresh, strictly
//! increasing id. A completion may only touch state when its id is still the
//! one in flight; anything else was superseded and is dropped.

use serde::Serialize;
use std::fmt;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for one issued request: its id and the token the transport must honour
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: RequestId,
    pub cancel: CancellationToken,
}

#[derive(Debug, Default)]
pub struct RequestGate {
    last_issued: u64,
    in_flight: Option<(RequestId, CancellationToken)>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is in flight and issue a new ticket
    pub fn begin(&mut self) -> Ticket {
        self.cancel();
        self.last_issued += 1;
        let id = RequestId(self.last_issued);
        let cancel = CancellationToken::new();
        self.in_flight = Some((id, cancel.clone()));
        Ticket { id, cancel }
    }

    /// Cancel the in-flight request, if any, returning its id
    pub fn cancel(&mut self) -> Option<RequestId> {
        self.in_flight.take().map(|(id, token)| {
            token.cancel();
            id
        })
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        matches!(self.in_flight, Some((current, _)) if current == id)
    }

    /// Mark `id` as finished. Returns false (and changes nothing) for stale ids.
    pub fn settle(&mut self, id: RequestId) -> bool {
        if self.is_current(id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|(id, _)| *id)
    }
}
