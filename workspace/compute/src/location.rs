//! Map point selection with best-effort address lookup.
//!
//! Selecting a point always succeeds immediately. The address lookup that
//! follows may fail or settle out of order; only the outcome belonging to the
//! most recently issued selection is applied, and failures keep the previous
//! address.

use common::{DEFAULT_POSITION, LatLng};
use tracing::{debug, trace, warn};

use crate::api::ReverseGeocoder;
use crate::error::GeocodeError;

/// Handle for one pending address lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupTicket {
    pub seq: u64,
    pub point: LatLng,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationPicker {
    position: LatLng,
    address: Option<String>,
    latest: u64,
}

impl Default for LocationPicker {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION)
    }
}

impl LocationPicker {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            address: None,
            latest: 0,
        }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Moves the marker and supersedes any pending lookup.
    pub fn select(&mut self, point: LatLng) -> LookupTicket {
        self.latest += 1;
        self.position = point;
        trace!("Selected point {:?} (lookup #{})", point, self.latest);
        LookupTicket {
            seq: self.latest,
            point,
        }
    }

    pub fn is_current(&self, ticket: &LookupTicket) -> bool {
        ticket.seq == self.latest
    }

    /// Applies a lookup outcome. Returns the new address when it was applied.
    pub fn settle(
        &mut self,
        ticket: LookupTicket,
        outcome: Result<String, GeocodeError>,
    ) -> Option<&str> {
        if !self.is_current(&ticket) {
            debug!("Dropping stale address lookup #{} (latest #{})", ticket.seq, self.latest);
            return None;
        }
        match outcome {
            Ok(name) if !name.trim().is_empty() => {
                self.address = Some(name);
                self.address.as_deref()
            }
            Ok(_) => {
                debug!("Lookup #{} returned an empty address", ticket.seq);
                None
            }
            Err(e) => {
                warn!("Address lookup #{} failed, keeping previous address: {}", ticket.seq, e);
                None
            }
        }
    }
}

/// Runs the lookup for a ticket. The result is meant for
/// [`LocationPicker::settle`].
pub async fn lookup<G: ReverseGeocoder + ?Sized>(
    geocoder: &G,
    ticket: LookupTicket,
) -> (LookupTicket, Result<String, GeocodeError>) {
    let outcome = geocoder.reverse(ticket.point).await;
    (ticket, outcome)
}
