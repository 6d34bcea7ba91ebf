//! Virtualization support: scroll-reset triggers and the auto-scan controller.
//!
//! Windowing itself belongs to the rendering layer. This module decides
//! *when* the view must jump back to the top and *when* another listing
//! page should be fetched.

use crate::config::ScanPolicy;
use crate::models::{BrowseContext, FilterState};

// =============================================================================
// Request Guards
// =============================================================================

/// Generation stamp handed out with an async request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Generation counter for discarding results of superseded requests.
///
/// Every context change calls [`invalidate`](Self::invalidate); a result
/// whose ticket is no longer current must be ignored.
#[derive(Clone, Debug, Default)]
pub struct RequestGuard {
    generation: u64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.generation)
    }

    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }
}

// =============================================================================
// Scroll Reset
// =============================================================================

/// Everything whose change must scroll the list back to the top.
///
/// Sort, type filter, favorites flags and the structured filters all live
/// in [`FilterState`], so comparing by value covers them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewResetKey {
    pub context: BrowseContext,
    pub search: String,
    pub filter: FilterState,
}

impl ViewResetKey {
    pub fn new(context: &BrowseContext, search: &str, filter: &FilterState) -> Self {
        Self {
            context: context.clone(),
            search: search.trim().to_string(),
            filter: filter.clone(),
        }
    }
}

/// Remembers the last reset key and reports changes.
#[derive(Clone, Debug, Default)]
pub struct ScrollResetTracker {
    last: Option<ViewResetKey>,
}

impl ScrollResetTracker {
    /// Record `key`; returns `true` if the view must scroll to the top.
    pub fn observe(&mut self, key: ViewResetKey) -> bool {
        if self.last.as_ref() == Some(&key) {
            return false;
        }
        self.last = Some(key);
        true
    }
}

// =============================================================================
// Auto-scan
// =============================================================================

/// Snapshot of the list that drives one auto-scan decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanInputs {
    /// Raw entries (prefixes + objects) across all fetched pages.
    pub raw_total: usize,
    /// Derived rows currently in the list.
    pub row_count: usize,
    /// Index of the last row the virtualizer is rendering, if any.
    pub last_visible: Option<usize>,
    /// A search or narrowing filter is applied.
    pub filtering: bool,
    /// The server reported more pages.
    pub has_more: bool,
    pub is_advanced: bool,
    /// Monotonic clock in milliseconds.
    pub now_ms: f64,
}

/// What the list should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanDecision {
    /// Nothing to do right now.
    Idle,
    /// Fetch the next page automatically.
    Fetch,
    /// Cap reached: stop scanning and show a manual "load more" control.
    LoadMore,
}

/// Fetches further listing pages while the user nears the end of the list
/// or while a filter hides most rows, up to a row cap.
///
/// At most one page request is outstanding at a time.
#[derive(Clone, Debug, Default)]
pub struct AutoScanController {
    policy: ScanPolicy,
    guard: RequestGuard,
    in_flight: Option<Ticket>,
    last_fetch_ms: Option<f64>,
}

impl AutoScanController {
    pub fn new(policy: ScanPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    fn near_end(&self, inputs: &ScanInputs) -> bool {
        match inputs.last_visible {
            Some(idx) => idx + self.policy.near_end_rows >= inputs.row_count,
            None => inputs.row_count <= self.policy.near_end_rows,
        }
    }

    /// Decide the next step without changing state.
    pub fn decide(&self, inputs: &ScanInputs) -> ScanDecision {
        if !inputs.has_more {
            return ScanDecision::Idle;
        }
        if inputs.raw_total >= self.policy.cap(inputs.is_advanced) {
            return ScanDecision::LoadMore;
        }
        if self.in_flight.is_some() {
            return ScanDecision::Idle;
        }
        if !inputs.filtering && !self.near_end(inputs) {
            return ScanDecision::Idle;
        }
        if self
            .last_fetch_ms
            .is_some_and(|last| inputs.now_ms - last < self.policy.cooldown_ms)
        {
            return ScanDecision::Idle;
        }
        ScanDecision::Fetch
    }

    /// Decide and, when a fetch is due, mark it in flight.
    pub fn poll(&mut self, inputs: &ScanInputs) -> (ScanDecision, Option<Ticket>) {
        let decision = self.decide(inputs);
        let ticket = match decision {
            ScanDecision::Fetch => Some(self.begin_fetch(inputs.now_ms)),
            ScanDecision::Idle | ScanDecision::LoadMore => None,
        };
        (decision, ticket)
    }

    /// Manual "load more": fetch one page regardless of the cap.
    pub fn load_more(&mut self, has_more: bool, now_ms: f64) -> Option<Ticket> {
        if !has_more || self.in_flight.is_some() {
            return None;
        }
        log::info!("manual load more");
        Some(self.begin_fetch(now_ms))
    }

    /// Mark a page request as outstanding.
    pub fn begin_fetch(&mut self, now_ms: f64) -> Ticket {
        let ticket = self.guard.issue();
        self.in_flight = Some(ticket);
        self.last_fetch_ms = Some(now_ms);
        ticket
    }

    /// A page request settled (success or failure).
    ///
    /// Returns `false` for a stale ticket, whose page must be discarded.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if !self.guard.is_current(ticket) {
            log::debug!("discarding page from a previous context");
            return false;
        }
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        true
    }

    /// Forget the outstanding request and cooldown after a context change.
    pub fn reset_context(&mut self) {
        self.guard.invalidate();
        self.in_flight = None;
        self.last_fetch_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(raw_total: usize) -> ScanInputs {
        ScanInputs {
            raw_total,
            row_count: raw_total,
            last_visible: Some(raw_total.saturating_sub(1)),
            filtering: false,
            has_more: true,
            is_advanced: false,
            now_ms: 1_000.0,
        }
    }

    #[test]
    fn test_cap_boundary() {
        let scan = AutoScanController::default();
        assert_eq!(scan.decide(&inputs(999)), ScanDecision::Fetch);
        assert_eq!(scan.decide(&inputs(1_000)), ScanDecision::LoadMore);
        let advanced = ScanInputs {
            is_advanced: true,
            ..inputs(1_000)
        };
        assert_eq!(scan.decide(&advanced), ScanDecision::Fetch);
    }

    #[test]
    fn test_no_more_pages_is_idle() {
        let scan = AutoScanController::default();
        let done = ScanInputs {
            has_more: false,
            ..inputs(5_000)
        };
        assert_eq!(scan.decide(&done), ScanDecision::Idle);
    }

    #[test]
    fn test_far_from_end_waits_unless_filtering() {
        let scan = AutoScanController::default();
        let scrolled_top = ScanInputs {
            last_visible: Some(10),
            ..inputs(500)
        };
        assert_eq!(scan.decide(&scrolled_top), ScanDecision::Idle);
        let filtered = ScanInputs {
            filtering: true,
            ..scrolled_top
        };
        assert_eq!(scan.decide(&filtered), ScanDecision::Fetch);
    }

    #[test]
    fn test_single_request_in_flight_and_cooldown() {
        let mut scan = AutoScanController::default();
        let (decision, ticket) = scan.poll(&inputs(100));
        assert_eq!(decision, ScanDecision::Fetch);
        let ticket = ticket.unwrap();
        assert_eq!(scan.decide(&inputs(100)), ScanDecision::Idle);

        assert!(scan.finish(ticket));
        assert!(!scan.is_in_flight());
        let too_soon = ScanInputs {
            now_ms: 1_100.0,
            ..inputs(200)
        };
        assert_eq!(scan.decide(&too_soon), ScanDecision::Idle);
        let later = ScanInputs {
            now_ms: 1_200.0,
            ..inputs(200)
        };
        assert_eq!(scan.decide(&later), ScanDecision::Fetch);
    }

    #[test]
    fn test_context_reset_discards_stale_page() {
        let mut scan = AutoScanController::default();
        let ticket = scan.begin_fetch(0.0);
        scan.reset_context();
        assert!(!scan.is_in_flight());
        assert!(!scan.finish(ticket));
    }

    #[test]
    fn test_load_more_ignores_cap() {
        let mut scan = AutoScanController::default();
        assert!(scan.load_more(true, 0.0).is_some());
        assert!(scan.load_more(true, 0.0).is_none());
        let mut idle = AutoScanController::default();
        assert!(idle.load_more(false, 0.0).is_none());
    }

    #[test]
    fn test_scroll_reset_on_any_trigger() {
        let ctx = BrowseContext::new("p", "b", "docs/");
        let mut tracker = ScrollResetTracker::default();
        let filter = FilterState::default();
        assert!(tracker.observe(ViewResetKey::new(&ctx, "", &filter)));
        assert!(!tracker.observe(ViewResetKey::new(&ctx, "  ", &filter)));
        assert!(tracker.observe(ViewResetKey::new(&ctx, "report", &filter)));

        let sorted = FilterState {
            favorites_first: true,
            ..Default::default()
        };
        assert!(tracker.observe(ViewResetKey::new(&ctx, "report", &sorted)));
        let other = BrowseContext::new("p", "b", "img/");
        assert!(tracker.observe(ViewResetKey::new(&other, "report", &sorted)));
    }

    #[test]
    fn test_request_guard() {
        let mut guard = RequestGuard::new();
        let first = guard.issue();
        assert!(guard.is_current(first));
        guard.invalidate();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(guard.issue()));
    }
}
