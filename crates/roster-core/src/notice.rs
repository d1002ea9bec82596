// ── Transient notices ──
//
// A notice is a message slot that empties itself a fixed time after it was
// filled. Expiry is derived from the stamp on read, so no timer task is
// needed; `tick()` only reclaims the slot. Time comes from tokio's clock so
// paused-time tests can drive it.

use std::time::Duration;

use tokio::time::Instant;

/// How long a success or error message stays visible.
pub const NOTICE_TTL: Duration = Duration::from_millis(1500);

/// A single self-clearing message slot.
#[derive(Debug, Clone, Default)]
pub struct Notice {
    slot: Option<(String, Instant)>,
}

impl Notice {
    /// Show `message`, superseding whatever was showing.
    pub fn show(&mut self, message: impl Into<String>) {
        self.slot = Some((message.into(), Instant::now()));
    }

    /// The message, if one was shown less than [`NOTICE_TTL`] ago.
    pub fn current(&self) -> Option<&str> {
        self.slot
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < NOTICE_TTL)
            .map(|(message, _)| message.as_str())
    }

    /// The most recent message even if it has expired. Only `tick` and
    /// `clear` drop it.
    pub fn last(&self) -> Option<&str> {
        self.slot.as_ref().map(|(message, _)| message.as_str())
    }

    pub fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Drop an expired message. Returns `true` if the slot changed.
    pub fn tick(&mut self) -> bool {
        if self.slot.is_some() && !self.is_visible() {
            self.slot = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Per-screen request lifecycle: loading flag plus transient banners.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub loading: bool,
    pub error: Notice,
    pub success: Notice,
}

impl ViewState {
    /// Mark a request as outstanding.
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Finish a request with a visible error.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error.show(message);
    }

    /// Finish a request with a visible success message.
    pub fn succeed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.success.show(message);
    }

    /// Finish a request quietly, dropping any stale error.
    pub fn settle(&mut self) {
        self.loading = false;
        self.error.clear();
    }

    /// Expire both banners. Returns `true` if anything changed.
    pub fn tick(&mut self) -> bool {
        let error = self.error.tick();
        let success = self.success.tick();
        error || success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn notice_self_clears_after_ttl() {
        let mut notice = Notice::default();
        notice.show("Student deleted successfully!");
        assert_eq!(notice.current(), Some("Student deleted successfully!"));

        tokio::time::advance(Duration::from_millis(1499)).await;
        assert!(notice.is_visible());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(notice.current(), None);
        assert_eq!(notice.last(), Some("Student deleted successfully!"));
        assert!(notice.tick());
        assert_eq!(notice.last(), None);
        assert!(!notice.tick());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_supersedes_and_restarts_clock() {
        let mut notice = Notice::default();
        notice.show("first");
        tokio::time::advance(Duration::from_millis(1000)).await;
        notice.show("second");
        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(notice.current(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn view_state_transitions() {
        let mut state = ViewState::default();
        state.begin();
        assert!(state.loading);

        state.fail("Error fetching students");
        assert!(!state.loading);
        assert_eq!(state.error.current(), Some("Error fetching students"));

        state.begin();
        state.settle();
        assert_eq!(state.error.current(), None);

        state.succeed("done");
        tokio::time::advance(NOTICE_TTL).await;
        assert!(state.tick());
        assert_eq!(state.success.current(), None);
    }
}
