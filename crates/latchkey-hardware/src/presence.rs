//! One read per presentation.
//!
//! A reader polled in a loop sees a resting tag on every poll. Real readers
//! halt a tag after reading it so it stays silent until it leaves the field;
//! [`PresenceTracker`] gives the same behaviour to readers that only report
//! "what is in the field right now".

use latchkey_core::Uid;

/// Filters a stream of field observations down to new presentations.
///
/// # Examples
///
/// ```
/// use latchkey_core::Uid;
/// use latchkey_hardware::PresenceTracker;
///
/// let tag: Uid = "AA:BB:CC:DD".parse().unwrap();
/// let mut tracker = PresenceTracker::new();
///
/// assert_eq!(tracker.observe(Some(tag)), Some(tag));
/// assert_eq!(tracker.observe(Some(tag)), None); // still resting on the reader
/// assert_eq!(tracker.observe(None), None); // removed
/// assert_eq!(tracker.observe(Some(tag)), Some(tag)); // presented again
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceTracker {
    in_field: Option<Uid>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record what the reader currently sees.
    ///
    /// Returns the UID only when it was not already in the field. Swapping
    /// one tag for another without an empty poll in between counts as a new
    /// presentation.
    pub fn observe(&mut self, seen: Option<Uid>) -> Option<Uid> {
        let previous = std::mem::replace(&mut self.in_field, seen);
        match seen {
            Some(uid) if previous.as_ref() != Some(&uid) => Some(uid),
            _ => None,
        }
    }

    /// The tag currently in the field, if any.
    pub fn in_field(&self) -> Option<&Uid> {
        self.in_field.as_ref()
    }

    /// Forget the tag in the field.
    pub fn clear(&mut self) {
        self.in_field = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(text: &str) -> Uid {
        text.parse().unwrap()
    }

    #[test]
    fn test_resting_tag_reported_once() {
        let mut tracker = PresenceTracker::new();
        let tag = uid("01:02:03:04");

        let reads: Vec<_> = (0..5).filter_map(|_| tracker.observe(Some(tag))).collect();

        assert_eq!(reads, vec![tag]);
        assert_eq!(tracker.in_field(), Some(&tag));
    }

    #[test]
    fn test_swap_without_gap_is_new_presentation() {
        let mut tracker = PresenceTracker::new();

        assert!(tracker.observe(Some(uid("01:02:03:04"))).is_some());
        assert_eq!(
            tracker.observe(Some(uid("05:06:07:08"))),
            Some(uid("05:06:07:08"))
        );
    }

    #[test]
    fn test_clear_allows_reread() {
        let mut tracker = PresenceTracker::new();
        let tag = uid("01:02:03:04");

        tracker.observe(Some(tag));
        tracker.clear();

        assert_eq!(tracker.in_field(), None);
        assert_eq!(tracker.observe(Some(tag)), Some(tag));
    }
}
