//! UI state publisher.
//!
//! Exposes the navigation position to the view layer (dot indicators,
//! arrows) without granting it navigation authority; writes go back through
//! [`crate::SectionController::request_jump`].

use serde::Serialize;
use tokio::sync::watch;

/// What the view layer needs to draw navigation affordances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavSnapshot {
    pub current_index: usize,
    pub section_count: usize,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub is_animating: bool,
    pub current_identifier: Option<String>,
}

impl NavSnapshot {
    pub fn new(
        current_index: usize,
        section_count: usize,
        is_animating: bool,
        current_identifier: Option<String>,
    ) -> Self {
        Self {
            current_index,
            section_count,
            can_advance: current_index + 1 < section_count,
            can_retreat: current_index > 0 && section_count > 0,
            is_animating,
            current_identifier,
        }
    }
}

/// Watch-channel backed publisher; receivers only wake on real changes
#[derive(Debug)]
pub struct StatePublisher {
    tx: watch::Sender<NavSnapshot>,
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new(NavSnapshot::default())
    }
}

impl StatePublisher {
    pub fn new(initial: NavSnapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Publish `snapshot`; returns whether anything changed
    pub fn publish(&self, snapshot: NavSnapshot) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        })
    }

    /// Latest published snapshot
    pub fn current(&self) -> NavSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NavSnapshot> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_flags() {
        let first = NavSnapshot::new(0, 4, false, None);
        assert!(first.can_advance);
        assert!(!first.can_retreat);

        let last = NavSnapshot::new(3, 4, false, None);
        assert!(!last.can_advance);
        assert!(last.can_retreat);

        let empty = NavSnapshot::new(0, 0, false, None);
        assert!(!empty.can_advance);
        assert!(!empty.can_retreat);
    }

    #[test]
    fn test_publish_only_reports_changes() {
        let publisher = StatePublisher::default();
        let snapshot = NavSnapshot::new(1, 3, false, Some("work".into()));
        assert!(publisher.publish(snapshot.clone()));
        assert!(!publisher.publish(snapshot));
        assert_eq!(publisher.current().current_index, 1);
    }

    #[tokio::test]
    async fn test_receiver_wakes_on_change() {
        let publisher = StatePublisher::default();
        let mut rx = publisher.subscribe();

        publisher.publish(NavSnapshot::new(2, 3, true, None));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().current_index, 2);

        publisher.publish(NavSnapshot::new(2, 3, true, None));
        assert!(!rx.has_changed().unwrap());
    }
}
