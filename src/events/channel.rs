//! Event channel implementation using crossbeam-channel.
//!
//! Lets the single-threaded workflow hand progress to a UI thread.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the workflow.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event without blocking.
    ///
    /// If the receiver is dropped, the event is silently discarded.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events on the UI side.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Returns an iterator over received events
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for connected sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose receiver is already gone; every event is dropped.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ArchiveEvent, WorkflowEvent};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Archive(ArchiveEvent::Moved {
                from: PathBuf::from("/images/robin.jpg"),
                to: PathBuf::from("/used/robin.jpg"),
            }));
        });

        handle.join().unwrap();

        let events: Vec<Event> = receiver.iter().collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Archive(ArchiveEvent::Moved { to, .. }) => {
                assert!(to.ends_with("robin.jpg"));
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Workflow(WorkflowEvent::Started));
    }

    #[test]
    fn iter_ends_once_sender_is_dropped() {
        let (sender, receiver) = EventChannel::new();
        sender.send(Event::Workflow(WorkflowEvent::Started));
        sender.send(Event::Workflow(WorkflowEvent::Started));
        drop(sender);

        assert_eq!(receiver.iter().count(), 2);
    }
}
