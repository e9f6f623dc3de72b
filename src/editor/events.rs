use std::fmt;

use async_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use super::{Mode, PointRole};

/// Published after every mutation so views can redraw without polling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum EditorEvent {
    Loaded { len: usize },
    PointSet { role: PointRole, index: usize },
    PointRelabeled { index: usize },
    PointRemoved { index: usize },
    LabelsChanged,
    ModeChanged { mode: Mode },
}

#[derive(Clone, Default)]
pub struct Observers {
    senders: Vec<Sender<EditorEvent>>,
}

impl Observers {
    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        let (tx, rx) = async_channel::unbounded();
        self.senders.push(tx);
        rx
    }

    pub fn publish(&mut self, event: EditorEvent) {
        // unbounded, so the only failure is a dropped receiver
        self.senders
            .retain(|tx| tx.try_send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.senders.len())
            .finish()
    }
}

/// Drains everything published so far without waiting.
pub fn drain(rx: &Receiver<EditorEvent>) -> Vec<EditorEvent> {
    let mut events = vec![];
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
