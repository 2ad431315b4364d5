use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Default)]
struct Slot {
    text: Option<String>,
    // Bumped on every set/clear; a pending expiry only fires if its
    // generation still matches, so superseding a message invalidates the
    // previous timer.
    generation: u64,
}

#[derive(Debug)]
struct Slots {
    success: Slot,
    error: Slot,
}

/// Holds at most one success and one error string for user feedback,
/// each auto-clearing after a fixed duration unless superseded first.
/// Cloning shares the store; dropping all consumers while a timer is
/// pending is harmless (the timer holds its own reference and fades out).
#[derive(Clone)]
pub struct MessageStore {
    inner: Arc<Mutex<Slots>>,
    ttl: Duration,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_TTL)
    }
}

impl MessageStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slots {
                success: Slot::default(),
                error: Slot::default(),
            })),
            ttl,
        }
    }

    pub fn set_success(&self, text: impl Into<String>) {
        self.set(MessageKind::Success, text.into(), Some(self.ttl));
    }

    pub fn set_error(&self, text: impl Into<String>) {
        self.set(MessageKind::Error, text.into(), Some(self.ttl));
    }

    /// An error that stays until acted on, for a form that must keep
    /// showing its failure while it remains open.
    pub fn set_error_sticky(&self, text: impl Into<String>) {
        self.set(MessageKind::Error, text.into(), None);
    }

    fn set(&self, kind: MessageKind, text: String, expiry: Option<Duration>) {
        let generation = {
            let mut slots = self.inner.lock().unwrap();
            let slot = slots.slot_mut(kind);
            slot.generation += 1;
            slot.text = Some(text);
            slot.generation
        };
        if let Some(ttl) = expiry {
            let inner = self.inner.clone();
            tokio::spawn(async move {
                tokio::time::sleep(ttl).await;
                let mut slots = inner.lock().unwrap();
                let slot = slots.slot_mut(kind);
                if slot.generation == generation {
                    slot.text = None;
                }
            });
        }
    }

    /// Idempotent; safe to call at any time, including after expiry.
    pub fn clear(&self, kind: MessageKind) {
        let mut slots = self.inner.lock().unwrap();
        let slot = slots.slot_mut(kind);
        slot.generation += 1;
        slot.text = None;
    }

    pub fn get(&self, kind: MessageKind) -> Option<String> {
        let slots = self.inner.lock().unwrap();
        match kind {
            MessageKind::Success => slots.success.text.clone(),
            MessageKind::Error => slots.error.text.clone(),
        }
    }

    pub fn success(&self) -> Option<String> {
        self.get(MessageKind::Success)
    }

    pub fn error(&self) -> Option<String> {
        self.get(MessageKind::Error)
    }
}

impl Slots {
    fn slot_mut(&mut self, kind: MessageKind) -> &mut Slot {
        match kind {
            MessageKind::Success => &mut self.success,
            MessageKind::Error => &mut self.error,
        }
    }
}
