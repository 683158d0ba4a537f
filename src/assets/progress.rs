//! Load lifecycle notifications.
//!
//! Purely observational: nothing in the crate branches on these events.

/// Lifecycle signal emitted by [`AssetLoader`](crate::assets::AssetLoader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// The first request of a batch started (outstanding went from 0 to 1).
    BatchStarted,
    /// Every outstanding request of the batch has settled.
    BatchCompleted { loaded: usize, failed: usize },
    /// A request failed; nothing was inserted for it.
    Error { url: String, message: String },
}

/// Multi-producer channel carrying [`LoadEvent`]s, mirrored to the log.
#[derive(Debug, Clone)]
pub struct ProgressChannel {
    tx: flume::Sender<LoadEvent>,
    rx: flume::Receiver<LoadEvent>,
}

impl Default for ProgressChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressChannel {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    pub(crate) fn emit(&self, event: LoadEvent) {
        match &event {
            LoadEvent::BatchStarted => log::info!("Asset loading started"),
            LoadEvent::BatchCompleted { loaded, failed } => {
                log::info!("Asset loading complete ({loaded} loaded, {failed} failed)");
            }
            LoadEvent::Error { url, message } => log::error!("Error loading '{url}': {message}"),
        }
        // The channel owns a receiver, so sending cannot fail
        let _ = self.tx.send(event);
    }

    /// Receiver end, for observers that want to block or select on events.
    #[must_use]
    pub fn receiver(&self) -> flume::Receiver<LoadEvent> {
        self.rx.clone()
    }

    /// Takes every event emitted so far.
    #[must_use]
    pub fn drain(&self) -> Vec<LoadEvent> {
        self.rx.try_iter().collect()
    }
}
