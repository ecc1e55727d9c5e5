use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::input::TrackSource;
use crate::store::TrackStore;

/// Fetches a track on the async runtime and hands it to the UI thread.
///
/// The UI polls once per frame and never blocks. Starting a new load drops
/// the previous one's result.
#[derive(Default)]
pub struct TrackLoader {
    receiver: Option<Receiver<TrackStore>>,
    source: Option<String>,
}

impl TrackLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading from `source` in the background
    pub fn start(&mut self, runtime: &Handle, source: Arc<dyn TrackSource>) {
        let description = source.describe();
        info!("Loading track from {}", description);

        let (tx, rx) = channel();
        self.receiver = Some(rx);
        self.source = Some(description);

        runtime.spawn(async move {
            let store = TrackStore::load(source.as_ref()).await;
            // The receiver is gone when a newer load replaced this one
            let _ = tx.send(store);
        });
    }

    pub fn is_loading(&self) -> bool {
        self.receiver.is_some()
    }

    /// Description of the source being loaded
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Non-blocking check for a finished load
    pub fn poll(&mut self) -> Option<TrackStore> {
        let receiver = self.receiver.as_ref()?;

        match receiver.try_recv() {
            Ok(store) => {
                self.receiver = None;
                self.source = None;
                Some(store)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Track loader task ended without a result");
                self.receiver = None;
                self.source = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{bundled_sample, StaticSource};
    use std::time::Duration;

    async fn wait_for(loader: &mut TrackLoader) -> TrackStore {
        for _ in 0..500 {
            if let Some(store) = loader.poll() {
                return store;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("track load did not finish");
    }

    #[tokio::test]
    async fn test_background_load() {
        let mut loader = TrackLoader::new();
        assert!(!loader.is_loading());
        assert!(loader.poll().is_none());

        let source = Arc::new(StaticSource::new("bundled sample", bundled_sample().unwrap()));
        loader.start(&Handle::current(), source);
        assert!(loader.is_loading());
        assert_eq!(loader.source(), Some("bundled sample"));

        let store = wait_for(&mut loader).await;
        assert_eq!(store.len(), 28);
        assert!(!loader.is_loading());
        assert!(loader.poll().is_none());
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_load() {
        let mut loader = TrackLoader::new();
        let first = Arc::new(StaticSource::new("first", bundled_sample().unwrap()));
        let second = Arc::new(StaticSource::new("second", Default::default()));

        loader.start(&Handle::current(), first);
        loader.start(&Handle::current(), second);

        let store = wait_for(&mut loader).await;
        assert!(store.is_empty());
        assert_eq!(loader.source(), None);
    }
}
