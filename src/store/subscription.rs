use futures::Stream;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::{ListenerCallback, Properties, listeners::ListenerRegistry};

/// A channel-backed listener that unregisters itself when dropped.
///
/// Each successful write touching a watched key delivers one batch of
/// changes, keyed by the unprefixed key names. The channel closes once the
/// underlying listener is removed, e.g. by `dispose`.
pub struct Subscription {
    prefix: String,
    keys: Vec<String>,
    callback_id: usize,
    registry: ListenerRegistry,
    receiver: UnboundedReceiver<Properties>,
}

impl Subscription {
    pub(super) fn register<S: AsRef<str>>(
        registry: &ListenerRegistry,
        prefix: &str,
        keys: &[S],
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let callback = ListenerCallback::new(move |changes| {
            let _ = tx.send(changes.clone());
        });
        let callback_id = callback.id();
        registry.add(prefix, keys, callback);

        Self {
            prefix: prefix.to_string(),
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            callback_id,
            registry: registry.clone(),
            receiver: rx,
        }
    }

    /// Waits for the next batch of changes.
    ///
    /// Returns `None` once the listener has been removed from the store.
    pub async fn recv(&mut self) -> Option<Properties> {
        self.receiver.recv().await
    }

    /// Get a mutable reference to the receiver for changes.
    pub fn receiver_mut(&mut self) -> &mut UnboundedReceiver<Properties> {
        &mut self.receiver
    }

    /// Converts the subscription into a stream of change batches.
    ///
    /// The listener stays registered until the stream is dropped.
    pub fn into_stream(self) -> impl Stream<Item = Properties> {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription
                .recv()
                .await
                .map(|changes| (changes, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self
            .registry
            .remove_exact(&self.prefix, &self.keys, self.callback_id);
    }
}
