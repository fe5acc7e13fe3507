//! Key update observers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::issuer::KeyArgs;

/// Receives the outcome of every update cycle.
///
/// Exactly one of the two methods is called per cycle. Callbacks run on the
/// task driving the manager and should not block.
pub trait KeyListener<K>: Send + Sync {
    /// A new key was fetched, validated and stored.
    fn on_update(&self, key: &Arc<K>, context: Option<&str>, args: Option<&KeyArgs>);

    /// The cycle failed and the stored key was cleared.
    fn on_error(&self, code: u16, message: &str);
}

impl<K, L: KeyListener<K> + ?Sized> KeyListener<K> for Arc<L> {
    fn on_update(&self, key: &Arc<K>, context: Option<&str>, args: Option<&KeyArgs>) {
        (**self).on_update(key, context, args)
    }

    fn on_error(&self, code: u16, message: &str) {
        (**self).on_error(code, message)
    }
}

/// Owned form of a listener callback.
#[derive(Debug)]
pub enum KeyEvent<K> {
    Updated {
        key: Arc<K>,
        context: Option<String>,
        args: Option<KeyArgs>,
    },
    Failed {
        code: u16,
        message: String,
    },
}

impl<K> KeyEvent<K> {
    pub fn is_update(&self) -> bool {
        matches!(self, KeyEvent::Updated { .. })
    }
}

/// Forwards listener callbacks into an unbounded channel.
pub struct ChannelListener<K> {
    tx: mpsc::UnboundedSender<KeyEvent<K>>,
}

impl<K> ChannelListener<K> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<KeyEvent<K>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: KeyEvent<K>) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Key event receiver dropped; event discarded");
        }
    }
}

impl<K: Send + Sync> KeyListener<K> for ChannelListener<K> {
    fn on_update(&self, key: &Arc<K>, context: Option<&str>, args: Option<&KeyArgs>) {
        self.send(KeyEvent::Updated {
            key: Arc::clone(key),
            context: context.map(str::to_string),
            args: args.cloned(),
        });
    }

    fn on_error(&self, code: u16, message: &str) {
        self.send(KeyEvent::Failed {
            code,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_channel_listener_forwards_events() {
        let (listener, mut rx) = ChannelListener::<String>::new();

        let mut args = KeyArgs::new();
        args.insert("key".into(), Value::from("value"));
        listener.on_update(&Arc::new("ephkey_1".to_string()), Some("action"), Some(&args));
        listener.on_error(404, "not found");

        match rx.recv().await.unwrap() {
            KeyEvent::Updated { key, context, args } => {
                assert_eq!(*key, "ephkey_1");
                assert_eq!(context.as_deref(), Some("action"));
                assert_eq!(args.unwrap().get("key"), Some(&Value::from("value")));
            }
            other => panic!("Expected update, got {other:?}"),
        }

        let event = rx.recv().await.unwrap();
        assert!(!event.is_update());
        assert!(matches!(event, KeyEvent::Failed { code: 404, .. }));
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (listener, rx) = ChannelListener::<String>::new();
        drop(rx);
        listener.on_error(500, "ignored");
    }
}
