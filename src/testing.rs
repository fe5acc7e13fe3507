//! Test doubles for the issuer and listener ports.

#[cfg(test)]
pub mod helpers {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::issuer::{IssueResult, IssuerError, KeyArgs, KeyIssuer};
    use crate::listener::KeyListener;

    /// Issuer answering from a queue of scripted results.
    ///
    /// A `None` entry never answers.
    #[derive(Default)]
    pub struct ScriptedIssuer {
        responses: Mutex<VecDeque<Option<IssueResult>>>,
        calls: Mutex<Vec<(Option<String>, Option<KeyArgs>)>>,
    }

    impl ScriptedIssuer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_raw(&self, raw: &str) {
            self.push_payload(Some(raw.to_string()));
        }

        pub fn push_payload(&self, raw: Option<String>) {
            self.responses.lock().unwrap().push_back(Some(Ok(raw)));
        }

        pub fn push_error(&self, code: u16, message: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Some(Err(IssuerError::new(code, message))));
        }

        /// Queue a call that stays pending until its future is dropped.
        pub fn push_stall(&self) {
            self.responses.lock().unwrap().push_back(None);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<(Option<String>, Option<KeyArgs>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl KeyIssuer for ScriptedIssuer {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn create_key(&self, context: Option<&str>, args: Option<&KeyArgs>) -> IssueResult {
            self.calls
                .lock()
                .unwrap()
                .push((context.map(str::to_string), args.cloned()));
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(Some(result)) => result,
                Some(None) => std::future::pending().await,
                None => Err(IssuerError::new(500, "no scripted response")),
            }
        }
    }

    type Update<K> = (Arc<K>, Option<String>, Option<KeyArgs>);

    /// Listener recording every callback.
    pub struct RecordingListener<K> {
        updates: Mutex<Vec<Update<K>>>,
        errors: Mutex<Vec<(u16, String)>>,
    }

    impl<K> RecordingListener<K> {
        pub fn new() -> Self {
            Self {
                updates: Mutex::new(Vec::new()),
                errors: Mutex::new(Vec::new()),
            }
        }

        pub fn updates(&self) -> Vec<Update<K>> {
            self.updates.lock().unwrap().clone()
        }

        pub fn errors(&self) -> Vec<(u16, String)> {
            self.errors.lock().unwrap().clone()
        }

        pub fn update_count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }

        pub fn error_count(&self) -> usize {
            self.errors.lock().unwrap().len()
        }

        pub fn total(&self) -> usize {
            self.update_count() + self.error_count()
        }
    }

    impl<K> Default for RecordingListener<K> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<K: Send + Sync> KeyListener<K> for RecordingListener<K> {
        fn on_update(&self, key: &Arc<K>, context: Option<&str>, args: Option<&KeyArgs>) {
            self.updates.lock().unwrap().push((
                Arc::clone(key),
                context.map(str::to_string),
                args.cloned(),
            ));
        }

        fn on_error(&self, code: u16, message: &str) {
            self.errors.lock().unwrap().push((code, message.to_string()));
        }
    }
}
