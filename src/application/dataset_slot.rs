// Dataset slot - one independently loaded and filtered dataset
use crate::domain::dashboard::SlotSnapshot;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::fmt::Debug;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What to do with a result that arrives after a newer request for the same
/// slot has already been issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Only the latest issued request may update the slot.
    #[default]
    Discard,
    /// Every settled request updates the slot; the last to resolve wins.
    Apply,
}

type Fetcher<S, T> = Arc<dyn Fn(S) -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

pub struct DatasetSlot<S, T> {
    inner: Arc<SlotInner<S, T>>,
}

impl<S, T> Clone for DatasetSlot<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct SlotInner<S, T> {
    name: &'static str,
    fetcher: Fetcher<S, T>,
    policy: StalePolicy,
    /// Sequence number of the most recently issued request
    issued: AtomicU64,
    state: watch::Sender<SlotSnapshot<S, T>>,
    /// Shared change counter, bumped on every mutation of any slot
    revision: Arc<watch::Sender<u64>>,
}

impl<S, T> DatasetSlot<S, T>
where
    S: Clone + PartialEq + Debug + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new<F, Fut>(
        name: &'static str,
        selector: S,
        policy: StalePolicy,
        revision: Arc<watch::Sender<u64>>,
        fetch: F,
    ) -> Self
    where
        F: Fn(S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let (state, _) = watch::channel(SlotSnapshot {
            data: None,
            loading: false,
            selector,
        });

        Self {
            inner: Arc::new(SlotInner {
                name,
                fetcher: Arc::new(move |s| fetch(s).boxed()),
                policy,
                issued: AtomicU64::new(0),
                state,
                revision,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn snapshot(&self) -> SlotSnapshot<S, T> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SlotSnapshot<S, T>> {
        self.inner.state.subscribe()
    }

    pub fn selector(&self) -> S {
        self.inner.state.borrow().selector.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn data(&self) -> Option<Arc<T>> {
        self.inner.state.borrow().data.clone()
    }

    /// Load the slot for `selector`, or the stored selector when `None`.
    ///
    /// The request runs on its own task, so dropping the handle neither
    /// cancels it nor leaves `loading` raised.
    pub fn load(&self, selector: Option<S>) -> JoinHandle<()> {
        tokio::spawn(self.begin_load(selector))
    }

    /// Issue a request and hand back the future that settles it.
    ///
    /// `loading` is raised and the collaborator is invoked before this
    /// returns. Failures and panics inside the collaborator are logged and
    /// never escape.
    #[must_use = "the request only settles when the returned future is driven to completion"]
    pub fn begin_load(&self, selector: Option<S>) -> BoxFuture<'static, ()> {
        let selector = selector.unwrap_or_else(|| self.selector());
        let seq = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.update(|state| state.loading = true);

        tracing::debug!(slot = self.inner.name, seq, selector = ?selector, "Loading dataset");

        let inner = self.inner.clone();
        let started = std::panic::catch_unwind(AssertUnwindSafe(|| (inner.fetcher)(selector.clone())));

        async move {
            let outcome = match started {
                Ok(fetch) => match AssertUnwindSafe(fetch).catch_unwind().await {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("{} fetch panicked", inner.name)),
                },
                Err(_) => Err(anyhow::anyhow!("{} fetch panicked before starting", inner.name)),
            };
            inner.settle(seq, &selector, outcome);
        }
        .boxed()
    }

    /// Store a new selector and reload the slot with it. Setting the value
    /// already stored is not a change and triggers nothing.
    pub fn set_selector(&self, selector: S) -> Option<JoinHandle<()>> {
        let changed = self.inner.state.send_if_modified(|state| {
            if state.selector == selector {
                false
            } else {
                state.selector = selector.clone();
                true
            }
        });

        if !changed {
            return None;
        }

        self.inner.revision.send_modify(|r| *r += 1);
        tracing::info!(slot = self.inner.name, selector = ?selector, "Selector changed");

        Some(self.load(Some(selector)))
    }
}

impl<S: Debug, T> SlotInner<S, T> {
    fn update(&self, modify: impl FnOnce(&mut SlotSnapshot<S, T>)) {
        self.state.send_modify(modify);
        self.revision.send_modify(|r| *r += 1);
    }

    fn settle(&self, seq: u64, selector: &S, outcome: anyhow::Result<T>) {
        if let Err(e) = &outcome {
            tracing::error!(slot = self.name, selector = ?selector, "Error loading {} data: {:#}", self.name, e);
        }

        let latest = self.issued.load(Ordering::SeqCst);
        if seq != latest && self.policy == StalePolicy::Discard {
            tracing::debug!(
                slot = self.name,
                seq,
                latest,
                "Discarding stale result for {:?}",
                selector
            );
            return;
        }

        match outcome {
            Ok(data) => {
                let data = Arc::new(data);
                self.update(|state| {
                    state.data = Some(data);
                    state.loading = false;
                });
            }
            Err(_) => self.update(|state| state.loading = false),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Records every fetch and holds it open until the test releases it.
    /// Selectors without a registered gate resolve immediately.
    #[derive(Default)]
    pub struct Gates {
        pending: Mutex<HashMap<String, VecDeque<oneshot::Receiver<Result<String, String>>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl Gates {
        pub fn gate(&self, selector: &str) -> oneshot::Sender<Result<String, String>> {
            let (tx, rx) = oneshot::channel();
            self.pending
                .lock()
                .unwrap()
                .entry(selector.to_string())
                .or_default()
                .push_back(rx);
            tx
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn fetch(
            &self,
            selector: &str,
        ) -> impl std::future::Future<Output = anyhow::Result<String>> + Send + use<> {
            self.calls.lock().unwrap().push(selector.to_string());
            let gate = self
                .pending
                .lock()
                .unwrap()
                .get_mut(selector)
                .and_then(|queue| queue.pop_front());
            let immediate = format!("{}-data", selector);

            async move {
                match gate {
                    None => Ok(immediate),
                    Some(rx) => match rx.await {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(message)) => Err(anyhow::anyhow!(message)),
                        Err(_) => Err(anyhow::anyhow!("gate dropped")),
                    },
                }
            }
        }
    }
}
