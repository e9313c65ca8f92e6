//! Debounce primitive.
//!
//! [`debounce`] wraps an async callback so that a burst of calls collapses
//! into one invocation carrying the last value, fired once `delay` has passed
//! without a new call. A new call resets the timer. Once the timer fires the
//! callback runs in its own task and is no longer cancellable, so an in-flight
//! action always completes.
//!
//! Dropping a [`Debounced`] does not cancel a pending call: the timer keeps
//! running and fires as scheduled. Use [`Debounced::flush`] to fire it now,
//! or [`Debounced::cancel`] to discard it.
//!
//! Calls must be made from within a tokio runtime.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::task::JoinHandle;

type Callback<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// A debounced callback. See [`debounce`].
pub struct Debounced<T> {
    delay: Duration,
    callback: Callback<T>,
    /// Value waiting for the quiet period. The timer task takes it when it fires.
    value: Arc<Mutex<Option<T>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Wrap `callback` so that it only runs after `delay` of quiet.
pub fn debounce<T, F, Fut>(callback: F, delay: Duration) -> Debounced<T>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Debounced {
        delay,
        callback: Arc::new(move |value| callback(value).boxed()),
        value: Arc::new(Mutex::new(None)),
        timer: Mutex::new(None),
    }
}

impl<T: Send + 'static> Debounced<T> {
    /// Schedule the callback with `value`, replacing any pending call.
    pub fn call(&self, value: T) {
        let callback = Arc::clone(&self.callback);
        let slot = Arc::clone(&self.value);
        let delay = self.delay;
        let mut timer = lock(&self.timer);
        if let Some(pending) = timer.take() {
            pending.abort();
        }
        *lock(&self.value) = Some(value);
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(value) = lock(&slot).take() {
                tokio::spawn(callback(value));
            }
        }));
    }

    /// Run the pending call now, if any, and wait for it to finish.
    pub async fn flush(&self) {
        if let Some(pending) = lock(&self.timer).take() {
            pending.abort();
        }
        let value = lock(&self.value).take();
        if let Some(value) = value {
            (self.callback)(value).await;
        }
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Some(pending) = lock(&self.timer).take() {
            pending.abort();
        }
        lock(&self.value).take();
    }

    /// True while a call is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        lock(&self.value).is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

fn lock<V>(slot: &Mutex<V>) -> MutexGuard<'_, V> {
    // A poisoned slot still holds a valid value.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn recorder() -> (Arc<StdMutex<Vec<u32>>>, Debounced<u32>) {
        let calls = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let debounced = debounce(
            move |value| {
                let sink = Arc::clone(&sink);
                async move { sink.lock().unwrap().push(value) }
            },
            Duration::from_millis(100),
        );
        (calls, debounced)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (calls, debounced) = recorder();

        for value in 1..=5 {
            debounced.call(value);
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        assert!(calls.lock().unwrap().is_empty());
        assert!(debounced.is_pending());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(*calls.lock().unwrap(), vec![5]);
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_fire_separately() {
        let (calls, debounced) = recorder();

        debounced.call(1);
        tokio::time::sleep(Duration::from_millis(200)).await;
        debounced.call(2);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let (calls, debounced) = recorder();

        debounced.call(7);
        debounced.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(calls.lock().unwrap().is_empty());
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_runs_pending_call_now() {
        let (calls, debounced) = recorder();

        debounced.call(3);
        debounced.call(4);
        debounced.flush().await;
        assert_eq!(*calls.lock().unwrap(), vec![4]);
        assert!(!debounced.is_pending());

        // The aborted timer does not fire a second time.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(*calls.lock().unwrap(), vec![4]);

        debounced.flush().await;
        assert_eq!(*calls.lock().unwrap(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_call_survives_drop() {
        let (calls, debounced) = recorder();

        debounced.call(9);
        drop(debounced);
        assert!(calls.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(*calls.lock().unwrap(), vec![9]);
    }
}
