//! Bounded-concurrency task runner with order-stable result collection
//!
//! Results are written into slots addressed by each item's original index,
//! so output order always equals input order regardless of completion
//! order. Callers that need partial-failure tolerance fold it into the
//! operation's return type; a slot is `None` only when the task itself
//! terminated abnormally.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Run `op` over every item with at most `max_concurrency` operations in
/// flight. Waits for all scheduled work to settle before returning.
pub async fn process_in_parallel<T, R, F, Fut>(
    items: Vec<T>,
    max_concurrency: usize,
    op: F,
) -> Vec<Option<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    let mut slots: Vec<Option<R>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let op = Arc::new(op);
    let mut set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let op = Arc::clone(&op);
        set.spawn(async move {
            // The semaphore is never closed, so acquisition cannot fail.
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            (index, op(item).await)
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(error) => warn!(%error, "task terminated abnormally"),
        }
    }

    slots
}

/// Fixed-size wavefront variant: runs `batch_size` items, waits for the
/// whole wave to finish, then starts the next. Simpler than continuous
/// refill, for workloads where stragglers are rare.
pub async fn process_in_batches<T, R, F, Fut>(
    items: Vec<T>,
    batch_size: usize,
    op: F,
) -> Vec<Option<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    let mut slots: Vec<Option<R>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let op = Arc::new(op);
    let size = batch_size.max(1);
    let mut next_index = 0usize;
    let mut iter = items.into_iter();

    loop {
        let batch: Vec<T> = iter.by_ref().take(size).collect();
        if batch.is_empty() {
            break;
        }
        let batch_len = batch.len();

        let mut set = JoinSet::new();
        for (offset, item) in batch.into_iter().enumerate() {
            let index = next_index + offset;
            let op = Arc::clone(&op);
            set.spawn(async move { (index, op(item).await) });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(error) => warn!(%error, "task terminated abnormally"),
            }
        }

        next_index += batch_len;
    }

    slots
}
