//! Bounded fan-out over a tokio `JoinSet`.
//!
//! Keeps up to `limit` tasks in flight; when one finishes the next item is
//! spawned, until the input is exhausted and every task has been joined.

use std::future::Future;
use tokio::task::JoinSet;

/// Runs `f(item)` for every item and returns the outputs in input order.
///
/// `limit` of `None` spawns everything at once. A slot is `None` only if
/// its task panicked or was cancelled; siblings are unaffected.
pub(crate) async fn run_bounded<T, F, Fut>(
    items: Vec<T>,
    limit: Option<usize>,
    f: F,
) -> Vec<Option<Fut::Output>>
where
    F: Fn(T) -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    let total = items.len();
    let limit = limit.unwrap_or(total).max(1);
    let mut slots: Vec<Option<Fut::Output>> = (0..total).map(|_| None).collect();
    let mut pending = items.into_iter().enumerate();
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < limit {
            let Some((index, item)) = pending.next() else {
                break;
            };
            let fut = f(item);
            join_set.spawn(async move { (index, fut.await) });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        match res {
            Ok((index, out)) => slots[index] = Some(out),
            Err(e) => tracing::warn!(error = %e, "track task did not complete"),
        }
    }

    slots
}
