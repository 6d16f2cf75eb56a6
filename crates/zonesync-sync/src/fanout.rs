//! Structured fan-out helper.

use std::future::Future;

use futures_util::stream::{FuturesUnordered, StreamExt};

/// Drives every future to completion and collects the results in input
/// order.
///
/// A failure does not cancel the remaining futures: all of them run to the
/// end, then the first error observed (in completion order) is returned.
pub(crate) async fn join_all_settled<I, F, T, E>(futures: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut pending: FuturesUnordered<_> = futures
        .into_iter()
        .enumerate()
        .map(|(index, fut)| async move { (index, fut.await) })
        .collect();

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(pending.len()).collect();
    let mut first_error = None;

    while let Some((index, result)) = pending.next().await {
        match result {
            Ok(value) => slots[index] = Some(value),
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(slots.into_iter().flatten().collect()),
    }
}
