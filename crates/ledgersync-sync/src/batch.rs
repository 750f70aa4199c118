// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, fixed-size batching over an idempotent write primitive.

use std::future::Future;

use ledgersync_core::SyncError;

/// Splits `items` into chunks of at most `batch_size`, preserving order,
/// and applies `write_fn` to each chunk strictly sequentially: chunk N+1
/// starts only after chunk N completes.
///
/// `write_fn` must be an idempotent upsert keyed by the record's unique
/// identifier; duplicates are skipped, never overwritten. A chunk
/// failure aborts remaining chunks and is returned to the caller.
/// Already-written chunks are not rolled back.
///
/// Returns the total number of records `write_fn` reported written.
pub async fn process_batch<T, F, Fut>(
    items: Vec<T>,
    batch_size: usize,
    mut write_fn: F,
) -> Result<usize, SyncError>
where
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<usize, SyncError>>,
{
    if batch_size == 0 {
        return Err(SyncError::Internal("batch size must be positive".into()));
    }

    let mut written = 0;
    let mut remaining = items;
    while !remaining.is_empty() {
        let rest = remaining.split_off(batch_size.min(remaining.len()));
        let chunk = std::mem::replace(&mut remaining, rest);
        written += write_fn(chunk).await?;
    }
    Ok(written)
}
