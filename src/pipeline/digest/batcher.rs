//! Batcher: contiguous, order-preserving chunks of the feedback list.

use super::error::DigestError;
use super::types::Batch;

/// Number of batches `item_count` items split into.
pub fn batch_count(item_count: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    item_count.div_ceil(batch_size)
}

/// Split `items` into batches of `batch_size`; only the last may be shorter.
///
/// An empty input yields no batches. Pure: the same input always yields the
/// same batches.
pub fn make_batches(items: &[String], batch_size: usize) -> Result<Vec<Batch<'_>>, DigestError> {
    if batch_size == 0 {
        return Err(DigestError::InvalidConfiguration(
            "batch_size must be at least 1".into(),
        ));
    }

    Ok(items
        .chunks(batch_size)
        .enumerate()
        .map(|(i, chunk)| Batch {
            index: i + 1,
            items: chunk,
        })
        .collect())
}
