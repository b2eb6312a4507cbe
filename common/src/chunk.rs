use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk size must be greater than zero")]
    ZeroSize,
}

/// Split `items` into contiguous batches of at most `size` elements.
///
/// Every batch except the last holds exactly `size` elements; the last one
/// holds the remainder. An empty input yields no batches.
///
/// When `size` is at least `items.len()` the whole input comes back as a
/// single batch. Callers used to receiving the bare sequence in that case
/// (rather than a list containing it) need to index into the result.
pub fn chunk<T>(items: &[T], size: usize) -> Result<Vec<&[T]>, ChunkError> {
    if size == 0 {
        return Err(ChunkError::ZeroSize);
    }

    if items.is_empty() {
        return Ok(Vec::new());
    }

    if size >= items.len() {
        return Ok(vec![items]);
    }

    Ok(items.chunks(size).collect())
}
