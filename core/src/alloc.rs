//! Fallible buffer allocation.
//!
//! Benchmark inputs are sized from the command line, so a large `n` can ask
//! for more memory than the host has. Buffers go through `try_reserve_exact`
//! and report [`AllocError`] instead of aborting the process.

use std::fmt;

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError {
    pub what: &'static str,
    pub elements: usize,
    pub bytes: Option<usize>,
}

impl AllocError {
    pub fn new(what: &'static str, elements: usize, elem_size: usize) -> Self {
        Self {
            what,
            elements,
            bytes: elements.checked_mul(elem_size),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes {
            Some(bytes) => write!(
                f,
                "Failed to allocate memory for {} ({} elements, {} bytes)",
                self.what, self.elements, bytes
            ),
            None => write!(
                f,
                "Failed to allocate memory for {} ({} elements, size overflows usize)",
                self.what, self.elements
            ),
        }
    }
}

impl std::error::Error for AllocError {}

/// Allocate a vector of `len` copies of `value`, reporting failure instead of aborting.
pub fn try_filled<T: Clone>(what: &'static str, len: usize, value: T) -> Result<Vec<T>, AllocError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| AllocError::new(what, len, std::mem::size_of::<T>()))?;
    buf.resize(len, value);
    trace!(what, len, "allocated benchmark buffer");
    Ok(buf)
}

/// Fallible `to_vec` for keeping a pristine copy of benchmark input.
pub fn try_clone_slice<T: Clone>(what: &'static str, src: &[T]) -> Result<Vec<T>, AllocError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(src.len())
        .map_err(|_| AllocError::new(what, src.len(), std::mem::size_of::<T>()))?;
    buf.extend_from_slice(src);
    Ok(buf)
}

/// Number of elements in an `n x n` matrix, or an error when it overflows.
pub fn square_len(what: &'static str, n: usize) -> Result<usize, AllocError> {
    n.checked_mul(n).ok_or(AllocError {
        what,
        elements: usize::MAX,
        bytes: None,
    })
}
