//! Buffer ownership for terminal matrix data
//!
//! A terminal either exclusively owns its backing buffer (freed exactly once,
//! when the terminal drops) or views a caller-supplied buffer (never freed by
//! the terminal). The distinction is an explicit enum tag rather than
//! reference counting: caller buffers may outlive or be shorter-lived than
//! the terminal, and the borrow checker polices the viewed case.

/// Backing storage for a dense matrix terminal
#[derive(Debug, Clone)]
pub enum Buffer<'a, T> {
    /// Exclusively owned; deallocated when the terminal drops
    Owned(Vec<T>),
    /// Borrowed view of caller data; never deallocated by the terminal
    Viewed(&'a [T]),
}

impl<'a, T> Buffer<'a, T> {
    /// The elements, regardless of ownership
    pub fn as_slice(&self) -> &[T] {
        match self {
            Buffer::Owned(v) => v.as_slice(),
            Buffer::Viewed(s) => s,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True when the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// True for the exclusively-owned path
    pub fn is_owned(&self) -> bool {
        matches!(self, Buffer::Owned(_))
    }
}
