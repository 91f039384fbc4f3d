//! # Buffer Pool
//!
//! Reusable encode buffers for codecs that produce many small payloads.
//!
//! A codec acquires a zeroed buffer of the exact encoded length; once the
//! caller has handed the bytes to the transport, the buffer goes back
//! through [`free_codec_resource`](crate::codec::free_codec_resource).
//!
//! ## Usage
//! ```rust
//! use packwire::utils::buffer_pool::BufferPool;
//!
//! let pool = BufferPool::new(8);
//! let buf = pool.acquire(16);
//! assert_eq!(buf, vec![0u8; 16]);
//! pool.release(buf);
//! assert_eq!(pool.available(), 8);
//! ```

use std::sync::{Arc, Mutex};

/// Buffers with a larger capacity are dropped instead of pooled
pub const MAX_POOLED_BUFFER_SIZE: usize = 4096;

/// Default buffer capacity
const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Thread-safe pool of byte buffers
#[derive(Debug)]
pub struct BufferPool {
    pool: Arc<Mutex<Vec<Vec<u8>>>>,
    limit: usize,
}

impl BufferPool {
    /// Create a pool pre-filled with `pool_size` buffers; it never holds more
    pub fn new(pool_size: usize) -> Self {
        let pool = (0..pool_size)
            .map(|_| Vec::with_capacity(DEFAULT_BUFFER_CAPACITY))
            .collect();

        Self {
            pool: Arc::new(Mutex::new(pool)),
            limit: pool_size,
        }
    }

    /// Take a zero-filled buffer of exactly `len` bytes
    pub fn acquire(&self, len: usize) -> Vec<u8> {
        let mut buffer = self
            .pool
            .lock()
            .ok()
            .and_then(|mut pool| pool.pop())
            .unwrap_or_default();

        buffer.clear();
        buffer.resize(len, 0);
        buffer
    }

    /// Return a buffer to the pool
    pub fn release(&self, mut buffer: Vec<u8>) {
        if buffer.capacity() > MAX_POOLED_BUFFER_SIZE {
            return;
        }

        buffer.clear();
        if let Ok(mut pool) = self.pool.lock() {
            if pool.len() < self.limit {
                pool.push(buffer);
            }
        }
    }

    /// Get the current number of available buffers in the pool
    pub fn available(&self) -> usize {
        self.pool.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Clone for BufferPool {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_pool_basic() {
        let pool = BufferPool::new(10);
        assert_eq!(pool.available(), 10);

        let buf = pool.acquire(4);
        assert_eq!(pool.available(), 9);
        assert_eq!(buf, vec![0, 0, 0, 0]);

        pool.release(buf);
        assert_eq!(pool.available(), 10);
    }

    #[test]
    fn test_reused_buffer_is_zeroed() {
        let pool = BufferPool::new(1);

        let mut buf = pool.acquire(4);
        buf.copy_from_slice(b"test");
        pool.release(buf);

        let buf = pool.acquire(6);
        assert_eq!(buf, vec![0u8; 6]);
        assert!(buf.capacity() >= 6);
    }

    #[test]
    fn test_buffer_pool_empty() {
        let pool = BufferPool::new(1);
        let _buf1 = pool.acquire(1);
        let _buf2 = pool.acquire(1); // Should allocate new

        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_pool_never_exceeds_its_size() {
        let pool = BufferPool::new(1);
        pool.release(Vec::new());
        pool.release(Vec::new());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_buffer_size_limit() {
        let pool = BufferPool::new(1);
        let _held = pool.acquire(0);

        pool.release(vec![0u8; MAX_POOLED_BUFFER_SIZE + 1]);

        // Large buffer should not be returned to pool
        assert_eq!(pool.available(), 0);
    }
}
