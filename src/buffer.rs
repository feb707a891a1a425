/// Append-only byte buffer that doubles its capacity whenever the next write
/// would overflow it.
///
/// `Vec` already grows geometrically, but its growth factor is an
/// implementation detail. The doubling here is explicit so the amortized
/// append cost does not depend on it.
#[derive(Debug, Clone)]
pub struct TickBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl TickBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Written prefix of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Logical capacity; always the initial capacity times a power of two.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.ensure_capacity(self.bytes.len() + data.len());
        self.bytes.extend_from_slice(data);
    }

    fn ensure_capacity(&mut self, needed: usize) {
        if needed <= self.capacity {
            return;
        }

        let mut capacity = self.capacity;
        while capacity < needed {
            capacity = capacity.saturating_mul(2);
        }
        log::trace!("growing tick buffer {} -> {} bytes", self.capacity, capacity);

        self.bytes.reserve_exact(capacity - self.bytes.len());
        self.capacity = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_doubles() {
        let mut buf = TickBuffer::with_capacity(64);
        buf.extend_from_slice(&[1u8; 62]);
        assert_eq!(buf.capacity(), 64);

        buf.extend_from_slice(&[2u8; 31]);
        assert_eq!(buf.capacity(), 128);
        assert_eq!(buf.len(), 93);

        buf.extend_from_slice(&[3u8; 31]);
        assert_eq!(buf.capacity(), 128);

        buf.extend_from_slice(&[4u8; 31]);
        assert_eq!(buf.capacity(), 256);
    }

    #[test]
    fn test_buffer_keeps_written_prefix() {
        let mut buf = TickBuffer::with_capacity(4);
        buf.extend_from_slice(&[1, 2, 3]);
        buf.extend_from_slice(&[4, 5, 6]);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn test_zero_capacity() {
        let mut buf = TickBuffer::with_capacity(0);
        assert!(buf.is_empty());
        buf.extend_from_slice(&[0u8; 31]);
        assert_eq!(buf.capacity(), 32);
    }
}
