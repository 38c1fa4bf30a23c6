use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::sample::Sample;

/// Shared handle to a capture buffer, held by the engine and its unit.
pub type BufferHandle<T> = Arc<CaptureBuffer<T>>;

/// One fixed-size capture buffer plus the write state of its transfer leg.
///
/// Allocated once by the engine, never resized. The producer writes through
/// [`push`](CaptureBuffer::push); the engine reads through
/// [`with_samples`](CaptureBuffer::with_samples) or
/// [`snapshot`](CaptureBuffer::snapshot) and re-points the write target
/// through [`rearm`](CaptureBuffer::rearm).
#[derive(Debug)]
pub struct CaptureBuffer<T> {
    depth: usize,
    armed: AtomicBool,
    inner: Mutex<BufferInner<T>>,
}

#[derive(Debug)]
struct BufferInner<T> {
    data: Box<[T]>,
    cursor: usize,
}

/// Outcome of pushing one sample into a leg's write target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Stored; the buffer still has room.
    Stored,
    /// Stored and the buffer is now full; the leg disarms itself and its
    /// completion signal fires.
    Filled,
    /// The leg is not armed; the sample was dropped.
    NotArmed,
}

impl<T: Sample> CaptureBuffer<T> {
    /// Allocate a buffer of `depth` samples, initially disarmed.
    pub fn allocate(depth: usize) -> BufferHandle<T> {
        Arc::new(Self {
            depth,
            armed: AtomicBool::new(false),
            inner: Mutex::new(BufferInner {
                data: vec![T::default(); depth].into_boxed_slice(),
                cursor: 0,
            }),
        })
    }

    /// Samples this buffer holds when full.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the leg is currently armed as a write target.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Reset the write cursor to the start of the buffer and arm the leg.
    pub fn rearm(&self) {
        self.inner.lock().cursor = 0;
        self.armed.store(true, Ordering::Release);
    }

    /// Disarm the leg; subsequent pushes are dropped.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Write one sample at the cursor.
    pub fn push(&self, value: T) -> PushOutcome {
        if !self.is_armed() {
            return PushOutcome::NotArmed;
        }
        let mut inner = self.inner.lock();
        if inner.cursor >= self.depth {
            return PushOutcome::NotArmed;
        }
        let cursor = inner.cursor;
        inner.data[cursor] = value;
        inner.cursor = cursor + 1;
        if inner.cursor == self.depth {
            drop(inner);
            self.disarm();
            PushOutcome::Filled
        } else {
            PushOutcome::Stored
        }
    }

    /// Run `f` over the buffer contents without copying.
    pub fn with_samples<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.data)
    }

    /// Copy the buffer contents out.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().data.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_fills_and_disarms() {
        let buf = CaptureBuffer::<u8>::allocate(3);
        buf.rearm();

        assert_eq!(buf.push(1), PushOutcome::Stored);
        assert_eq!(buf.push(2), PushOutcome::Stored);
        assert_eq!(buf.push(3), PushOutcome::Filled);
        assert!(!buf.is_armed());
        assert_eq!(buf.snapshot(), vec![1, 2, 3]);
    }

    #[test]
    fn disarmed_buffer_drops_samples() {
        let buf = CaptureBuffer::<u8>::allocate(2);

        assert_eq!(buf.push(9), PushOutcome::NotArmed);
        assert_eq!(buf.snapshot(), vec![0, 0]);
    }

    #[test]
    fn rearm_resets_cursor_but_keeps_contents() {
        let buf = CaptureBuffer::<u8>::allocate(2);
        buf.rearm();
        buf.push(7);
        buf.push(8);

        buf.rearm();
        assert_eq!(buf.snapshot(), vec![7, 8]);

        buf.push(1);
        assert_eq!(buf.snapshot(), vec![1, 8]);
    }

    #[test]
    fn depth_one_fills_on_first_push() {
        let buf = CaptureBuffer::<u16>::allocate(1);
        buf.rearm();
        assert_eq!(buf.push(0xABC), PushOutcome::Filled);
    }
}
