//! Bounded multi-producer/multi-consumer ingress ring.
//!
//! A sequence-number slot ring: each slot carries a 64-bit ticket alongside
//! its payload. Slot `i` starts at sequence `i` ("empty, ready for producer
//! ticket `i`"); a producer that claims ticket `t` publishes by storing
//! `t + 1` (release), and the consumer that takes it hands the slot to the
//! next lap by storing `t + N`. Payload visibility rides entirely on the
//! acquire/release pairing of the sequence loads and stores; `head` and
//! `tail` themselves are relaxed.
//!
//! Enqueue and dequeue never block and never fail spuriously: `false`/`None`
//! mean full/empty, a lost CAS retries against the refreshed ticket. Each
//! attempt is wait-free when uncontended and the ring is lock-free in
//! aggregate.

use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};

/// Reference ring capacity: one million-slot lap.
pub const DEFAULT_RING_CAPACITY: usize = 1 << 20;

struct Slot<T> {
    sequence: AtomicU64,
    payload: UnsafeCell<MaybeUninit<T>>,
}

/// Bounded MPMC FIFO carrying records by value.
///
/// `T: Copy` keeps slot hand-off a plain memory copy with nothing to drop on
/// either side of the transfer.
pub struct IngressRing<T> {
    head: CachePadded<AtomicU64>,
    tail: CachePadded<AtomicU64>,
    mask: u64,
    slots: Box<[CachePadded<Slot<T>>]>,
}

// Slots are owned by exactly one ticket holder at a time; ownership transfers
// through the release store of the slot sequence.
unsafe impl<T: Copy + Send> Send for IngressRing<T> {}
unsafe impl<T: Copy + Send> Sync for IngressRing<T> {}

impl<T: Copy> IngressRing<T> {
    /// Allocates a ring of `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or not a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "ring capacity must be a nonzero power of two, got {capacity}"
        );
        let slots = (0..capacity as u64)
            .map(|i| {
                CachePadded::new(Slot {
                    sequence: AtomicU64::new(i),
                    payload: UnsafeCell::new(MaybeUninit::uninit()),
                })
            })
            .collect();
        Self {
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
            mask: capacity as u64 - 1,
            slots,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of committed-but-unconsumed records. Approximate under
    /// concurrent use; exact when the ring is quiescent.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        tail.saturating_sub(head) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enqueues `value`, returning `false` when the ring is full. No partial
    /// write is ever observable to dequeuers.
    pub fn try_enqueue(&self, value: T) -> bool {
        let mut tail = self.tail.load(Ordering::Relaxed);
        loop {
            let slot = &self.slots[(tail & self.mask) as usize];
            let seq = slot.sequence.load(Ordering::Acquire);
            let lag = seq.wrapping_sub(tail) as i64;
            if lag == 0 {
                match self.tail.compare_exchange_weak(
                    tail,
                    tail.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        unsafe { (*slot.payload.get()).write(value) };
                        slot.sequence.store(tail.wrapping_add(1), Ordering::Release);
                        return true;
                    }
                    Err(current) => tail = current,
                }
            } else if lag < 0 {
                // Slot still holds last lap's record: the ring is full.
                return false;
            } else {
                tail = self.tail.load(Ordering::Relaxed);
            }
        }
    }

    /// Dequeues the oldest committed record, or `None` when the ring is
    /// empty.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut head = self.head.load(Ordering::Relaxed);
        loop {
            let slot = &self.slots[(head & self.mask) as usize];
            let seq = slot.sequence.load(Ordering::Acquire);
            let lag = seq.wrapping_sub(head.wrapping_add(1)) as i64;
            if lag == 0 {
                match self.head.compare_exchange_weak(
                    head,
                    head.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        let value = unsafe { (*slot.payload.get()).assume_init_read() };
                        slot.sequence
                            .store(head.wrapping_add(self.slots.len() as u64), Ordering::Release);
                        return Some(value);
                    }
                    Err(current) => head = current,
                }
            } else if lag < 0 {
                return None;
            } else {
                head = self.head.load(Ordering::Relaxed);
            }
        }
    }
}
