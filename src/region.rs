//! Fixed-capacity bump region.
//!
//! A [`Region`] reserves one zeroed byte buffer up front and hands out
//! non-overlapping [`Block`]s from its unused tail. Blocks are never freed
//! individually; the whole buffer goes away when the region is dropped.

use std::alloc::{Layout, handle_alloc_error};

use bytes::BytesMut;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("region exhausted: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: usize, available: usize },
    #[error("region capacity {0} exceeds isize::MAX")]
    CapacityOverflow(usize),
    #[error("alignment {0} is not a power of two")]
    BadAlignment(usize),
}

/// Per-allocation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocFlags {
    /// Report exhaustion as [`RegionError::OutOfMemory`] instead of aborting.
    pub soft_fail: bool,
    /// Skip zeroing the returned block.
    pub no_zero: bool,
}

impl AllocFlags {
    pub const FATAL: Self = Self {
        soft_fail: false,
        no_zero: false,
    };

    pub const SOFT_FAIL: Self = Self {
        soft_fail: true,
        no_zero: false,
    };

    pub fn no_zero(self) -> Self {
        Self {
            no_zero: true,
            ..self
        }
    }
}

/// A span of bytes handed out by [`Region::alloc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug)]
pub struct Region {
    buf: BytesMut,
    head: usize,
}

impl Region {
    pub fn new(capacity: usize) -> Result<Self, RegionError> {
        if capacity > isize::MAX as usize {
            return Err(RegionError::CapacityOverflow(capacity));
        }
        Ok(Self {
            buf: BytesMut::zeroed(capacity),
            head: 0,
        })
    }

    /// Carves `count * size` bytes aligned to `align` off the tail.
    ///
    /// Without `flags.soft_fail` an exhausted region aborts the process
    /// through the global allocation error handler.
    pub fn alloc(
        &mut self,
        count: usize,
        size: usize,
        align: usize,
        flags: AllocFlags,
    ) -> Result<Block, RegionError> {
        if !align.is_power_of_two() {
            return Err(RegionError::BadAlignment(align));
        }

        let addr = self.buf.as_ptr() as usize + self.head;
        let padding = addr.wrapping_neg() & (align - 1);
        let available = self.capacity().saturating_sub(self.head + padding);
        let requested = count.checked_mul(size);

        let len = match requested {
            Some(len) if available > 0 && len <= available => len,
            _ => {
                let requested = requested.unwrap_or(usize::MAX);
                if flags.soft_fail {
                    return Err(RegionError::OutOfMemory {
                        requested,
                        available,
                    });
                }
                log::error!(
                    "region exhausted: requested {requested} bytes, {available} of {} available",
                    self.capacity()
                );
                match Layout::from_size_align(requested, align) {
                    Ok(layout) => handle_alloc_error(layout),
                    Err(_) => std::process::abort(),
                }
            }
        };

        let offset = self.head + padding;
        self.head = offset + len;
        if !flags.no_zero {
            self.buf[offset..offset + len].fill(0);
        }
        Ok(Block { offset, len })
    }

    pub fn bytes(&self, block: Block) -> &[u8] {
        &self.buf[block.offset..block.offset + block.len]
    }

    pub fn bytes_mut(&mut self, block: Block) -> &mut [u8] {
        &mut self.buf[block.offset..block.offset + block.len]
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn used(&self) -> usize {
        self.head
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_region_is_zeroed_and_empty() {
        let region = Region::new(64).unwrap();
        assert_eq!(region.capacity(), 64);
        assert_eq!(region.used(), 0);
        assert_eq!(region.remaining(), 64);
    }

    #[test]
    fn blocks_do_not_overlap() {
        let mut region = Region::new(64).unwrap();
        let a = region.alloc(3, 1, 1, AllocFlags::SOFT_FAIL).unwrap();
        let b = region.alloc(2, 4, 4, AllocFlags::SOFT_FAIL).unwrap();
        assert!(a.offset + a.len <= b.offset);
        assert_eq!(b.len, 8);
        assert!(region.used() >= 11);
    }

    #[test]
    fn blocks_are_aligned() {
        let mut region = Region::new(128).unwrap();
        region.alloc(1, 1, 1, AllocFlags::SOFT_FAIL).unwrap();
        let block = region.alloc(1, 8, 8, AllocFlags::SOFT_FAIL).unwrap();
        let addr = region.bytes(block).as_ptr() as usize;
        assert_eq!(addr % 8, 0);
    }

    #[test]
    fn soft_fail_reports_exhaustion() {
        let mut region = Region::new(16).unwrap();
        region.alloc(16, 1, 1, AllocFlags::SOFT_FAIL).unwrap();
        let err = region.alloc(1, 1, 1, AllocFlags::SOFT_FAIL).unwrap_err();
        assert_eq!(
            err,
            RegionError::OutOfMemory {
                requested: 1,
                available: 0
            }
        );
    }

    #[test]
    fn oversized_request_fails_without_moving_head() {
        let mut region = Region::new(16).unwrap();
        assert!(region.alloc(17, 1, 1, AllocFlags::SOFT_FAIL).is_err());
        assert!(region.alloc(usize::MAX, 2, 1, AllocFlags::SOFT_FAIL).is_err());
        assert_eq!(region.used(), 0);
    }

    #[test]
    fn blocks_are_writable_and_start_zeroed() {
        let mut region = Region::new(8).unwrap();
        let first = region.alloc(4, 1, 1, AllocFlags::SOFT_FAIL).unwrap();
        region.bytes_mut(first).copy_from_slice(b"abcd");
        assert_eq!(region.bytes(first), b"abcd");

        let second = region.alloc(4, 1, 1, AllocFlags::SOFT_FAIL).unwrap();
        assert_eq!(region.bytes(second), &[0; 4]);
    }

    #[test]
    fn no_zero_keeps_the_same_layout() {
        let mut zeroed = Region::new(64).unwrap();
        let mut raw = Region::new(64).unwrap();
        for (count, size, align) in [(3, 1, 1), (2, 4, 4), (1, 8, 8)] {
            let a = zeroed.alloc(count, size, align, AllocFlags::SOFT_FAIL).unwrap();
            let b = raw
                .alloc(count, size, align, AllocFlags::SOFT_FAIL.no_zero())
                .unwrap();
            assert_eq!(a.len, b.len);
            assert_eq!(zeroed.bytes(a).as_ptr() as usize % align, 0);
            assert_eq!(raw.bytes(b).as_ptr() as usize % align, 0);
        }
        assert_eq!(
            zeroed.alloc(64, 1, 1, AllocFlags::SOFT_FAIL).is_err(),
            raw.alloc(64, 1, 1, AllocFlags::SOFT_FAIL.no_zero()).is_err()
        );
    }

    #[test]
    fn rejects_bad_alignment_and_capacity() {
        let mut region = Region::new(8).unwrap();
        assert_eq!(
            region.alloc(1, 1, 3, AllocFlags::SOFT_FAIL),
            Err(RegionError::BadAlignment(3))
        );
        assert!(matches!(
            Region::new(usize::MAX),
            Err(RegionError::CapacityOverflow(_))
        ));
    }
}
