use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ContainerError, SeqResult};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// An owned block of `cap` slots, all of them initialised for the whole
/// lifetime of the block.
///
/// Each block carries a process-unique generation so positions can tell the
/// block they were issued for apart from any later one.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    generation: u64,
    _marker: PhantomData<T>,
}

// SAFETY: RawBuf owns its slots exclusively, so it is Send/Sync exactly when T is.
unsafe impl<T: Send> Send for RawBuf<T> {}
// SAFETY: see above.
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T: Default> RawBuf<T> {
    /// Allocates `cap` slots and fills every one with `T::default()`.
    pub(crate) fn filled(cap: usize) -> SeqResult<Self> {
        let ptr = allocate::<T>(cap)?;

        // Frees whatever was written so far if `T::default()` panics.
        let mut guard = FillGuard {
            ptr,
            cap,
            initialized: 0,
        };
        while guard.initialized < cap {
            // SAFETY: `initialized < cap`, so the slot lies inside the block
            // and has not been written yet.
            unsafe { ptr::write(ptr.as_ptr().add(guard.initialized), T::default()) };
            guard.initialized += 1;
        }
        mem::forget(guard);

        Ok(Self {
            ptr,
            cap,
            generation: next_generation(),
            _marker: PhantomData,
        })
    }
}

impl<T> RawBuf<T> {
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Every slot of the block, logical or spare.
    pub(crate) fn slots(&self) -> &[T] {
        // SAFETY: all `cap` slots are initialised and owned by `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.cap) }
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [T] {
        // SAFETY: all `cap` slots are initialised and uniquely borrowed.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.cap) }
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        // SAFETY: every slot is initialised and dropped exactly once here,
        // then the block is released with the layout it was allocated with.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.cap));
            deallocate(self.ptr, self.cap);
        }
    }
}

struct FillGuard<T> {
    ptr: NonNull<T>,
    cap: usize,
    initialized: usize,
}

impl<T> Drop for FillGuard<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `initialized` slots were written.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.initialized,
            ));
            deallocate(self.ptr, self.cap);
        }
    }
}

fn allocate<T>(cap: usize) -> SeqResult<NonNull<T>> {
    if mem::size_of::<T>() == 0 || cap == 0 {
        return Ok(NonNull::dangling());
    }

    let layout = Layout::array::<T>(cap).map_err(|_| ContainerError::CapacityOverflow(cap))?;
    // SAFETY: the layout has non-zero size.
    let raw = unsafe { alloc(layout) };
    match NonNull::new(raw.cast::<T>()) {
        Some(p) => Ok(p),
        None => handle_alloc_error(layout),
    }
}

/// # Safety
///
/// `ptr` must come from `allocate::<T>(cap)` and not have been released yet.
unsafe fn deallocate<T>(ptr: NonNull<T>, cap: usize) {
    if mem::size_of::<T>() == 0 || cap == 0 {
        return;
    }
    // SAFETY: `allocate` validated this exact layout before allocating.
    unsafe {
        let layout = Layout::from_size_align_unchecked(mem::size_of::<T>() * cap, mem::align_of::<T>());
        dealloc(ptr.as_ptr().cast::<u8>(), layout);
    }
}
