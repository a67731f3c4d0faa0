//! Allocator adapter handed to compression engines.
//!
//! Native compression engines expect a pair of C-style `alloc`/`free`
//! callbacks rather than a Rust allocator. [`EngineAllocator`] carries that
//! pair explicitly so a binding can pass it into the engine at call time,
//! and [`EngineBuffer`] owns memory obtained through it, returning the memory
//! through the matching `free` callback when dropped.
//!
//! Every allocation made through [`EngineAllocator::aligned`] is aligned to
//! [`ENGINE_ALIGNMENT`] bytes, which engines rely on for their vector code.

use std::alloc::{self, Layout};
use std::ffi::c_void;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

/// Minimum alignment for engine allocations.
pub const ENGINE_ALIGNMENT: usize = 16;

/// C-ABI allocation callback: returns `bytes` bytes of memory or null.
pub type AllocFn = unsafe extern "C" fn(bytes: usize) -> *mut c_void;

/// C-ABI release callback for memory returned by the paired [`AllocFn`].
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void);

// The allocation size is stored in a prefix so `free` can rebuild the layout.
// The prefix is a full alignment unit to keep the returned pointer aligned.
const SIZE_PREFIX: usize = ENGINE_ALIGNMENT;

unsafe extern "C" fn aligned_alloc(bytes: usize) -> *mut c_void {
    let Some(total) = bytes.checked_add(SIZE_PREFIX) else {
        return ptr::null_mut();
    };
    let Ok(layout) = Layout::from_size_align(total, ENGINE_ALIGNMENT) else {
        return ptr::null_mut();
    };

    let base = alloc::alloc(layout);
    if base.is_null() {
        return ptr::null_mut();
    }

    base.cast::<usize>().write(total);
    base.add(SIZE_PREFIX).cast::<c_void>()
}

unsafe extern "C" fn aligned_free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }

    let base = ptr.cast::<u8>().sub(SIZE_PREFIX);
    let total = base.cast::<usize>().read();
    alloc::dealloc(base, Layout::from_size_align_unchecked(total, ENGINE_ALIGNMENT));
}

/// Explicit `alloc`/`free` callback pair passed to a compression engine.
#[derive(Clone, Copy)]
pub struct EngineAllocator {
    alloc: AllocFn,
    free: FreeFn,
}

impl EngineAllocator {
    /// Build an allocator from a caller-provided callback pair.
    ///
    /// `free` must accept every non-null pointer returned by `alloc`.
    pub const fn new(alloc: AllocFn, free: FreeFn) -> Self {
        Self { alloc, free }
    }

    /// Allocator backed by the global Rust allocator with
    /// [`ENGINE_ALIGNMENT`]-byte alignment.
    pub const fn aligned() -> Self {
        Self::new(aligned_alloc, aligned_free)
    }

    /// The raw allocation callback, for engines with a C entry point.
    pub fn alloc_fn(&self) -> AllocFn {
        self.alloc
    }

    /// The raw release callback, for engines with a C entry point.
    pub fn free_fn(&self) -> FreeFn {
        self.free
    }

    /// Allocate a zero-filled buffer of `len` bytes, or `None` if the
    /// callback returned null.
    pub fn try_allocate(&self, len: usize) -> Option<EngineBuffer> {
        // SAFETY: the callbacks are a matched pair by construction contract.
        unsafe {
            let raw = (self.alloc)(len);
            if raw.is_null() {
                return None;
            }
            ptr::write_bytes(raw.cast::<u8>(), 0, len);
            EngineBuffer::from_raw(raw, len, self.free)
        }
    }

    /// Allocate a zero-filled buffer of `len` bytes.
    ///
    /// Allocation failure is not recoverable for callers of this adapter and
    /// is routed to [`std::alloc::handle_alloc_error`].
    pub fn allocate(&self, len: usize) -> EngineBuffer {
        match self.try_allocate(len) {
            Some(buffer) => buffer,
            None => alloc::handle_alloc_error(
                Layout::from_size_align(len.max(1), ENGINE_ALIGNMENT)
                    .unwrap_or_else(|_| Layout::new::<u8>()),
            ),
        }
    }
}

impl Default for EngineAllocator {
    fn default() -> Self {
        Self::aligned()
    }
}

impl fmt::Debug for EngineAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineAllocator")
            .field("alloc", &(self.alloc as *const ()))
            .field("free", &(self.free as *const ()))
            .finish()
    }
}

/// Byte buffer owned through an [`EngineAllocator`] callback pair.
///
/// Dropping the buffer releases it through the `free` callback it was
/// created with.
pub struct EngineBuffer {
    ptr: NonNull<u8>,
    len: usize,
    free: FreeFn,
}

// SAFETY: the buffer exclusively owns its allocation; the callbacks are plain
// functions with no thread affinity.
unsafe impl Send for EngineBuffer {}
unsafe impl Sync for EngineBuffer {}

impl EngineBuffer {
    /// Take ownership of `len` initialized bytes at `ptr`.
    ///
    /// Returns `None` when `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least `len` initialized bytes that were obtained
    /// from the allocation callback paired with `free`, and must not be owned
    /// by anything else.
    pub unsafe fn from_raw(ptr: *mut c_void, len: usize, free: FreeFn) -> Option<Self> {
        NonNull::new(ptr.cast::<u8>()).map(|ptr| Self { ptr, len, free })
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer to the first byte, for alignment checks and C entry points.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }
}

impl Deref for EngineBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` initialized bytes for our lifetime.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for EngineBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for EngineBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from the allocation callback paired with `free`.
        unsafe { (self.free)(self.ptr.as_ptr().cast::<c_void>()) }
    }
}

impl fmt::Debug for EngineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuffer").field("len", &self.len).finish()
    }
}
