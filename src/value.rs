//! `TaggedValue` — the 32-bit-wide universal payload (spec §3, C1).
//!
//! No discriminator is stored; the caller is expected to know which variant
//! is live, exactly as spec describes. The underlying representation is a
//! `zerocopy`-friendly `[u8; 4]` so the value can be reinterpreted between
//! variants without `unsafe` at the call site.

use serde::{Deserialize, Serialize};
use zerocopy::{AsBytes, FromBytes};

/// A 32-bit-wide payload carrying one of `{ i32, f32, *mut () }`.
///
/// Constructors produce a value from each variant; accessors read back
/// whichever variant the caller knows is live. There is no way to ask "which
/// variant is this" — that is by design, matching spec §3.
#[derive(Clone, Copy, AsBytes, FromBytes, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TaggedValue(u32);

impl TaggedValue {
    /// The zero integer, used as the default/reserved value (e.g. an edge's
    /// unused `weight` field).
    pub const ZERO: TaggedValue = TaggedValue(0);

    /// Builds a value from a signed 32-bit integer.
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        TaggedValue(v as u32)
    }

    /// Builds a value from an IEEE-754 single-precision float.
    #[inline]
    pub fn from_float(v: f32) -> Self {
        TaggedValue(v.to_bits())
    }

    /// Builds a value from a raw pointer, truncated to 32 bits on 64-bit hosts.
    ///
    /// This mirrors the source format's "32-bit-wide tagged value" even on a
    /// 64-bit address space; storing a pointer this way is only sound if the
    /// caller's addresses actually fit in 32 bits (e.g. an arena index
    /// reinterpreted as a pointer-shaped payload), which is the only use this
    /// crate makes of the pointer variant.
    #[inline]
    pub fn from_ptr(v: *const ()) -> Self {
        TaggedValue(v as usize as u32)
    }

    /// Reads the value back as a signed 32-bit integer.
    #[inline]
    pub const fn as_int(self) -> i32 {
        self.0 as i32
    }

    /// Reads the value back as an IEEE-754 single-precision float.
    #[inline]
    pub fn as_float(self) -> f32 {
        f32::from_bits(self.0)
    }

    /// Reads the value back as a raw pointer.
    #[inline]
    pub fn as_ptr(self) -> *const () {
        self.0 as usize as *const ()
    }

    /// The raw 32-bit storage, with no variant interpretation applied.
    #[inline]
    pub const fn to_raw_bits(self) -> u32 {
        self.0
    }
}

impl Default for TaggedValue {
    fn default() -> Self {
        TaggedValue::ZERO
    }
}

impl core::fmt::Debug for TaggedValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TaggedValue(0x{:08x})", self.0)
    }
}

impl PartialEq for TaggedValue {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for TaggedValue {}

impl From<i32> for TaggedValue {
    fn from(v: i32) -> Self {
        TaggedValue::from_int(v)
    }
}

impl From<f32> for TaggedValue {
    fn from(v: f32) -> Self {
        TaggedValue::from_float(v)
    }
}
