//! `GhostToken` — the permission controller for [`crate::cell::GhostCell`].
//!
//! A zero-sized, branded capability. Every buffer-backed object in this
//! crate (pool, heap, graph, traversal state) stores its payload behind a
//! `GhostCell<'brand, _>` and requires a `&GhostToken<'brand>` to read it or
//! a `&mut GhostToken<'brand>` to write it. Because the token is `!Copy`/
//! `!Clone`, the borrow checker statically rules out two live mutable views
//! of the same object — the single-threaded, non-reentrant contract in
//! spec §5 is therefore a compile-time guarantee, not a documented one.

use core::marker::PhantomData;

/// An invariant lifetime used purely for branding; carries no data.
#[derive(Debug, Default)]
pub struct InvariantLifetime<'brand>(PhantomData<fn(&'brand ()) -> &'brand ()>);

/// A zero-sized token that gates access to every `GhostCell<'brand, _>`
/// created under the same brand.
#[derive(Debug)]
pub struct GhostToken<'brand>(InvariantLifetime<'brand>);

impl<'brand> GhostToken<'brand> {
    /// Creates a new token and runs `f` with it.
    ///
    /// This is the only way to obtain a `GhostToken`; the closure's `for<'new_brand>`
    /// bound prevents the brand from escaping or being confused with another
    /// token's brand.
    ///
    /// ```
    /// use bytepool_graph::token::GhostToken;
    ///
    /// GhostToken::new(|token| {
    ///     assert!(token.is_valid());
    /// });
    /// ```
    pub fn new<F, R>(f: F) -> R
    where
        F: for<'new_brand> FnOnce(GhostToken<'new_brand>) -> R,
    {
        f(GhostToken(InvariantLifetime::default()))
    }

    /// Always `true`; exists for symmetry with fallible capability checks
    /// elsewhere in the crate and to give callers a const-evaluable sanity probe.
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        true
    }
}

// `GhostToken` carries no data; sharing `&GhostToken<'brand>` across threads
// only ever enables token-gated immutable reads, already bounded by the
// `Sync` requirements on the cells themselves. Exclusive mutation still
// needs `&mut GhostToken<'brand>`, which the borrow checker won't let two
// threads hold at once.
unsafe impl<'brand> Sync for GhostToken<'brand> {}
