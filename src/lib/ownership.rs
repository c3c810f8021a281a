//! Payload ownership policies.
//!
//! The policy is a type parameter of [`RbTree`](crate::RbTree), so whether a
//! removed payload is destroyed or handed back is decided at compile time.

/// Decides what happens to a payload once the tree lets go of it.
pub trait Ownership {
    /// What removal hands back to the caller.
    type Released<T>;

    /// Whether the tree destroys the payloads it lets go of.
    const OWNS_PAYLOADS: bool;

    /// Disposes of a payload that has left the tree.
    fn release<T>(payload: T) -> Self::Released<T>;
}

/// The tree owns its payloads and drops them on removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Owning;

impl Ownership for Owning {
    type Released<T> = ();

    const OWNS_PAYLOADS: bool = true;

    #[inline]
    fn release<T>(payload: T) -> Self::Released<T> {
        drop(payload);
    }
}

/// The tree only holds payloads on behalf of the caller (typically `&T` or
/// `Rc<T>` handles) and gives each one back on removal instead of dropping it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Borrowing;

impl Ownership for Borrowing {
    type Released<T> = T;

    const OWNS_PAYLOADS: bool = false;

    #[inline]
    fn release<T>(payload: T) -> Self::Released<T> {
        payload
    }
}
