/// Lifetime state of a [`crate::Variable`] along the path currently being
/// interpreted. Reset to `Alive` between paths (spec.md §8 property 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifetimeState {
    Alive,
    Terminated,
    /// Sink state: once set, subsequent lifetime-end markers are suppressed
    /// (spec.md §3, "Forgot is a sink state for lifetime").
    Forgot,
    /// Sentinel carried over from the reference implementation's
    /// `LifetimeState.Uninitialized = 999`; every `Variable` there is
    /// constructed directly into `Alive`, so this state is never actually
    /// reached and has no construction site here either.
    Uninitialized,
}
