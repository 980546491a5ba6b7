//! Critical-section and lifecycle hooks supplied by the host.
//!
//! The dispatcher brackets every read-modify-write of its shared table and
//! queue with [`Guard::with`]. Which mutual-exclusion primitive that maps to
//! is the host's call: nothing for a strictly single-context deployment, a
//! global critical section when an interrupt handler produces events the
//! main loop drains, a mutex under an RTOS.
//!
//! `on_init`/`on_deinit` run once inside `EventManager::init`/`deinit` for
//! hosts that need to set up whatever backs the critical section.

/// Host-supplied critical-section strategy.
///
/// # Safety
///
/// Implementors promise that `with` provides mutual exclusion against every
/// other execution context that touches the same `EventManager`, or that
/// only a single context ever touches it. The dispatcher relies on this to
/// hand out `&mut` access to its interior state inside the closure; a guard
/// that breaks the promise while the manager is shared across contexts is
/// undefined behavior.
pub unsafe trait Guard {
    /// Run `f` inside the critical section.
    fn with<R>(&self, f: impl FnOnce() -> R) -> R;

    /// Called once at the end of `EventManager::init`.
    fn on_init(&self) {}

    /// Called once at the end of `EventManager::deinit`.
    fn on_deinit(&self) {}
}

/// No-op guard for single-context deployments.
///
/// Safe only when `trigger`, `process`, and registration all run on the same
/// execution context; it provides no exclusion at all.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoGuard;

unsafe impl Guard for NoGuard {
    #[inline]
    fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }
}

/// Guard backed by the `critical-section` crate (feature `critical-section`).
///
/// Suits the common interrupt-producer / main-loop-consumer split: the
/// platform's `critical_section` implementation (typically interrupt
/// masking) covers every section.
#[cfg(feature = "critical-section")]
#[derive(Copy, Clone, Debug, Default)]
pub struct CsGuard;

#[cfg(feature = "critical-section")]
unsafe impl Guard for CsGuard {
    #[inline]
    fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}
