//! Tick statistics collection trait

/// Trait for collecting tick pass statistics
///
/// This lets the engine report what a pass did without depending on the
/// host's metrics or debug overlay.
pub trait SimStats {
    /// Record a candidate whose plan came back as `Skip`
    fn record_skip(&mut self);

    /// Record a transition written to the world
    fn record_transition(&mut self);

    /// Record a transition dropped because its block changed since planning
    fn record_stale(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_skip(&mut self) {}
    fn record_transition(&mut self) {}
    fn record_stale(&mut self) {}
}

/// Plain counters, handy for tests and debug overlays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingStats {
    pub skips: u64,
    pub transitions: u64,
    pub stale: u64,
}

impl SimStats for CountingStats {
    fn record_skip(&mut self) {
        self.skips += 1;
    }

    fn record_transition(&mut self) {
        self.transitions += 1;
    }

    fn record_stale(&mut self) {
        self.stale += 1;
    }
}
