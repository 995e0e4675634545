use crate::CoreResult;

/// Capability that drives the real pointer.
///
/// Calls are made from the blocking pool, one at a time, in sequence order.
/// Every call may fail; the engine logs the failure and moves on.
pub trait InputSink: Send + Sync {
    /// Moves the pointer to physical `(x, y)` and clicks the left button there.
    fn click(&self, x: i32, y: i32) -> CoreResult<()>;

    /// Scrolls vertically; positive `delta` scrolls up.
    fn scroll(&self, delta: f64) -> CoreResult<()>;
}
