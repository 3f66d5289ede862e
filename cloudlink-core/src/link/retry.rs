//! Bounded busy-polling

use cloudlink_hal::Clock;

/// Call `attempt` until it yields a value or `timeout_ms` has elapsed
///
/// The attempt runs before each deadline check, so a value produced on the
/// last attempt still counts. Returns `Ok(None)` on timeout. An error from
/// `attempt` stops polling immediately.
pub fn retry_until<C, T, E, F>(clock: &C, timeout_ms: u32, mut attempt: F) -> Result<Option<T>, E>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<Option<T>, E>,
{
    let start = clock.now_millis();
    loop {
        if let Some(value) = attempt()? {
            return Ok(Some(value));
        }
        if clock.elapsed_since(start) > timeout_ms {
            return Ok(None);
        }
    }
}
