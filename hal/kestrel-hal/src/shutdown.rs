//! Fatal error sink

/// Fatal error handler
///
/// Called when the firmware reaches a state it cannot continue from, such
/// as a host requesting a bus that does not exist. Implementations stop
/// all outputs and never return.
pub trait Shutdown {
    /// Halt with a static reason string
    fn halt(&self, reason: &'static str) -> !;
}
