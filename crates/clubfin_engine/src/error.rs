//! Caller-side errors for the execution boundary

use clubfin_core::error::EngineError;

/// What can go wrong with a correlated call into the computation context.
///
/// Structural engine failures pass through as [`EngineCallError::Engine`].
/// The other variants are boundary conditions: a stale request superseded
/// by a newer one, or a context that is no longer reachable. The latter is
/// fatal to the in-flight call only, and the owner of the handle decides
/// whether to rebuild the engine and retry.
#[derive(Debug, thiserror::Error)]
pub enum EngineCallError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("request superseded by a newer request")]
    Superseded,

    #[error("computation context unreachable")]
    Disconnected,

    #[error("mismatched response kind '{0}' for request")]
    UnexpectedResponse(&'static str),
}
