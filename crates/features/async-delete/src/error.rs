use std::borrow::Cow;

/// A specialized [`AsyncDeleteError`] enum of this crate.
#[reg_derive::reg_error]
pub enum AsyncDeleteError {
    /// A scan partition task panicked or was cancelled.
    #[error("Scan task failed{}: {source}", format_context(.context))]
    Join { source: tokio::task::JoinError, context: Option<Cow<'static, str>> },
}
