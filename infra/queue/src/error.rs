use std::borrow::Cow;

/// A specialized [`QueueError`] enum of this crate.
#[reg_derive::reg_error]
pub enum QueueError {
    /// The queue no longer accepts tasks.
    #[error("Queue '{message}' is closed{}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
