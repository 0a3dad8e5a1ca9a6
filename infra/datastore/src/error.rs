use std::borrow::Cow;

/// A specialized [`DatastoreError`] enum of this crate.
#[reg_derive::reg_error]
pub enum DatastoreError {
    /// Fixture file could not be read.
    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Fixture file is not valid JSON for the expected shape.
    #[error("Fixture decode error{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
