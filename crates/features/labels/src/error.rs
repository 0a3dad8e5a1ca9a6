use std::borrow::Cow;

/// Error types specific to list loading and pricing.
#[reg_derive::reg_error]
pub enum LabelsError {
    /// A list file line could not be understood.
    #[error("Malformed list '{list}' at line {line}{}: {message}", format_context(.context))]
    Parse {
        list: Cow<'static, str>,
        line: usize,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Prices could not be combined (currency mismatch or overflow).
    #[error("Pricing error{}: {message}", format_context(.context))]
    Pricing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl LabelsError {
    pub(crate) fn parse(list: &str, line: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Parse { list: list.to_owned().into(), line, message: message.into(), context: None }
    }
}
