#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the registry workspace.
//!
//! Two attribute macros live here:
//!
//! * [`reg_error`] for infrastructure/library error enums (context-carrying, `?`-friendly).
//! * [`epp_exception`] for protocol rejections that must map onto an EPP result code.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! reg-derive = { path = "../infra/derive" }
//! ```
//!
//! Examples below are `ignore`d to avoid compiling in this crate; the integration tests under
//! `tests/ui` show them compiling in a consumer.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining error enums with attachable context.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field
///   (or a field marked `#[source]`/`#[from]`), enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Context fields must be typed `Option<Cow<'static, str>>`.
/// 3. Variants wrapping an upstream error must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[reg_derive::reg_error]
/// pub enum DatastoreError {
///     #[error("Entity not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal datastore error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load() -> Result<(), DatastoreError> {
///     Err("transaction aborted".into())
/// }
/// ```
#[proc_macro_attribute]
pub fn reg_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro for protocol exception enums.
///
/// Every variant must carry exactly one `#[kind(Variant)]` attribute naming the rejection
/// category. The macro strips those attributes, injects `Debug` + `thiserror::Error`, and
/// generates:
///
/// * `fn kind(&self) -> EppErrorKind` returning the declared category,
/// * `fn code(&self) -> u16` delegating to `EppErrorKind::code`,
/// * `fn name(&self) -> &'static str` returning the variant name (stable identifier for logs).
///
/// The kind type defaults to `EppErrorKind` resolved at the call site; pass a path to
/// override it: `#[epp_exception(reg_domain::epp::EppErrorKind)]`.
///
/// # Example
///
/// ```rust,ignore
/// #[reg_derive::epp_exception(reg_domain::epp::EppErrorKind)]
/// #[derive(Clone, PartialEq, Eq)]
/// pub enum EppException {
///     #[kind(StatusProhibitsOperation)]
///     #[error("{0} requires a claims notice")]
///     MissingClaimsNotice(String),
///
///     #[kind(UnimplementedOption)]
///     #[error("The 'maxSigLife' setting is not supported")]
///     MaxSigLifeNotSupported,
/// }
/// ```
#[proc_macro_attribute]
pub fn epp_exception(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::epp::expand(args.into(), input).into()
}
