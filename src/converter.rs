use crate::error::Result;
use crate::request::RestRequestItem;
use crate::response::ResponseItem;
use crate::token::SecurityToken;
use std::io::Write;

/// Renders API response envelopes into one wire format.
///
/// Implementations are stateless: the same inputs always produce the same
/// bytes. Error items render as the format's error encoding rather than
/// failing the call, and batch rendering preserves the order of the input
/// slice.
pub trait OutputConverter {
    /// Writes a single response, applying the request's field selection to
    /// success payloads.
    fn output_response(
        &self,
        item: &ResponseItem,
        request: &RestRequestItem,
        writer: &mut dyn Write,
    ) -> Result<()>;

    /// Writes a batch of responses as one document, mixing success and error
    /// entries in input order.
    fn output_batch(
        &self,
        responses: &[ResponseItem],
        token: &SecurityToken,
        writer: &mut dyn Write,
    ) -> Result<()>;

    fn format_name(&self) -> &'static str;
}
