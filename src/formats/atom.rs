use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use serde_json::Value;

use crate::converter::OutputConverter;
use crate::error::Result;
use crate::formats::markup;
use crate::request::RestRequestItem;
use crate::response::{Outcome, ResponseItem};
use crate::token::SecurityToken;

const FORMAT: &str = "atom";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const EPOCH: &str = "1970-01-01T00:00:00Z";

pub struct AtomConverter;

impl OutputConverter for AtomConverter {
    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn output_response(
        &self,
        item: &ResponseItem,
        request: &RestRequestItem,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut xml = Writer::new(writer);
        markup::write_decl(&mut xml, FORMAT)?;

        let mut entry = BytesStart::new("entry");
        entry.push_attribute(("xmlns", ATOM_NS));
        markup::emit(&mut xml, FORMAT, Event::Start(entry))?;
        write_entry_body(&mut xml, item, Some(request), "self")?;
        markup::emit(&mut xml, FORMAT, Event::End(BytesEnd::new("entry")))
    }

    fn output_batch(
        &self,
        responses: &[ResponseItem],
        token: &SecurityToken,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut xml = Writer::new(writer);
        markup::write_decl(&mut xml, FORMAT)?;

        let mut feed = BytesStart::new("feed");
        feed.push_attribute(("xmlns", ATOM_NS));
        markup::emit(&mut xml, FORMAT, Event::Start(feed))?;
        markup::write_text_element(&mut xml, FORMAT, "title", "responses")?;
        markup::write_text_element(&mut xml, FORMAT, "id", "urn:social:responses")?;
        markup::write_text_element(&mut xml, FORMAT, "updated", EPOCH)?;
        markup::emit(&mut xml, FORMAT, Event::Start(BytesStart::new("author")))?;
        markup::write_text_element(&mut xml, FORMAT, "name", &token.owner_id)?;
        markup::emit(&mut xml, FORMAT, Event::End(BytesEnd::new("author")))?;

        for (index, item) in responses.iter().enumerate() {
            markup::emit(&mut xml, FORMAT, Event::Start(BytesStart::new("entry")))?;
            write_entry_body(&mut xml, item, None, &index.to_string())?;
            markup::emit(&mut xml, FORMAT, Event::End(BytesEnd::new("entry")))?;
        }

        markup::emit(&mut xml, FORMAT, Event::End(BytesEnd::new("feed")))
    }
}

/// Entry metadata and content. Field selection and the self link only
/// apply when the originating request is known, which batch entries are
/// not.
fn write_entry_body<W: Write>(
    xml: &mut Writer<W>,
    item: &ResponseItem,
    request: Option<&RestRequestItem>,
    fallback_id: &str,
) -> Result<()> {
    let title = item.id.clone().unwrap_or_else(|| {
        if item.is_error() {
            "error".to_string()
        } else {
            "response".to_string()
        }
    });
    markup::write_text_element(xml, FORMAT, "title", &title)?;

    let urn = format!(
        "urn:social:response:{}",
        item.id.as_deref().unwrap_or(fallback_id)
    );
    markup::write_text_element(xml, FORMAT, "id", &urn)?;
    markup::write_text_element(xml, FORMAT, "updated", updated_from(item))?;

    if let Some(request) = request
        && !request.url.is_empty()
    {
        let mut link = BytesStart::new("link");
        link.push_attribute(("rel", "self"));
        link.push_attribute(("href", request.url.as_str()));
        markup::emit(xml, FORMAT, Event::Empty(link))?;
    }

    let mut content = BytesStart::new("content");
    content.push_attribute(("type", "application/xml"));
    markup::emit(xml, FORMAT, Event::Start(content))?;
    match &item.outcome {
        Outcome::Success(payload) => {
            let selected = match request {
                Some(request) => request.select_fields(payload),
                None => payload.clone(),
            };
            markup::write_children(xml, FORMAT, &selected)?;
        }
        Outcome::Error(error) => markup::write_error(xml, FORMAT, error)?,
    }
    markup::emit(xml, FORMAT, Event::End(BytesEnd::new("content")))
}

/// Entries carry their payload's `updated` stamp when it is a string
/// field. Everything else gets the epoch so output stays reproducible.
fn updated_from(item: &ResponseItem) -> &str {
    if let Outcome::Success(Value::Object(fields)) = &item.outcome
        && let Some(Value::String(updated)) = fields.get("updated")
    {
        return updated;
    }
    EPOCH
}
