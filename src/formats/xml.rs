use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::converter::OutputConverter;
use crate::error::Result;
use crate::formats::markup;
use crate::request::RestRequestItem;
use crate::response::{Outcome, ResponseItem};
use crate::token::SecurityToken;

const FORMAT: &str = "xml";

pub struct XmlConverter;

impl OutputConverter for XmlConverter {
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
        markup::emit(&mut xml, FORMAT, Event::Start(BytesStart::new("response")))?;
        match &item.outcome {
            Outcome::Success(payload) => {
                let selected = request.select_fields(payload);
                markup::write_children(&mut xml, FORMAT, &selected)?;
            }
            Outcome::Error(error) => markup::write_error(&mut xml, FORMAT, error)?,
        }
        markup::emit(&mut xml, FORMAT, Event::End(BytesEnd::new("response")))
    }

    fn output_batch(
        &self,
        responses: &[ResponseItem],
        token: &SecurityToken,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut xml = Writer::new(writer);
        markup::write_decl(&mut xml, FORMAT)?;

        let mut root = BytesStart::new("responses");
        root.push_attribute(("viewer", token.viewer_id.as_str()));
        markup::emit(&mut xml, FORMAT, Event::Start(root))?;

        for item in responses {
            let mut entry = BytesStart::new("response");
            if let Some(id) = &item.id {
                entry.push_attribute(("id", id.as_str()));
            }
            markup::emit(&mut xml, FORMAT, Event::Start(entry))?;
            match &item.outcome {
                Outcome::Success(payload) => markup::write_children(&mut xml, FORMAT, payload)?,
                Outcome::Error(error) => markup::write_error(&mut xml, FORMAT, error)?,
            }
            markup::emit(&mut xml, FORMAT, Event::End(BytesEnd::new("response")))?;
        }

        markup::emit(&mut xml, FORMAT, Event::End(BytesEnd::new("responses")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ErrorCode;
    use pretty_assertions::assert_eq;
    use quick_xml::Reader;
    use rstest::rstest;
    use serde_json::json;

    fn render_response(item: &ResponseItem, request: &RestRequestItem) -> String {
        let mut output = Vec::new();
        XmlConverter
            .output_response(item, request, &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn render_batch(responses: &[ResponseItem], token: &SecurityToken) -> String {
        let mut output = Vec::new();
        XmlConverter
            .output_batch(responses, token, &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[rstest]
    fn test_success_payload_becomes_elements() {
        let item = ResponseItem::success(json!({"id": "p1", "name": "Jane"}));
        let output = render_response(&item, &RestRequestItem::default());
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <response><id>p1</id><name>Jane</name></response>"
        );
    }

    #[rstest]
    fn test_array_payload_becomes_entries() {
        let item = ResponseItem::success(json!(["a", "b"]));
        let output = render_response(&item, &RestRequestItem::default());
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <response><entry>a</entry><entry>b</entry></response>"
        );
    }

    #[rstest]
    fn test_null_payload_leaves_response_empty() {
        let item = ResponseItem::success(json!(null));
        let output = render_response(&item, &RestRequestItem::default());
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><response></response>"
        );
    }

    #[rstest]
    fn test_field_selection_applies_to_success() {
        let item = ResponseItem::success(json!({"id": "p1", "name": "Jane", "age": 33}));
        let request = RestRequestItem::default().with_fields(vec!["name".to_string()]);
        let output = render_response(&item, &request);
        assert!(output.contains("<name>Jane</name>"));
        assert!(!output.contains("age"));
    }

    #[rstest]
    fn test_payload_keys_are_sanitized() {
        let item = ResponseItem::success(json!({"display name": "Jane"}));
        let output = render_response(&item, &RestRequestItem::default());
        assert!(output.contains("<display_name>Jane</display_name>"));
    }

    #[rstest]
    fn test_error_envelope() {
        let item = ResponseItem::error(ErrorCode::NotFound, "person not found");
        let output = render_response(&item, &RestRequestItem::default());
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <response><error><code>404</code><message>person not found</message></error></response>"
        );
    }

    #[rstest]
    fn test_batch_carries_viewer_and_entry_ids() {
        let responses = vec![
            ResponseItem::success(json!({"name": "Jane"})).with_id("people.get"),
            ResponseItem::error(ErrorCode::BadRequest, "bad input").with_id("activities.get"),
        ];
        let token = SecurityToken::new("jane.doe", "viewer-7", "app-1", "example.org");
        let output = render_batch(&responses, &token);
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <responses viewer=\"viewer-7\">\
             <response id=\"people.get\"><name>Jane</name></response>\
             <response id=\"activities.get\"><error><code>400</code><message>bad input</message></error></response>\
             </responses>"
        );
    }

    #[rstest]
    fn test_empty_batch() {
        let output = render_batch(&[], &SecurityToken::anonymous());
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><responses viewer=\"-1\"></responses>"
        );
    }

    #[rstest]
    fn test_batch_preserves_input_order() {
        let responses: Vec<ResponseItem> = ["first", "second", "third"]
            .iter()
            .map(|id| ResponseItem::success(json!(null)).with_id(*id))
            .collect();
        let output = render_batch(&responses, &SecurityToken::anonymous());
        let first = output.find("first").unwrap();
        let second = output.find("second").unwrap();
        let third = output.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[rstest]
    fn test_rendering_is_deterministic() {
        let responses = vec![
            ResponseItem::success(json!({"name": "Jane"})).with_id("a"),
            ResponseItem::error(ErrorCode::InternalError, "boom").with_id("b"),
        ];
        let token = SecurityToken::anonymous();
        assert_eq!(
            render_batch(&responses, &token),
            render_batch(&responses, &token)
        );
    }

    #[rstest]
    fn test_output_is_well_formed() {
        let responses = vec![
            ResponseItem::success(json!({"name": "J & K < L", "tags": ["a", "b"]}))
                .with_id("people.get"),
            ResponseItem::error(ErrorCode::Forbidden, "no <access> here").with_id("denied"),
        ];
        let output = render_batch(&responses, &SecurityToken::anonymous());

        let mut reader = Reader::from_str(&output);
        let mut depth = 0i32;
        loop {
            match reader.read_event() {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth -= 1,
                Ok(Event::Eof) => break,
                Err(e) => panic!("unparseable output: {e}"),
                _ => {}
            }
        }
        assert_eq!(depth, 0);
    }
}
