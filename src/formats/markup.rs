use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::response::ResponseError;

/// Write a single event, attributing failures to the calling format.
pub(crate) fn emit<W: Write>(xml: &mut Writer<W>, format: &'static str, event: Event) -> Result<()> {
    xml.write_event(event).map_err(|e| Error::Render {
        format,
        message: e.to_string(),
    })
}

pub(crate) fn write_decl<W: Write>(xml: &mut Writer<W>, format: &'static str) -> Result<()> {
    emit(
        xml,
        format,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )
}

/// Write a JSON value as one element with the given name.
/// Objects become nested elements, arrays become repeated `<entry>`
/// children, and null becomes an empty element.
pub(crate) fn write_value<W: Write>(
    xml: &mut Writer<W>,
    format: &'static str,
    name: &str,
    value: &Value,
) -> Result<()> {
    match value {
        Value::Null => emit(xml, format, Event::Empty(BytesStart::new(name))),
        Value::Array(items) => {
            emit(xml, format, Event::Start(BytesStart::new(name)))?;
            for item in items {
                write_value(xml, format, "entry", item)?;
            }
            emit(xml, format, Event::End(BytesEnd::new(name)))
        }
        Value::Object(fields) => {
            emit(xml, format, Event::Start(BytesStart::new(name)))?;
            for (key, field) in fields {
                write_value(xml, format, &element_name(key), field)?;
            }
            emit(xml, format, Event::End(BytesEnd::new(name)))
        }
        scalar => write_text_element(xml, format, name, &scalar_text(scalar)),
    }
}

/// Write a JSON value as the children of an already opened element.
/// Null contributes nothing, so the surrounding element stays empty.
pub(crate) fn write_children<W: Write>(
    xml: &mut Writer<W>,
    format: &'static str,
    value: &Value,
) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                write_value(xml, format, "entry", item)?;
            }
            Ok(())
        }
        Value::Object(fields) => {
            for (key, field) in fields {
                write_value(xml, format, &element_name(key), field)?;
            }
            Ok(())
        }
        scalar => emit(xml, format, Event::Text(BytesText::new(&scalar_text(scalar)))),
    }
}

/// Write the error envelope shared by the markup formats.
pub(crate) fn write_error<W: Write>(
    xml: &mut Writer<W>,
    format: &'static str,
    error: &ResponseError,
) -> Result<()> {
    emit(xml, format, Event::Start(BytesStart::new("error")))?;
    write_text_element(xml, format, "code", &error.code.http().to_string())?;
    write_text_element(xml, format, "message", &error.message)?;
    emit(xml, format, Event::End(BytesEnd::new("error")))
}

pub(crate) fn write_text_element<W: Write>(
    xml: &mut Writer<W>,
    format: &'static str,
    name: &str,
    text: &str,
) -> Result<()> {
    emit(xml, format, Event::Start(BytesStart::new(name)))?;
    emit(xml, format, Event::Text(BytesText::new(text)))?;
    emit(xml, format, Event::End(BytesEnd::new(name)))
}

/// Map an arbitrary payload key onto a well-formed element name.
pub(crate) fn element_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for ch in key.chars() {
        if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            name.push(ch);
        } else {
            name.push('_');
        }
    }
    match name.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => name,
        Some(_) => format!("_{name}"),
        None => "_".to_string(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ErrorCode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn render(write: impl FnOnce(&mut Writer<Vec<u8>>) -> Result<()>) -> String {
        let mut xml = Writer::new(Vec::new());
        write(&mut xml).unwrap();
        String::from_utf8(xml.into_inner()).unwrap()
    }

    #[rstest]
    #[case::string(json!("hi"), "<v>hi</v>")]
    #[case::integer(json!(7), "<v>7</v>")]
    #[case::float(json!(2.5), "<v>2.5</v>")]
    #[case::boolean(json!(true), "<v>true</v>")]
    #[case::null(json!(null), "<v/>")]
    #[case::object(json!({"a": 1, "b": "x"}), "<v><a>1</a><b>x</b></v>")]
    #[case::array(json!([1, 2]), "<v><entry>1</entry><entry>2</entry></v>")]
    #[case::nested(json!({"tags": ["a"]}), "<v><tags><entry>a</entry></tags></v>")]
    fn test_write_value(#[case] value: Value, #[case] expected: &str) {
        let output = render(|xml| write_value(xml, "xml", "v", &value));
        assert_eq!(output, expected);
    }

    #[rstest]
    fn test_write_children_omits_the_wrapper() {
        let value = json!({"id": "p1", "name": "Jane"});
        let output = render(|xml| write_children(xml, "xml", &value));
        assert_eq!(output, "<id>p1</id><name>Jane</name>");
    }

    #[rstest]
    fn test_write_children_null_writes_nothing() {
        let output = render(|xml| write_children(xml, "xml", &json!(null)));
        assert_eq!(output, "");
    }

    #[rstest]
    fn test_declaration() {
        let output = render(|xml| write_decl(xml, "xml"));
        assert_eq!(output, "<?xml version=\"1.0\" encoding=\"utf-8\"?>");
    }

    #[rstest]
    fn test_error_envelope_carries_http_code() {
        let error = ResponseError {
            code: ErrorCode::Unauthorized,
            message: "expired token".into(),
        };
        let output = render(|xml| write_error(xml, "xml", &error));
        assert_eq!(
            output,
            "<error><code>401</code><message>expired token</message></error>"
        );
    }

    #[rstest]
    fn test_text_is_escaped() {
        let output = render(|xml| write_text_element(xml, "xml", "v", "a < b & c"));
        assert!(output.contains("a &lt; b &amp; c"));
        assert!(!output.contains("a < b"));
    }

    #[rstest]
    #[case::plain("name", "name")]
    #[case::dotted("name.formatted", "name.formatted")]
    #[case::digit_start("3d", "_3d")]
    #[case::space("first name", "first_name")]
    #[case::slash("a/b", "a_b")]
    #[case::empty("", "_")]
    #[case::unicode("名前", "名前")]
    fn test_element_name(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(element_name(key), expected);
    }
}
