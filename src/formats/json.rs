use std::io::Write;

use serde_json::{Map, Value, json};

use crate::converter::OutputConverter;
use crate::error::{Error, Result};
use crate::request::RestRequestItem;
use crate::response::{Outcome, ResponseError, ResponseItem};
use crate::token::SecurityToken;

pub struct JsonConverter;

impl OutputConverter for JsonConverter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn output_response(
        &self,
        item: &ResponseItem,
        request: &RestRequestItem,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let body = match &item.outcome {
            Outcome::Success(payload) => request.select_fields(payload),
            Outcome::Error(error) => json!({"error": error_value(error)}),
        };
        write_json(writer, &body, request.pretty)
    }

    fn output_batch(
        &self,
        responses: &[ResponseItem],
        _token: &SecurityToken,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let entries: Vec<Value> = responses.iter().map(batch_entry).collect();
        let body = json!({"error": false, "responses": entries});
        write_json(writer, &body, false)
    }
}

/// One batch entry, keyed by `data` or `error` with the request id first
/// when the response carries one.
fn batch_entry(item: &ResponseItem) -> Value {
    let mut entry = Map::new();
    if let Some(id) = &item.id {
        entry.insert("id".to_string(), Value::String(id.clone()));
    }
    match &item.outcome {
        Outcome::Success(payload) => {
            entry.insert("data".to_string(), payload.clone());
        }
        Outcome::Error(error) => {
            entry.insert("error".to_string(), error_value(error));
        }
    }
    Value::Object(entry)
}

fn error_value(error: &ResponseError) -> Value {
    json!({
        "code": error.code.http(),
        "message": error.message,
    })
}

fn write_json(writer: &mut dyn Write, body: &Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, body)
    } else {
        serde_json::to_writer(&mut *writer, body)
    }
    .map_err(|e| Error::Render {
        format: "json",
        message: e.to_string(),
    })
}
