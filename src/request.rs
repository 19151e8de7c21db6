use serde_json::Value;

/// Context of the originating request. Converters consult it only to
/// shape output (field selection, pretty printing, self links), never to
/// re-execute business logic.
#[derive(Debug, Clone, Default)]
pub struct RestRequestItem {
    /// Resource path of the request, e.g. `/people/@me/@self`. Empty when
    /// unknown.
    pub url: String,
    /// Requested field projection. Empty selects everything.
    pub fields: Vec<String>,
    pub pretty: bool,
}

impl RestRequestItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fields: Vec::new(),
            pretty: false,
        }
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Projects a payload onto the requested fields.
    ///
    /// Object payloads keep only the requested keys (`id` is always kept),
    /// arrays are projected element-wise, and scalars pass through
    /// unchanged. An empty field list is the identity.
    pub fn select_fields(&self, payload: &Value) -> Value {
        if self.fields.is_empty() {
            return payload.clone();
        }
        project(payload, &self.fields)
    }
}

fn project(value: &Value, fields: &[String]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| *key == "id" || fields.contains(*key))
                .map(|(key, val)| (key.clone(), val.clone()))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| project(v, fields)).collect()),
        other => other.clone(),
    }
}
