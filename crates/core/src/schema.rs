//! Declared tool parameter schemas and the adapter to the provider's format.
//!
//! Each tool lists its parameters as plain data ([`ParamSpec`]). The adapter
//! walks that structure and produces the JSON-schema object the model
//! provider expects:
//!
//! ```json
//! { "type": "object",
//!   "properties": { "days": { "type": "number", "description": "..." } },
//!   "required": ["exerciseTemplateId"] }
//! ```
//!
//! `required` lists every parameter that has no default and is not marked
//! optional, and is omitted entirely when that list is empty.

use serde_json::{Map, Value, json};

use crate::provider::ToolDefinition;
use crate::tool::Tool;

/// The type of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    Number,
    String,
    /// A string restricted to a fixed set of values.
    Enum(Vec<&'static str>),
    /// A nested object with its own fields.
    Object(Vec<ParamSpec>),
    /// An array whose items all have the given kind.
    Array(Box<ParamKind>),
}

impl ParamKind {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String | Self::Enum(_) => "string",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }
}

/// One declared parameter of a tool (or field of a nested object).
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: Option<&'static str>,
    pub default: Option<Value>,
    pub optional: bool,
}

impl ParamSpec {
    /// A required parameter with no default.
    pub fn new(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            description: None,
            default: None,
            optional: false,
        }
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, ParamKind::Number)
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn described(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Whether the model must supply this parameter.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.optional
    }

    fn property(&self) -> Value {
        let mut prop = kind_schema(&self.kind);
        if let Some(description) = self.description {
            prop["description"] = json!(description);
        }
        prop
    }
}

fn kind_schema(kind: &ParamKind) -> Value {
    let mut schema = json!({ "type": kind.type_name() });
    match kind {
        ParamKind::Number | ParamKind::String => {}
        ParamKind::Enum(values) => schema["enum"] = json!(values),
        ParamKind::Object(fields) => {
            let nested = object_schema(fields);
            schema["properties"] = nested["properties"].clone();
            if let Some(required) = nested.get("required") {
                schema["required"] = required.clone();
            }
        }
        ParamKind::Array(item) => schema["items"] = kind_schema(item),
    }
    schema
}

fn object_schema(params: &[ParamSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in params {
        properties.insert(param.name.to_string(), param.property());
        if param.is_required() {
            required.push(json!(param.name));
        }
    }

    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

/// Build the provider-facing input schema for a tool's parameter list.
pub fn input_schema(params: &[ParamSpec]) -> Value {
    object_schema(params)
}

/// Convert every tool into the structured definition the provider expects.
pub fn to_provider_format<'a>(
    tools: impl IntoIterator<Item = &'a dyn Tool>,
) -> Vec<ToolDefinition> {
    tools
        .into_iter()
        .map(|tool| ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: input_schema(&tool.parameters()),
        })
        .collect()
}
