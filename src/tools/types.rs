//! JSON Schema definitions for tool parameters and results.

use serde::{Deserialize, Serialize};

/// JSON Schema describing a tool's arguments or result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSchema {
    pub schema: serde_json::Value,
}

impl ToolSchema {
    /// Create from a raw JSON Schema value.
    pub fn from_schema(schema: serde_json::Value) -> Self {
        Self { schema }
    }

    /// Schema for a tool that takes no arguments.
    pub fn empty() -> Self {
        Self {
            schema: serde_json::json!({
                "type": "object",
                "properties": {},
            }),
        }
    }

    /// Builder: create an object schema with properties.
    pub fn object() -> SchemaBuilder {
        SchemaBuilder {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }
}

/// Builder for object schemas.
pub struct SchemaBuilder {
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    /// Add a string property.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "string", "description": description.into() }),
            required,
        )
    }

    /// Add an integer property.
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "integer", "description": description.into() }),
            required,
        )
    }

    /// Add an array-of-objects property whose items have the given string fields.
    pub fn object_array(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        fields: &[(&str, &str)],
    ) -> Self {
        let mut item_props = serde_json::Map::new();
        for (field, field_description) in fields {
            item_props.insert(
                (*field).to_string(),
                serde_json::json!({ "type": "string", "description": field_description }),
            );
        }
        self.property(
            name,
            serde_json::json!({
                "type": "array",
                "description": description.into(),
                "items": { "type": "object", "properties": item_props },
            }),
            false,
        )
    }

    /// Add a property with an arbitrary sub-schema.
    pub fn property(mut self, name: impl Into<String>, schema: serde_json::Value, required: bool) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), schema);
        if required {
            self.required.push(name);
        }
        self
    }

    pub fn build(self) -> ToolSchema {
        let mut schema = serde_json::json!({
            "type": "object",
            "properties": self.properties,
        });
        if !self.required.is_empty() {
            schema["required"] = serde_json::json!(self.required);
        }
        ToolSchema { schema }
    }
}
