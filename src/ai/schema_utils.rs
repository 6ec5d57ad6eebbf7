use crate::error::LabError;
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use serde_json::Value;

// Keys Gemini's OpenAPI subset rejects inside `responseSchema`.
const UNSUPPORTED_KEYS: [&str; 7] = [
    "$schema",
    "title",
    "definitions",
    "additionalProperties",
    "default",
    "minimum",
    "examples",
];

const SUPPORTED_FORMATS: [&str; 5] = ["int32", "int64", "float", "double", "date-time"];

/// Builds a Gemini-compatible `responseSchema` for `T`, with every subschema inlined.
pub fn response_schema<T: JsonSchema>() -> Result<Value, LabError> {
    let settings = SchemaSettings::openapi3().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();
    let mut value = serde_json::to_value(root)?;
    strip_node(&mut value, 0);
    Ok(value)
}

fn strip_node(node: &mut Value, depth: usize) {
    if depth > 32 {
        return;
    }
    match node {
        Value::Object(map) => {
            for key in UNSUPPORTED_KEYS {
                map.remove(key);
            }
            let keep_format = map
                .get("format")
                .and_then(Value::as_str)
                .is_some_and(|f| SUPPORTED_FORMATS.contains(&f));
            if !keep_format {
                map.remove("format");
            }
            // Property names are data, not schema keywords.
            if let Some(Value::Object(props)) = map.get_mut("properties") {
                for child in props.values_mut() {
                    strip_node(child, depth + 1);
                }
            }
            for (key, child) in map.iter_mut() {
                if key != "properties" {
                    strip_node(child, depth + 1);
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                strip_node(child, depth + 1);
            }
        }
        _ => {}
    }
}
