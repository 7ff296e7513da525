use serde_json::Value;

/// Pull a single top-level string field out of a JSON object.
///
/// Returns `None` when the body is not JSON, not an object, the field is
/// absent, or the field is not a string.
pub fn string_field(body: &str, field: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.as_object()?
        .get(field)?
        .as_str()
        .map(|s| s.to_owned())
}
