//! Safe traversal of arbitrary nested provider responses.
//!
//! Providers disagree wildly about response shapes, and most fields are optional. The cursor
//! never fails on a missing path: `filter` scopes into a subtree (or an empty one when the key
//! is absent) so multi-level access is expressed as chained single-segment lookups, and scalar
//! coercions fall back to `None` at the leaves. Keys containing separator characters therefore
//! need no escaping.

// self
use crate::_prelude::*;

static ABSENT: Value = Value::Null;

/// Borrowing cursor over one raw response tree.
#[derive(Clone, Copy, Debug)]
pub struct TreeCursor<'a>(&'a Value);
impl<'a> TreeCursor<'a> {
	/// Wraps a raw response value.
	pub fn new(value: &'a Value) -> Self {
		Self(value)
	}

	/// Returns the raw value at the current scope.
	pub fn value(&self) -> &'a Value {
		self.0
	}

	/// Returns true iff `key` resolves at the current scope.
	///
	/// A stored `null` counts as present; use the scalar coercions to distinguish it from a
	/// usable value.
	pub fn exists(&self, key: &str) -> bool {
		self.0.as_object().is_some_and(|map| map.contains_key(key))
	}

	/// Returns the value at `key`, or `None` when the scope is not a map or the key is absent.
	pub fn get(&self, key: &str) -> Option<&'a Value> {
		self.0.as_object()?.get(key)
	}

	/// Returns the value at `key` or the provided default.
	pub fn get_or(&self, key: &str, default: &'a Value) -> &'a Value {
		self.get(key).unwrap_or(default)
	}

	/// Returns a cursor scoped to the subtree at `key`.
	///
	/// Absent keys scope to an empty tree, never `None`, so callers may chain
	/// `.filter(a).filter(b).get(c)` regardless of intermediate absence.
	pub fn filter(&self, key: &str) -> TreeCursor<'a> {
		TreeCursor(self.get(key).unwrap_or(&ABSENT))
	}

	/// Returns a cursor scoped to the sequence element at `index`, or to an empty tree.
	pub fn at(&self, index: usize) -> TreeCursor<'a> {
		TreeCursor(self.0.as_array().and_then(|items| items.get(index)).unwrap_or(&ABSENT))
	}

	/// Returns true iff the current scope is a sequence with an element at `index`.
	pub fn has_index(&self, index: usize) -> bool {
		self.0.as_array().is_some_and(|items| items.len() > index)
	}

	/// Number of elements when the current scope is a sequence, zero otherwise.
	pub fn len(&self) -> usize {
		self.0.as_array().map_or(0, Vec::len)
	}

	/// Returns true when the current scope holds no sequence elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Iterates the sequence elements of the current scope as cursors.
	pub fn items(&self) -> impl Iterator<Item = TreeCursor<'a>> {
		self.0.as_array().into_iter().flatten().map(TreeCursor)
	}

	/// Iterates the property names of the current scope, order unspecified.
	///
	/// Providers use this to linear-scan dynamically named fields (`image_32`, `image_192`, …).
	pub fn keys(&self) -> impl Iterator<Item = &'a str> {
		self.0.as_object().into_iter().flat_map(|map| map.keys().map(String::as_str))
	}

	/// Scalar string coercion for the value at `key`.
	///
	/// Numbers and booleans render to their display form, matching what dynamic-language
	/// providers emit interchangeably; `null`, maps, and sequences coerce to `None`.
	pub fn string(&self, key: &str) -> Option<String> {
		self.get(key).and_then(scalar_string)
	}

	/// Scalar boolean coercion for the value at `key` (accepts `"true"`/`"1"` strings and
	/// non-zero numbers).
	pub fn boolean(&self, key: &str) -> Option<bool> {
		match self.get(key)? {
			Value::Bool(flag) => Some(*flag),
			Value::Number(number) => number.as_i64().map(|raw| raw != 0),
			Value::String(text) => match text.as_str() {
				"true" | "1" => Some(true),
				"false" | "0" => Some(false),
				_ => None,
			},
			Value::Null | Value::Array(_) | Value::Object(_) => None,
		}
	}

	/// Scalar integer coercion for the value at `key`.
	pub fn integer(&self, key: &str) -> Option<i64> {
		match self.get(key)? {
			Value::Number(number) => number.as_i64(),
			Value::String(text) => text.parse().ok(),
			Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
		}
	}
}

/// Renders a scalar value to a string, or `None` for `null` and non-scalar shapes.
pub fn scalar_string(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn missing_paths_chain_safely() {
		let value = json!({"user": {"name": "u"}});
		let cursor = TreeCursor::new(&value);

		assert!(!cursor.exists("missing"));
		assert_eq!(cursor.filter("missing").filter("deeper").get("leaf"), None);
		assert_eq!(cursor.filter("missing").string("anything"), None);
		assert_eq!(cursor.filter("user").string("name").as_deref(), Some("u"));
	}

	#[test]
	fn exists_reports_present_null() {
		let value = json!({"email": null});
		let cursor = TreeCursor::new(&value);

		assert!(cursor.exists("email"));
		assert_eq!(cursor.string("email"), None);
	}

	#[test]
	fn get_or_falls_back_to_default() {
		let value = json!({"kept": "yes"});
		let cursor = TreeCursor::new(&value);
		let default = json!("fallback");

		assert_eq!(cursor.get_or("kept", &default), &json!("yes"));
		assert_eq!(cursor.get_or("dropped", &default), &default);
	}

	#[test]
	fn scalar_coercions_cover_provider_shapes() {
		let value = json!({"id": 583231, "ok": true, "flag": "1", "count": "17", "nested": {}});
		let cursor = TreeCursor::new(&value);

		assert_eq!(cursor.string("id").as_deref(), Some("583231"));
		assert_eq!(cursor.string("ok").as_deref(), Some("true"));
		assert_eq!(cursor.boolean("ok"), Some(true));
		assert_eq!(cursor.boolean("flag"), Some(true));
		assert_eq!(cursor.integer("count"), Some(17));
		assert_eq!(cursor.string("nested"), None);
	}

	#[test]
	fn sequence_access_and_iteration() {
		let value = json!({"items": [{"id": "a"}, {"id": "b"}]});
		let cursor = TreeCursor::new(&value).filter("items");

		assert!(cursor.has_index(1));
		assert!(!cursor.has_index(2));
		assert_eq!(cursor.len(), 2);
		assert_eq!(cursor.at(1).string("id").as_deref(), Some("b"));
		assert_eq!(cursor.at(9).string("id"), None);

		let ids: Vec<_> = cursor.items().filter_map(|item| item.string("id")).collect();

		assert_eq!(ids, ["a", "b"]);
	}

	#[test]
	fn key_scan_finds_dynamic_fields() {
		let value = json!({"image_32": "s", "image_192": "l", "name": "n"});
		let cursor = TreeCursor::new(&value);
		let largest = cursor
			.keys()
			.filter_map(|key| key.strip_prefix("image_")?.parse::<u32>().ok())
			.max();

		assert_eq!(largest, Some(192));
	}
}
