use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A backend node exactly as received. The backend has no fixed node
/// schema, so fields are kept verbatim and read through [`RecordShape`].
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct EntityRecord {
	fields: Map<String, Value>,
}

/// The identity a record carries, in order of precedence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordShape {
	/// Stored node: backend internal `_uid` or generic `uid`.
	Stored {
		/// The id.
		uid: String,
	},
	/// STIX object carrying `stix_id`.
	Stix {
		/// The id.
		stix_id: String,
	},
	/// MISP event or attribute carrying `misp_id`.
	Misp {
		/// The id.
		misp_id: String,
	},
	/// Only a `name` to go by. Never used to pick a search result.
	Named {
		/// The name.
		name: String,
	},
	/// Nothing usable.
	Unidentified,
}

impl RecordShape {
	/// Identifier for graph elements.
	pub fn id(&self) -> Option<&str> {
		match self {
			RecordShape::Stored { uid } => Some(uid.as_str()),
			RecordShape::Stix { stix_id } => Some(stix_id.as_str()),
			RecordShape::Misp { misp_id } => Some(misp_id.as_str()),
			RecordShape::Named { name } => Some(name.as_str()),
			RecordShape::Unidentified => None,
		}
	}

	/// Identifier for opening a search hit as a graph root.
	pub fn business_id(&self) -> Option<&str> {
		match self {
			RecordShape::Named { .. } => None,
			other => other.id(),
		}
	}
}

/// Non-empty string or number as id text. Anything else is no id.
pub(crate) fn id_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

impl EntityRecord {
	/// Wraps an already parsed JSON object.
	pub fn new(fields: Map<String, Value>) -> Self {
		Self { fields }
	}

	/// All fields, verbatim.
	pub fn fields(&self) -> &Map<String, Value> {
		&self.fields
	}

	/// Non-empty text value of `key`. Numbers count as text so numeric
	/// MISP ids still identify a record.
	pub fn text(&self, key: &str) -> Option<String> {
		id_text(self.fields.get(key)?)
	}

	fn first_text(&self, keys: &[&str]) -> Option<String> {
		keys.iter().find_map(|k| self.text(k))
	}

	/// Classifies the record by the first identifying field present.
	pub fn shape(&self) -> RecordShape {
		if let Some(uid) = self.first_text(&["_uid", "uid"]) {
			RecordShape::Stored { uid }
		} else if let Some(stix_id) = self.text("stix_id") {
			RecordShape::Stix { stix_id }
		} else if let Some(misp_id) = self.text("misp_id") {
			RecordShape::Misp { misp_id }
		} else if let Some(name) = self.text("name") {
			RecordShape::Named { name }
		} else {
			RecordShape::Unidentified
		}
	}

	/// Display label, falling back to `id` when the record has none.
	pub fn label_or(&self, id: &str) -> String {
		self.first_text(&["name", "value", "misp_id"])
			.unwrap_or_else(|| id.to_string())
	}

	/// Style classes: the STIX type, else the node's labels space-joined.
	pub fn classes(&self) -> String {
		if let Some(t) = self.text("stix_type") {
			return t;
		}
		match self.fields.get("labels") {
			Some(Value::Array(labels)) => labels
				.iter()
				.filter_map(Value::as_str)
				.collect::<Vec<_>>()
				.join(" "),
			Some(Value::String(s)) => s.clone(),
			_ => String::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn record(value: Value) -> EntityRecord {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn internal_id_wins() {
		let r = record(json!({"_uid": "n1", "uid": "u1", "stix_id": "s1", "name": "x"}));
		assert_eq!(r.shape(), RecordShape::Stored { uid: "n1".into() });
		let r = record(json!({"uid": "u1", "stix_id": "s1"}));
		assert_eq!(r.shape().id(), Some("u1"));
	}

	#[test]
	fn empty_strings_are_skipped() {
		let r = record(json!({"_uid": "", "uid": "", "stix_id": "indicator--1"}));
		assert_eq!(
			r.shape(),
			RecordShape::Stix {
				stix_id: "indicator--1".into()
			}
		);
	}

	#[test]
	fn numeric_misp_id() {
		let r = record(json!({"misp_id": 42, "name": "Event"}));
		assert_eq!(r.shape(), RecordShape::Misp { misp_id: "42".into() });
	}

	#[test]
	fn name_only_is_not_a_business_id() {
		let r = record(json!({"name": "8.8.8.8"}));
		assert_eq!(r.shape().id(), Some("8.8.8.8"));
		assert_eq!(r.shape().business_id(), None);
		assert_eq!(record(json!({"value": "x"})).shape(), RecordShape::Unidentified);
	}

	#[test]
	fn label_fallbacks() {
		assert_eq!(record(json!({"name": "APT1", "value": "v"})).label_or("id"), "APT1");
		assert_eq!(record(json!({"value": "1.2.3.4"})).label_or("id"), "1.2.3.4");
		assert_eq!(record(json!({"misp_id": "7"})).label_or("id"), "7");
		assert_eq!(record(json!({"_uid": "n9"})).label_or("n9"), "n9");
	}

	#[test]
	fn classes_from_type_or_labels() {
		assert_eq!(
			record(json!({"stix_type": "malware", "labels": ["Malware"]})).classes(),
			"malware"
		);
		assert_eq!(
			record(json!({"labels": ["Indicator", "Report"]})).classes(),
			"Indicator Report"
		);
		assert_eq!(record(json!({})).classes(), "");
	}
}
