//! Required-field checks run before any client handle exists.
//!
//! Absence and emptiness are two separate passes over the declared field order: the first absent
//! field wins, and only when every field is present does the first falsy field (empty string,
//! `0`, `null`, `false`) get reported.

// self
use crate::{_prelude::*, error::ConfigError};

/// Presence classification of a single option field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
	/// The field is not present at all.
	Absent,
	/// The field is present but falsy.
	Empty,
	/// The field is present and carries a usable value.
	Present,
}
impl FieldState {
	/// Classifies an optional text field.
	pub fn of_text(value: Option<&str>) -> Self {
		match value {
			None => Self::Absent,
			Some("") => Self::Empty,
			Some(_) => Self::Present,
		}
	}

	/// Classifies an optional numeric field.
	pub fn of_number(value: Option<i64>) -> Self {
		match value {
			None => Self::Absent,
			Some(0) => Self::Empty,
			Some(_) => Self::Present,
		}
	}

	/// Classifies a raw JSON value.
	pub fn of_json(value: Option<&JsonValue>) -> Self {
		let Some(value) = value else {
			return Self::Absent;
		};
		let falsy = match value {
			JsonValue::Null => true,
			JsonValue::Bool(flag) => !flag,
			JsonValue::Number(number) => number.as_f64().is_some_and(|n| n == 0.0 || n.is_nan()),
			JsonValue::String(text) => text.is_empty(),
			JsonValue::Array(_) | JsonValue::Object(_) => false,
		};

		if falsy { Self::Empty } else { Self::Present }
	}
}

/// Structures whose fields can be looked up by name for validation.
pub trait FieldSource {
	/// Classifies the named field; unknown names are [`FieldState::Absent`].
	fn field_state(&self, field: &str) -> FieldState;
}
impl FieldSource for JsonMap<String, JsonValue> {
	fn field_state(&self, field: &str) -> FieldState {
		FieldState::of_json(self.get(field))
	}
}
impl FieldSource for JsonValue {
	fn field_state(&self, field: &str) -> FieldState {
		match self {
			JsonValue::Object(map) => map.field_state(field),
			_ => FieldState::Absent,
		}
	}
}

/// Returns the first field, in declared order, that is absent from `source`.
pub fn first_missing<'a, S>(source: &S, required: &[&'a str]) -> Option<&'a str>
where
	S: ?Sized + FieldSource,
{
	required.iter().copied().find(|field| source.field_state(field) == FieldState::Absent)
}

/// Returns the first field, in declared order, that is present but falsy.
pub fn first_empty<'a, S>(source: &S, required: &[&'a str]) -> Option<&'a str>
where
	S: ?Sized + FieldSource,
{
	required.iter().copied().find(|field| source.field_state(field) == FieldState::Empty)
}

/// Fails with the first missing field, or else the first empty one.
pub fn validate<S>(source: &S, required: &[&str]) -> Result<(), ConfigError>
where
	S: ?Sized + FieldSource,
{
	if let Some(field) = first_missing(source, required) {
		return Err(ConfigError::MissingField { field: field.to_owned() });
	}
	if let Some(field) = first_empty(source, required) {
		return Err(ConfigError::EmptyField { field: field.to_owned() });
	}

	Ok(())
}
