//! Strongly typed identifiers enforced across the identity domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $max:expr, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Maximum accepted length in bytes.
			pub const MAX_LEN: usize = $max;

			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, Self::MAX_LEN, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, Self::MAX_LEN, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (pool, identity, provider).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (pool, identity, provider).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (pool, identity, provider).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
	/// The identifier is not of the form `region:id`.
	#[error("{kind} identifier must look like `region:id`.")]
	NotRegionQualified {
		/// Kind of identifier (pool, identity, provider).
		kind: &'static str,
	},
}

def_id! {
	IdentityPoolId,
	"Region-qualified identity pool identifier (`us-east-1:0f1e...`).",
	"IdentityPool",
	55,
	validate_region_qualified
}
def_id! {
	IdentityId,
	"Stable identity handle issued by the identity pool.",
	"Identity",
	55,
	validate_view
}
def_id! {
	ProviderName,
	"Login provider name (developer provider or federation provider).",
	"Provider",
	128,
	validate_view
}

impl IdentityPoolId {
	/// Region prefix of the pool identifier.
	pub fn region(&self) -> &str {
		self.0.split_once(':').map(|(region, _)| region).unwrap_or_default()
	}
}

fn validate_view(kind: &'static str, max: usize, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > max {
		return Err(IdentifierError::TooLong { kind, max });
	}

	Ok(())
}

fn validate_region_qualified(
	kind: &'static str,
	max: usize,
	view: &str,
) -> Result<(), IdentifierError> {
	validate_view(kind, max, view)?;

	match view.split_once(':') {
		Some((region, id)) if !region.is_empty() && !id.is_empty() && !id.contains(':') => Ok(()),
		_ => Err(IdentifierError::NotRegionQualified { kind }),
	}
}
