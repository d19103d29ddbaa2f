use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// User-facing entity bucket. Each bucket spans one or more annotation codes of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
	Person,
	Org,
	Location,
}
impl EntityCategory {
	pub const ALL: [Self; 3] = [Self::Person, Self::Org, Self::Location];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Person => "person",
			Self::Org => "org",
			Self::Location => "location",
		}
	}

	/// Annotation codes stored in the `enttype` column for this bucket.
	pub fn codes(&self) -> &'static [&'static str] {
		match self {
			Self::Person => &["PERSON"],
			Self::Org => &["ORG"],
			// Places, facilities and nationality or political groups.
			Self::Location => &["GPE", "LOC", "NORP", "FAC"],
		}
	}
}
impl fmt::Display for EntityCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for EntityCategory {
	type Err = ValidationError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"person" | "persons" => Ok(Self::Person),
			"org" | "orgs" | "organization" | "organizations" => Ok(Self::Org),
			"location" | "locations" => Ok(Self::Location),
			other => Err(ValidationError::new(
				"category",
				format!("'{other}' is not one of person, org, location."),
			)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityOption {
	pub label: String,
	pub category: EntityCategory,
}
