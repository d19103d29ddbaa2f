//! Normalization and parsing of the free-text search box.
//!
//! The normalized text is handed verbatim to PostgreSQL's `websearch_to_tsquery`; the parsed
//! [`TextTerm`]s describe how that function reads it: bare words, `"double-quoted phrases"`,
//! `OR` between alternatives and a leading `-` negating the following word or phrase.

use crate::ValidationError;

const FIELD: &str = "full_text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTerm {
	Word { text: String, negated: bool },
	Phrase { text: String, negated: bool },
	Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTextQuery {
	text: String,
	terms: Vec<TextTerm>,
}
impl FullTextQuery {
	/// Returns `Ok(None)` for blank input.
	///
	/// Input wrapped in single quotes is promoted to a double-quoted phrase. A lone quote
	/// character or an empty quoted phrase is rejected.
	pub fn parse(raw: &str) -> Result<Option<Self>, ValidationError> {
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return Ok(None);
		}
		if trimmed == "'" {
			return Err(ValidationError::new(
				FIELD,
				"a single quote character is not a valid search term.",
			));
		}

		let text = match trimmed.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
			Some(inner) => {
				if inner.trim().is_empty() {
					return Err(ValidationError::new(FIELD, "quoted phrase must not be empty."));
				}

				format!("\"{inner}\"")
			},
			None => trimmed.to_string(),
		};
		let terms = tokenize(&text);

		if terms.iter().all(|term| matches!(term, TextTerm::Or)) {
			return Err(ValidationError::new(FIELD, "search text contains no searchable term."));
		}

		Ok(Some(Self { text, terms }))
	}

	/// The text bound to the text-search operator, after normalization.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn terms(&self) -> &[TextTerm] {
		&self.terms
	}
}

fn tokenize(text: &str) -> Vec<TextTerm> {
	let mut terms = Vec::new();
	let mut chars = text.chars().peekable();

	while let Some(&ch) = chars.peek() {
		if ch.is_whitespace() {
			chars.next();

			continue;
		}

		let mut negated = false;

		if ch == '-' {
			chars.next();

			match chars.peek() {
				Some(next) if !next.is_whitespace() => negated = true,
				_ => continue,
			}
		}

		if chars.peek() == Some(&'"') {
			chars.next();

			let mut phrase = String::new();

			for next in chars.by_ref() {
				if next == '"' {
					break;
				}

				phrase.push(next);
			}

			let phrase = phrase.trim();

			if !phrase.is_empty() {
				terms.push(TextTerm::Phrase { text: phrase.to_string(), negated });
			}

			continue;
		}

		let mut word = String::new();

		while let Some(&next) = chars.peek() {
			if next.is_whitespace() || next == '"' {
				break;
			}

			word.push(next);
			chars.next();
		}

		if word.is_empty() {
			continue;
		}
		if !negated && word.eq_ignore_ascii_case("or") {
			terms.push(TextTerm::Or);
		} else {
			terms.push(TextTerm::Word { text: word, negated });
		}
	}

	terms
}
