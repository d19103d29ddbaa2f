pub mod entity;
pub mod filter;
pub mod full_text;

mod error;

pub use entity::{EntityCategory, EntityOption};
pub use error::ValidationError;
pub use filter::{DateRange, FilterInput, FilterLimits, FilterState};
pub use full_text::{FullTextQuery, TextTerm};
