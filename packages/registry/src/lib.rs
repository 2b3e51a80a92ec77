//! # Pagecraft Section Registry
//!
//! The fixed catalog of section types an element can take, and everything
//! that depends only on the type tag:
//!
//! - [`SectionType::spec`]: label, category, align support, link slots and
//!   collection shape per type
//! - [`default_data_for`]: total default-data constructor (unknown tags get the
//!   baseline fields)
//! - [`collections`]: item add/remove that keeps parallel arrays in step
//! - [`theme`]: palette lookup with default fallback

pub mod collections;
mod data;
mod defaults;
mod section;
pub mod theme;

pub use collections::CollectionError;
pub use data::DataBag;
pub use defaults::{baseline_data, default_data, default_data_for, DEFAULT_CARD_COUNT};
pub use section::{
    Category, Collection, LinkSlot, SectionKind, SectionSpec, SectionType, UnknownSectionType,
};
pub use theme::{palette_or_default, Palette, Tone, DEFAULT_THEME};
