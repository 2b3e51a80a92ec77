//! # Section catalog
//!
//! The fixed set of section types an element can take. Every per-type
//! behavior in the workspace (default data, collections, link slots, code
//! generation) is an exhaustive `match` over [`SectionType`], so adding a
//! variant fails to compile until every table handles it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported section types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Navbar,
    Hero,
    RichText,
    Text,
    Image,
    Cards,
    Testimonials,
    Pricing,
    Contact,
    LogoGrid,
    Video,
    Buttons,
    Features,
    FeaturesGrid,
    Stats,
    Cta,
    Faq,
    Divider,
    Footer,
    Timeline,
}

/// Palette grouping shown by the element picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Layout,
    Content,
    Media,
    Marketing,
}

/// Location of a link reference inside a data bag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSlot {
    /// Top-level field, e.g. `buttonHref`
    Field(&'static str),
    /// Field of every object in an array, e.g. `links[].href`
    ItemField {
        list: &'static str,
        field: &'static str,
    },
}

/// Shape of the repeatable sub-items of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// One array whose entries are the items
    Items { field: &'static str },
    /// Several arrays that describe the same items index by index
    Parallel {
        fields: &'static [&'static str],
        count: Option<&'static str>,
    },
}

/// Static description of one section type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub tag: &'static str,
    pub label: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub supports_align: bool,
    pub links: &'static [LinkSlot],
    pub collection: Option<Collection>,
}

const CARD_FIELDS: &[&str] = &["titles", "descriptions", "imageUrls"];

impl SectionType {
    pub const ALL: [SectionType; 20] = [
        SectionType::Navbar,
        SectionType::Hero,
        SectionType::RichText,
        SectionType::Text,
        SectionType::Image,
        SectionType::Cards,
        SectionType::Testimonials,
        SectionType::Pricing,
        SectionType::Contact,
        SectionType::LogoGrid,
        SectionType::Video,
        SectionType::Buttons,
        SectionType::Features,
        SectionType::FeaturesGrid,
        SectionType::Stats,
        SectionType::Cta,
        SectionType::Faq,
        SectionType::Divider,
        SectionType::Footer,
        SectionType::Timeline,
    ];

    /// Wire tag (`"hero"`, `"featuresgrid"`, ...)
    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Look up a type by its wire tag
    pub fn from_tag(tag: &str) -> Option<SectionType> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// The handler table entry for this type
    pub fn spec(self) -> SectionSpec {
        use Category::*;
        use SectionType::*;

        match self {
            Navbar => SectionSpec {
                tag: "navbar",
                label: "Navbar",
                category: Layout,
                description: "Top navigation bar",
                supports_align: false,
                links: &[LinkSlot::ItemField { list: "links", field: "href" }],
                collection: Some(Collection::Items { field: "links" }),
            },
            Footer => SectionSpec {
                tag: "footer",
                label: "Footer",
                category: Layout,
                description: "Bottom footer area",
                supports_align: true,
                links: &[],
                collection: None,
            },
            Divider => SectionSpec {
                tag: "divider",
                label: "Divider",
                category: Layout,
                description: "Section separator",
                supports_align: false,
                links: &[],
                collection: None,
            },
            Hero => SectionSpec {
                tag: "hero",
                label: "Hero",
                category: Content,
                description: "Main landing section",
                supports_align: true,
                links: &[LinkSlot::Field("buttonHref")],
                collection: None,
            },
            RichText => SectionSpec {
                tag: "richtext",
                label: "Rich Text",
                category: Content,
                description: "Advanced text block",
                supports_align: true,
                links: &[],
                collection: None,
            },
            Text => SectionSpec {
                tag: "text",
                label: "Text",
                category: Content,
                description: "Simple text block",
                supports_align: true,
                links: &[],
                collection: None,
            },
            Features => SectionSpec {
                tag: "features",
                label: "Features",
                category: Content,
                description: "Feature highlights",
                supports_align: false,
                links: &[],
                collection: Some(Collection::Items { field: "items" }),
            },
            FeaturesGrid => SectionSpec {
                tag: "featuresgrid",
                label: "Features Grid",
                category: Content,
                description: "Grid of features",
                supports_align: false,
                links: &[],
                collection: Some(Collection::Items { field: "items" }),
            },
            Faq => SectionSpec {
                tag: "faq",
                label: "FAQ",
                category: Content,
                description: "Questions & Answers",
                supports_align: false,
                links: &[],
                collection: Some(Collection::Items { field: "items" }),
            },
            Timeline => SectionSpec {
                tag: "timeline",
                label: "Timeline",
                category: Content,
                description: "Chronological steps",
                supports_align: false,
                links: &[],
                collection: Some(Collection::Items { field: "items" }),
            },
            Stats => SectionSpec {
                tag: "stats",
                label: "Stats",
                category: Content,
                description: "Numerical statistics",
                supports_align: false,
                links: &[],
                collection: Some(Collection::Items { field: "stats" }),
            },
            Testimonials => SectionSpec {
                tag: "testimonials",
                label: "Testimonials",
                category: Content,
                description: "Customer reviews",
                supports_align: false,
                links: &[],
                collection: Some(Collection::Items { field: "items" }),
            },
            Image => SectionSpec {
                tag: "image",
                label: "Image",
                category: Media,
                description: "Photos and illustrations",
                supports_align: false,
                links: &[],
                collection: None,
            },
            Video => SectionSpec {
                tag: "video",
                label: "Video",
                category: Media,
                description: "Embedded video player",
                supports_align: false,
                links: &[],
                collection: None,
            },
            Cards => SectionSpec {
                tag: "cards",
                label: "Cards",
                category: Media,
                description: "Grid of info cards",
                supports_align: false,
                links: &[LinkSlot::Field("buttonHref")],
                collection: Some(Collection::Parallel {
                    fields: CARD_FIELDS,
                    count: Some("count"),
                }),
            },
            LogoGrid => SectionSpec {
                tag: "logogrid",
                label: "Logo Grid",
                category: Media,
                description: "Partner logos",
                supports_align: false,
                links: &[],
                collection: Some(Collection::Items { field: "logos" }),
            },
            Cta => SectionSpec {
                tag: "cta",
                label: "Call to Action",
                category: Marketing,
                description: "Conversion block",
                supports_align: true,
                links: &[LinkSlot::Field("buttonHref")],
                collection: None,
            },
            Pricing => SectionSpec {
                tag: "pricing",
                label: "Pricing",
                category: Marketing,
                description: "Price tables",
                supports_align: false,
                links: &[LinkSlot::ItemField { list: "plans", field: "buttonHref" }],
                collection: Some(Collection::Items { field: "plans" }),
            },
            Contact => SectionSpec {
                tag: "contact",
                label: "Contact",
                category: Marketing,
                description: "Contact forms",
                supports_align: false,
                links: &[],
                collection: None,
            },
            Buttons => SectionSpec {
                tag: "buttons",
                label: "Buttons",
                category: Marketing,
                description: "Action buttons",
                supports_align: true,
                links: &[LinkSlot::ItemField { list: "buttons", field: "href" }],
                collection: Some(Collection::Items { field: "buttons" }),
            },
        }
    }

    /// All types in `category`, in catalog order
    pub fn in_category(category: Category) -> impl Iterator<Item = SectionType> {
        Self::ALL.into_iter().filter(move |t| t.spec().category == category)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown section type: {0}")]
pub struct UnknownSectionType(pub String);

impl FromStr for SectionType {
    type Err = UnknownSectionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownSectionType(s.to_string()))
    }
}

/// Type tag carried by an element
///
/// Stored documents may contain tags of retired section types. They are kept
/// verbatim so the document round-trips, and render as a generic placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionKind {
    Known(SectionType),
    Unknown(String),
}

impl SectionKind {
    pub fn parse(tag: &str) -> Self {
        match SectionType::from_tag(tag) {
            Some(t) => SectionKind::Known(t),
            None => SectionKind::Unknown(tag.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            SectionKind::Known(t) => t.tag(),
            SectionKind::Unknown(tag) => tag,
        }
    }

    pub fn known(&self) -> Option<SectionType> {
        match self {
            SectionKind::Known(t) => Some(*t),
            SectionKind::Unknown(_) => None,
        }
    }

    /// Link slots of this kind (none for unknown kinds)
    pub fn link_slots(&self) -> &'static [LinkSlot] {
        self.known().map(|t| t.spec().links).unwrap_or(&[])
    }
}

impl From<SectionType> for SectionKind {
    fn from(t: SectionType) -> Self {
        SectionKind::Known(t)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
