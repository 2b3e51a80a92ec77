//! # Default data
//!
//! `default_data_for` is total: every known type gets its seeded fields on top
//! of the baseline, and unknown tags get the baseline alone.

use crate::data::DataBag;
use crate::section::{SectionKind, SectionType};
use serde_json::{json, Value};

const CARD_IMAGE: &str =
    "https://images.unsplash.com/photo-1498050108023-c5249f4df085?auto=format&fit=crop&w=400&q=80";
const AVATAR_IMAGE: &str = "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?auto=format&fit=facearea&facepad=2&w=100&h=100&q=80";
const LOGO_PLACEHOLDER: &str = "https://via.placeholder.com/120x60/eeeeee/999999?text=LOGO";

/// Number of cards a fresh `cards` section starts with
pub const DEFAULT_CARD_COUNT: usize = 3;

/// Spacing, shape, color-override and animation fields shared by every section
pub fn baseline_data() -> DataBag {
    DataBag::new()
        .with("py", "py-24")
        .with("px", "px-12")
        .with("radius", "rounded-none")
        .with("shadow", "shadow-none")
        .with("customBg", "")
        .with("customText", "")
        .with("maxWidth", "max-w-6xl")
        .with("animation", "none")
}

/// Default data bag for an element of `kind`
pub fn default_data_for(kind: &SectionKind) -> DataBag {
    match kind {
        SectionKind::Known(t) => default_data(*t),
        SectionKind::Unknown(_) => baseline_data(),
    }
}

/// Default data bag for a known section type
pub fn default_data(section: SectionType) -> DataBag {
    let mut data = baseline_data();
    data.extend(seeded_fields(section));
    data
}

fn repeat(value: Value, n: usize) -> Value {
    Value::Array(vec![value; n])
}

fn seeded_fields(section: SectionType) -> DataBag {
    let seeded = match section {
        SectionType::Navbar => json!({
            "logo": "DESIGNER",
            "links": [
                { "label": "Home", "href": "#" },
                { "label": "Features", "href": "#features" },
                { "label": "Pricing", "href": "#pricing" }
            ],
            "sticky": false,
            "py": "py-8"
        }),
        SectionType::Hero => json!({
            "heading": "Design something amazing",
            "subheading": "Your vision, powered by AI components.",
            "button": "Get Started",
            "buttonHref": "#",
            "align": "center",
            "py": "py-40"
        }),
        SectionType::RichText => json!({
            "heading": "Our Story",
            "body": "Start telling your story here.",
            "align": "left"
        }),
        SectionType::Text => json!({
            "content": "This is a text block.",
            "fontSize": "base",
            "align": "left",
            "py": "py-8"
        }),
        SectionType::Image => json!({
            "url": "",
            "height": 400,
            "caption": "Beautiful Image",
            "fullWidth": false
        }),
        SectionType::Cards => json!({
            "count": DEFAULT_CARD_COUNT,
            "titles": repeat(json!("Card Title"), DEFAULT_CARD_COUNT),
            "descriptions": repeat(json!("Card description text goes here."), DEFAULT_CARD_COUNT),
            "imageUrls": repeat(json!(CARD_IMAGE), DEFAULT_CARD_COUNT),
            "buttonLabel": "Learn More",
            "buttonHref": "#"
        }),
        SectionType::Testimonials => json!({
            "items": [{
                "name": "Alex Rivera",
                "role": "Founder",
                "quote": "This builder is game changing!",
                "imageUrl": AVATAR_IMAGE
            }]
        }),
        SectionType::Pricing => json!({
            "plans": [
                {
                    "name": "Base",
                    "price": "$0",
                    "features": ["Feature 1"],
                    "highlighted": false,
                    "buttonLabel": "Get Started",
                    "buttonHref": "#"
                },
                {
                    "name": "Pro",
                    "price": "$29",
                    "features": ["All Features", "Support"],
                    "highlighted": true,
                    "buttonLabel": "Go Pro",
                    "buttonHref": "#"
                }
            ]
        }),
        SectionType::Contact => json!({
            "heading": "Contact Us",
            "email": "hi@example.com",
            "phone": "+1 234 567 890",
            "address": "123 Studio St"
        }),
        SectionType::LogoGrid => json!({
            "logos": repeat(json!(LOGO_PLACEHOLDER), 4),
            "columns": 4
        }),
        SectionType::Video => json!({
            "heading": "Product Demo",
            "videoUrl": "https://www.youtube.com/embed/dQw4w9WgXcQ"
        }),
        SectionType::Buttons => json!({
            "buttons": [
                { "label": "Action 1", "href": "#" },
                { "label": "Action 2", "href": "#" }
            ],
            "align": "center",
            "py": "py-12"
        }),
        SectionType::Features => json!({
            "items": [{ "title": "Power", "description": "AI generated code" }],
            "columns": 3
        }),
        SectionType::FeaturesGrid => json!({
            "items": repeat(
                json!({ "title": "Feature Title", "description": "Description text goes here." }),
                4
            ),
            "columns": 2,
            "py": "py-24"
        }),
        SectionType::Stats => json!({
            "stats": [{ "label": "Users", "value": "1M+" }],
            "py": "py-16"
        }),
        SectionType::Cta => json!({
            "heading": "Ready?",
            "supportingText": "Join us today.",
            "button": "Sign Up",
            "buttonHref": "#",
            "py": "py-24"
        }),
        SectionType::Faq => json!({
            "items": [{ "question": "Is it fast?", "answer": "Yes, incredibly." }]
        }),
        SectionType::Divider => json!({
            "height": "md",
            "showLine": true,
            "py": "py-0"
        }),
        SectionType::Footer => json!({
            "text": "© 2025 UI Designer. All rights reserved.",
            "py": "py-12"
        }),
        SectionType::Timeline => json!({
            "items": [{ "title": "Step 1", "description": "Describe the first step." }],
            "py": "py-16"
        }),
    };

    DataBag::try_from(seeded).unwrap_or_default()
}
