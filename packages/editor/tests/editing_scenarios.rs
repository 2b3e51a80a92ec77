//! End-to-end editing scenarios against the public API

use pagecraft_common::IdGenerator;
use pagecraft_editor::{
    add_element, duplicate_element, move_down, resolve, Activation, Document, EditorSession,
    Element, Layout, LinkRef, NoopReason, Outcome, Page, PageId,
};
use pagecraft_registry::{DataBag, SectionKind, SectionType};
use serde_json::json;

fn session() -> EditorSession {
    EditorSession::with_ids(Document::new("Site"), IdGenerator::new())
}

#[test]
fn test_internal_button_link_switches_page() {
    let pages = vec![Page::named("home", "Home"), Page::named("page-2", "About")];
    let hero = Element::new(
        "hero-1",
        SectionType::Hero,
        DataBag::new().with("buttonHref", json!({ "kind": "internal", "pageId": "page-2" })),
    );
    let link: LinkRef = serde_json::from_value(hero.data().get("buttonHref").unwrap().clone()).unwrap();

    let resolved = resolve(&link, &pages);
    assert_eq!(resolved.href, "/about");
    assert_eq!(resolved.activation, Activation::SwitchPage(PageId::new("page-2")));
}

#[test]
fn test_add_hero_to_empty_layout() {
    let mut ids = IdGenerator::new();
    let edit = add_element(&Layout::new(), SectionType::Hero.into(), &mut ids);

    assert_eq!(edit.layout.len(), 1);
    let hero = edit.layout.at(0).unwrap();
    assert_eq!(hero.kind(), &SectionKind::Known(SectionType::Hero));
    for key in ["heading", "subheading", "button", "buttonHref"] {
        assert!(hero.data().contains_key(key), "missing {}", key);
    }
    assert_eq!(hero.data().get_str("align"), Some("center"));
}

#[test]
fn test_move_down_last_of_three_is_identity() {
    let mut ids = IdGenerator::new();
    let mut layout = Layout::new();
    for t in [SectionType::Navbar, SectionType::Hero, SectionType::Footer] {
        layout = add_element(&layout, t.into(), &mut ids).layout;
    }
    let last = layout.at(2).unwrap().id().clone();

    let edit = move_down(&layout, &last);
    assert!(!edit.is_applied());
    assert_eq!(edit.layout.ids(), layout.ids());
}

#[test]
fn test_duplicate_places_copy_after_source() {
    let mut ids = IdGenerator::new();
    let mut layout = Layout::new();
    for t in [SectionType::Hero, SectionType::Pricing, SectionType::Footer] {
        layout = add_element(&layout, t.into(), &mut ids).layout;
    }
    let source = layout.at(1).unwrap().clone();

    let edit = duplicate_element(&layout, source.id(), &mut ids);
    let copy = edit.layout.at(2).unwrap();
    assert_eq!(copy.kind(), source.kind());
    assert_eq!(copy.data(), source.data());
    assert_ne!(copy.id(), source.id());
    assert_eq!(edit.layout.at(1).unwrap(), &source);
}

#[test]
fn test_page_round_trip_keeps_layout() {
    let mut s = session();
    s.add_element(SectionType::Hero);
    s.add_element(SectionType::Text);
    let home = s.document().active_page_id().clone();
    let before = s.document().layout().clone();

    let other = s.add_page().unwrap();
    s.add_element(SectionType::Cards);
    s.switch_page(&home);
    assert_eq!(s.document().layout(), &before);

    s.switch_page(&other);
    assert_eq!(s.document().layout().len(), 1);
}

#[test]
fn test_only_page_cannot_be_deleted() {
    let mut s = session();
    let home = s.document().active_page_id().clone();
    assert_eq!(s.delete_page(&home), Outcome::Noop(NoopReason::LastPage));
    assert_eq!(s.document().pages().len(), 1);
}

#[test]
fn test_home_rename_routes_to_root() {
    let mut s = session();
    let page = s.add_page().unwrap();
    for name in ["Home", "HOME", "home"] {
        s.rename_page(&page, name);
        assert_eq!(s.document().page(&page).unwrap().route, "/");
    }
    s.rename_page(&page, "Contact Us");
    assert_eq!(s.document().page(&page).unwrap().route, "/contact-us");
}

#[test]
fn test_link_to_deleted_page_degrades() {
    let mut s = session();
    let about = s.add_page().unwrap();
    let link = LinkRef::internal(about.clone());
    s.delete_page(&about);

    let resolved = s.resolve_link(&link);
    assert_eq!(resolved.href, "#");
    assert_eq!(resolved.activation, Activation::Suppressed);
    assert!(!s.activate_link(&link));
}

#[test]
fn test_duplicate_routes_are_accepted() {
    let mut s = session();
    let a = s.add_page().unwrap();
    let b = s.add_page().unwrap();
    s.rename_page(&a, "Blog");
    assert!(s.rename_page(&b, "blog").is_applied());

    let routes: Vec<_> = s.document().pages().iter().map(|p| p.route.as_str()).collect();
    assert_eq!(routes.iter().filter(|r| **r == "/blog").count(), 2);
}

#[test]
fn test_save_payload_shape() {
    let mut s = session();
    s.add_element(SectionType::Hero);
    s.add_page();
    let snapshot = s.prepare_save();

    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("activePageId").is_some());
    assert_eq!(json["pages"].as_array().unwrap().len(), 2);
    assert_eq!(json["layout"], json["pages"][1]["layout"]);
    assert_eq!(json["pages"][0]["layout"][0]["type"], "hero");
}
