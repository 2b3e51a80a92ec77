//! Layout engine benchmarks
//!
//! Target: single edit on a 200-element layout in well under 1ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecraft_common::IdGenerator;
use pagecraft_editor::{
    add_element, move_down, reorder, update_element_data, Document, EditorSession, Layout,
};
use pagecraft_registry::{DataBag, SectionType};

fn build_layout(size: usize) -> Layout {
    let mut ids = IdGenerator::new();
    let mut layout = Layout::new();
    for i in 0..size {
        let section = SectionType::ALL[i % SectionType::ALL.len()];
        layout = add_element(&layout, section.into(), &mut ids).layout;
    }
    layout
}

fn update_middle_element(c: &mut Criterion) {
    let layout = build_layout(200);
    let id = layout.at(100).unwrap().id().clone();
    let data = DataBag::new().with("heading", "Updated");

    c.bench_function("update_element_data_200", |b| {
        b.iter(|| update_element_data(black_box(&layout), &id, data.clone()))
    });
}

fn move_and_reorder(c: &mut Criterion) {
    let layout = build_layout(200);
    let id = layout.at(0).unwrap().id().clone();
    let last = layout.at(199).unwrap().id().clone();

    c.bench_function("move_down_200", |b| {
        b.iter(|| move_down(black_box(&layout), &id))
    });

    c.bench_function("reorder_first_to_last_200", |b| {
        b.iter(|| reorder(black_box(&layout), &id, &last))
    });
}

fn switch_pages(c: &mut Criterion) {
    let mut session = EditorSession::new(Document::new("Bench"));
    for _ in 0..50 {
        session.add_element(SectionType::Hero);
    }
    let second = session.add_page().unwrap();
    for _ in 0..50 {
        session.add_element(SectionType::Cards);
    }
    let home = session.document().pages()[0].id.clone();

    c.bench_function("switch_page_round_trip", |b| {
        b.iter(|| {
            let doc = session.document().switch_page(black_box(&home)).document;
            doc.switch_page(&second)
        })
    });
}

criterion_group!(benches, update_middle_element, move_and_reorder, switch_pages);
criterion_main!(benches);
