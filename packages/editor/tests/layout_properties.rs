//! Layout engine properties over arbitrary operation sequences

use pagecraft_common::IdGenerator;
use pagecraft_editor::{
    add_element, duplicate_element, move_down, move_up, remove_element, reorder, Edit, ElementId,
    Layout,
};
use pagecraft_registry::SectionType;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    Duplicate(usize),
    MoveUp(usize),
    MoveDown(usize),
    Reorder(usize, usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..SectionType::ALL.len()).prop_map(Op::Add),
        any::<usize>().prop_map(Op::Remove),
        any::<usize>().prop_map(Op::Duplicate),
        any::<usize>().prop_map(Op::MoveUp),
        any::<usize>().prop_map(Op::MoveDown),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Reorder(a, b)),
    ]
}

/// Id at `pick % (len + 1)`; the extra slot yields an id that is not present
fn pick(layout: &Layout, pick: usize) -> ElementId {
    let slot = pick % (layout.len() + 1);
    layout
        .at(slot)
        .map(|e| e.id().clone())
        .unwrap_or_else(|| ElementId::new("missing"))
}

fn run(layout: &Layout, op: &Op, ids: &mut IdGenerator) -> Edit {
    match op {
        Op::Add(t) => add_element(layout, SectionType::ALL[*t].into(), ids),
        Op::Remove(i) => remove_element(layout, &pick(layout, *i)),
        Op::Duplicate(i) => duplicate_element(layout, &pick(layout, *i), ids),
        Op::MoveUp(i) => move_up(layout, &pick(layout, *i)),
        Op::MoveDown(i) => move_down(layout, &pick(layout, *i)),
        Op::Reorder(a, b) => reorder(layout, &pick(layout, *a), &pick(layout, *b)),
    }
}

proptest! {
    #[test]
    fn ids_stay_unique(ops in prop::collection::vec(arb_op(), 0..60)) {
        // a frozen clock forces every id through the collision path
        let mut ids = IdGenerator::with_clock(|| 1_700_000_000_000);
        let mut layout = Layout::new();

        for op in &ops {
            layout = run(&layout, op, &mut ids).layout;
            let unique: HashSet<_> = layout.ids().into_iter().collect();
            prop_assert_eq!(unique.len(), layout.len());
        }
    }

    #[test]
    fn noops_return_input_unchanged(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut ids = IdGenerator::with_clock(|| 1_700_000_000_000);
        let mut layout = Layout::new();

        for op in &ops {
            let edit = run(&layout, op, &mut ids);
            if !edit.is_applied() {
                prop_assert_eq!(&edit.layout, &layout);
            }
            layout = edit.layout;
        }
    }

    #[test]
    fn untouched_elements_keep_their_data(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut ids = IdGenerator::new();
        let mut layout = Layout::new();

        for op in &ops {
            let next = run(&layout, op, &mut ids).layout;
            for element in next.iter() {
                if let Some(before) = layout.get(element.id()) {
                    prop_assert_eq!(before, element);
                }
            }
            layout = next;
        }
    }
}
