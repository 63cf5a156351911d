use pretty_assertions::assert_eq;

use heft_model::{Heap, HeapLayout};

use super::*;

// ── Alignment ───────────────────────────────────────────────────

#[test]
fn align8_rounds_up() {
    assert_eq!(align8(0), 0);
    assert_eq!(align8(1), 8);
    assert_eq!(align8(7), 8);
    assert_eq!(align8(8), 8);
    assert_eq!(align8(9), 16);
    assert_eq!(align8(20), 24);
}

// ── Class sizes ─────────────────────────────────────────────────

#[test]
fn bare_object_is_overhead_only() {
    let heap = Heap::default();
    let mut sizer = LayoutSizeVisitor::new(PlatformProfile::LP64);
    let desc = heap.types().descriptor(TypeIdx::OBJECT).unwrap();

    assert_eq!(sizer.shallow_size(&desc), 16);
}

#[test]
fn field_widths_are_summed_then_aligned() {
    let mut heap = Heap::default();
    let mixed = heap
        .register_class(
            "Mixed",
            None,
            &[
                ("b", TypeIdx::BYTE),
                ("z", TypeIdx::BOOLEAN),
                ("s", TypeIdx::SHORT),
                ("c", TypeIdx::CHAR),
                ("i", TypeIdx::INT),
                ("f", TypeIdx::FLOAT),
                ("j", TypeIdx::LONG),
                ("d", TypeIdx::DOUBLE),
                ("r", TypeIdx::OBJECT),
            ],
        )
        .unwrap();
    let desc = heap.types().descriptor(mixed).unwrap();

    // 1 + 1 + 2 + 2 + 4 + 4 + 8 + 8 = 30 primitive bytes
    let mut lp64 = LayoutSizeVisitor::new(PlatformProfile::LP64);
    assert_eq!(lp64.shallow_size(&desc), align8(16 + 30 + 8));
    let mut ilp32 = LayoutSizeVisitor::new(PlatformProfile::ILP32);
    assert_eq!(ilp32.shallow_size(&desc), align8(8 + 30 + 4));
}

#[test]
fn inherited_fields_are_counted() {
    let mut heap = Heap::default();
    let base = heap
        .register_class("Base", None, &[("a", TypeIdx::LONG)])
        .unwrap();
    let derived = heap
        .register_class("Derived", Some(base), &[("b", TypeIdx::INT)])
        .unwrap();
    let desc = heap.types().descriptor(derived).unwrap();

    let mut sizer = LayoutSizeVisitor::new(PlatformProfile::LP64);
    // 16 + 8 + 4 = 28 -> 32
    assert_eq!(sizer.shallow_size(&desc), 32);
}

#[test]
fn custom_overhead_is_used() {
    let heap = Heap::default();
    let desc = heap.types().descriptor(TypeIdx::INTEGER).unwrap();
    let mut sizer = LayoutSizeVisitor::new(PlatformProfile::LP64.with_object_overhead(12));

    // 12 + 4
    assert_eq!(sizer.shallow_size(&desc), 16);
}

// ── Cache ───────────────────────────────────────────────────────

#[test]
fn shallow_size_is_idempotent_and_cached_once() {
    let heap = Heap::default();
    let desc = heap.types().descriptor(TypeIdx::STRING).unwrap();
    let mut sizer = LayoutSizeVisitor::new(PlatformProfile::LP64);

    let first = sizer.shallow_size(&desc);
    let second = sizer.shallow_size(&desc);
    assert_eq!(first, second);
    assert_eq!(sizer.cached_types(), 1);
}

#[test]
fn arrays_are_never_cached() {
    let mut heap = Heap::default();
    let short = heap.new_array(TypeIdx::INT, 1).unwrap();
    let long = heap.new_array(TypeIdx::INT, 100).unwrap();
    let mut sizer = LayoutSizeVisitor::new(PlatformProfile::LP64);

    sizer.visit(&heap, &heap.describe(short).unwrap(), short).unwrap();
    sizer.visit(&heap, &heap.describe(long).unwrap(), long).unwrap();
    assert_eq!(sizer.cached_types(), 0);
    // 16 + 8 + 4 = 28 -> 32, then 16 + 8 + 400 = 424
    assert_eq!(sizer.total(), 32 + 424);
}

// ── Arrays ──────────────────────────────────────────────────────

#[test]
fn empty_array_is_header_plus_length() {
    let sizer = LayoutSizeVisitor::new(PlatformProfile::LP64);
    assert_eq!(sizer.array_size(TypeIdx::CHAR, 0), 24);
    assert_eq!(sizer.array_size(TypeIdx::OBJECT, 0), 24);

    let sizer = LayoutSizeVisitor::new(PlatformProfile::ILP32);
    assert_eq!(sizer.array_size(TypeIdx::CHAR, 0), 16);
}

#[test]
fn reference_elements_use_reference_width() {
    let sizer = LayoutSizeVisitor::new(PlatformProfile::ILP32);
    // 8 + 4 + 3 * 4 = 24
    assert_eq!(sizer.array_size(TypeIdx::STRING, 3), 24);
}

#[test]
fn shallow_size_of_array_type_is_empty_array() {
    let mut heap = Heap::default();
    let ints = heap.types_mut().array_of(TypeIdx::INT).unwrap();
    let desc = heap.types().descriptor(ints).unwrap();
    let mut sizer = LayoutSizeVisitor::new(PlatformProfile::LP64);

    assert_eq!(sizer.shallow_size(&desc), 24);
    assert_eq!(sizer.cached_types(), 0);
}

// ── Visiting ────────────────────────────────────────────────────

#[test]
fn visit_accumulates_and_never_prunes() {
    let mut heap = Heap::new(HeapLayout::LP64);
    let boxed = heap.box_int(9);
    let bare = heap.new_object();
    let mut sizer = LayoutSizeVisitor::default();

    let a = sizer.visit(&heap, &heap.describe(boxed).unwrap(), boxed).unwrap();
    let b = sizer.visit(&heap, &heap.describe(bare).unwrap(), bare).unwrap();
    assert_eq!((a, b), (VisitAction::Continue, VisitAction::Continue));
    assert_eq!(sizer.total(), 24 + 16);
}
