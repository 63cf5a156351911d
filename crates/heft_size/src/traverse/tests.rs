use pretty_assertions::assert_eq;

use heft_model::{Heap, TypeDescriptor, TypeIdx, Value};

use super::*;

/// Records visit order; returns `Skip` for objects listed in `prune`.
#[derive(Default)]
struct Recorder {
    seen: Vec<ObjRef>,
    prune: Vec<ObjRef>,
}

impl ObjectVisitor for Recorder {
    fn visit(
        &mut self,
        _graph: &dyn ObjectGraph,
        _desc: &TypeDescriptor<'_>,
        obj: ObjRef,
    ) -> Result<VisitAction, SizeError> {
        self.seen.push(obj);
        if self.prune.contains(&obj) {
            Ok(VisitAction::Skip)
        } else {
            Ok(VisitAction::Continue)
        }
    }
}

/// Fails on the n-th visit.
struct FailAfter(usize);

impl ObjectVisitor for FailAfter {
    fn visit(
        &mut self,
        _graph: &dyn ObjectGraph,
        _desc: &TypeDescriptor<'_>,
        _obj: ObjRef,
    ) -> Result<VisitAction, SizeError> {
        if self.0 == 0 {
            return Err(SizeError::InstrumentationUnavailable);
        }
        self.0 -= 1;
        Ok(VisitAction::Continue)
    }
}

/// `Pair { left: Object, right: Object, tag: int }`
fn pair_class(heap: &mut Heap) -> TypeIdx {
    heap.register_class(
        "Pair",
        None,
        &[
            ("left", TypeIdx::OBJECT),
            ("tag", TypeIdx::INT),
            ("right", TypeIdx::OBJECT),
        ],
    )
    .unwrap()
}

fn pair(heap: &mut Heap, class: TypeIdx, left: Option<ObjRef>, right: Option<ObjRef>) -> ObjRef {
    let obj = heap.new_instance(class).unwrap();
    heap.set_field(obj, "left", Value::Ref(left)).unwrap();
    heap.set_field(obj, "right", Value::Ref(right)).unwrap();
    obj
}

// ── Basics ──────────────────────────────────────────────────────

#[test]
fn null_root_is_noop() {
    let heap = Heap::default();
    let mut traverser = GraphTraverser::new(&heap);
    let mut rec = Recorder::default();

    traverser.traverse(&mut rec, None).unwrap();
    assert!(rec.seen.is_empty());
    assert_eq!(traverser.visited_count(), 0);
}

#[test]
fn depth_first_in_field_order() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let a = heap.new_object();
    let b = heap.new_object();
    let c = heap.new_object();
    let inner = pair(&mut heap, class, Some(b), Some(c));
    let root = pair(&mut heap, class, Some(inner), Some(a));

    let mut rec = Recorder::default();
    GraphTraverser::new(&heap)
        .traverse(&mut rec, Some(root))
        .unwrap();
    assert_eq!(rec.seen, vec![root, inner, b, c, a]);
}

#[test]
fn shared_child_is_visited_once() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let shared = heap.new_object();
    let left = pair(&mut heap, class, Some(shared), None);
    let right = pair(&mut heap, class, Some(shared), None);
    let root = pair(&mut heap, class, Some(left), Some(right));

    let mut rec = Recorder::default();
    let mut traverser = GraphTraverser::new(&heap);
    traverser.traverse(&mut rec, Some(root)).unwrap();
    assert_eq!(rec.seen, vec![root, left, shared, right]);
    assert_eq!(traverser.visited_count(), 4);
}

#[test]
fn equal_but_distinct_objects_are_both_visited() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let one = heap.box_int(1);
    let other_one = heap.box_int(1);
    let root = pair(&mut heap, class, Some(one), Some(other_one));

    let mut rec = Recorder::default();
    GraphTraverser::new(&heap)
        .traverse(&mut rec, Some(root))
        .unwrap();
    assert_eq!(rec.seen.len(), 3);
}

// ── Cycles ──────────────────────────────────────────────────────

#[test]
fn self_reference_terminates() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let node = pair(&mut heap, class, None, None);
    heap.set_field(node, "left", node.into()).unwrap();
    heap.set_field(node, "right", node.into()).unwrap();

    let mut rec = Recorder::default();
    GraphTraverser::new(&heap)
        .traverse(&mut rec, Some(node))
        .unwrap();
    assert_eq!(rec.seen, vec![node]);
}

#[test]
fn two_node_cycle_terminates() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let a = pair(&mut heap, class, None, None);
    let b = pair(&mut heap, class, Some(a), None);
    heap.set_field(a, "left", b.into()).unwrap();

    let mut rec = Recorder::default();
    GraphTraverser::new(&heap)
        .traverse(&mut rec, Some(a))
        .unwrap();
    assert_eq!(rec.seen, vec![a, b]);
}

#[test]
fn array_containing_itself_terminates() {
    let mut heap = Heap::default();
    let arr = heap.new_array(TypeIdx::OBJECT, 2).unwrap();
    heap.set_element(arr, 0, arr.into()).unwrap();
    heap.set_element(arr, 1, arr.into()).unwrap();

    let mut rec = Recorder::default();
    GraphTraverser::new(&heap)
        .traverse(&mut rec, Some(arr))
        .unwrap();
    assert_eq!(rec.seen, vec![arr]);
}

// ── Pruning ─────────────────────────────────────────────────────

#[test]
fn skip_prunes_fields_but_counts_object() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let hidden = heap.new_object();
    let pruned = pair(&mut heap, class, Some(hidden), None);
    let kept = heap.new_object();
    let root = pair(&mut heap, class, Some(pruned), Some(kept));

    let mut rec = Recorder {
        prune: vec![pruned],
        ..Recorder::default()
    };
    let mut traverser = GraphTraverser::new(&heap);
    traverser.traverse(&mut rec, Some(root)).unwrap();
    assert_eq!(rec.seen, vec![root, pruned, kept]);
    assert!(!traverser.is_visited(hidden));
}

#[test]
fn skip_does_not_prune_array_elements() {
    let mut heap = Heap::default();
    let a = heap.new_object();
    let b = heap.new_object();
    let arr = heap
        .new_array_from(TypeIdx::OBJECT, &[a.into(), Value::NULL, b.into()])
        .unwrap();

    let mut rec = Recorder {
        prune: vec![arr],
        ..Recorder::default()
    };
    GraphTraverser::new(&heap)
        .traverse(&mut rec, Some(arr))
        .unwrap();
    assert_eq!(rec.seen, vec![arr, a, b]);
}

#[test]
fn primitive_array_has_no_children() {
    let mut heap = Heap::default();
    let arr = heap.new_array(TypeIdx::LONG, 16).unwrap();

    let mut rec = Recorder::default();
    GraphTraverser::new(&heap)
        .traverse(&mut rec, Some(arr))
        .unwrap();
    assert_eq!(rec.seen, vec![arr]);
}

// ── Visited set lifetime ────────────────────────────────────────

#[test]
fn visited_set_persists_across_calls() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let shared = heap.new_object();
    let first = pair(&mut heap, class, Some(shared), None);
    let fresh = heap.new_object();
    let second = pair(&mut heap, class, Some(shared), Some(fresh));

    let mut traverser = GraphTraverser::new(&heap);
    let mut before = Recorder::default();
    traverser.traverse(&mut before, Some(first)).unwrap();
    let mut after = Recorder::default();
    traverser.traverse(&mut after, Some(second)).unwrap();

    assert_eq!(before.seen, vec![first, shared]);
    assert_eq!(after.seen, vec![second, fresh]);

    // Walking an already-seen root again offers nothing.
    let mut again = Recorder::default();
    traverser.traverse(&mut again, Some(first)).unwrap();
    assert!(again.seen.is_empty());
    assert_eq!(traverser.visited_count(), 4);
}

// ── Errors and depth ────────────────────────────────────────────

#[test]
fn visitor_error_propagates_unchanged() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let leaf = heap.new_object();
    let root = pair(&mut heap, class, Some(leaf), None);

    let mut traverser = GraphTraverser::new(&heap);
    let result = traverser.traverse(&mut FailAfter(1), Some(root));
    assert_eq!(result, Err(SizeError::InstrumentationUnavailable));
    assert!(traverser.is_visited(root));
}

#[test]
fn unknown_root_is_an_error() {
    let mut other = Heap::default();
    let foreign = other.new_object();
    let heap = Heap::default();

    let mut rec = Recorder::default();
    let mut traverser = GraphTraverser::new(&heap);
    let result = traverser.traverse(&mut rec, Some(foreign));
    assert_eq!(result, Err(SizeError::InvalidObject(foreign)));
    assert!(rec.seen.is_empty());
    assert!(!traverser.is_visited(foreign));
}

#[test]
fn deep_chain_does_not_overflow() {
    let mut heap = Heap::default();
    let class = pair_class(&mut heap);
    let mut head = None;
    for _ in 0..100_000 {
        head = Some(pair(&mut heap, class, head, None));
    }

    let mut traverser = GraphTraverser::new(&heap);
    traverser.traverse(&mut Recorder::default(), head).unwrap();
    assert_eq!(traverser.visited_count(), 100_000);
}
