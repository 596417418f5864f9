//! Notification behavior observed through the public API: event ordering,
//! suppression scopes, and reentrant subscribers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chem::{Molecule, ScalarField};
use pretty_assertions::assert_eq;
use scene_graph::prelude::*;

fn molecule(symbol: &str) -> Rc<Molecule> {
    Rc::new(Molecule::new(vec![symbol.into()], vec![[0.0; 3]]).unwrap())
}

fn field() -> Rc<ScalarField> {
    Rc::new(ScalarField::uniform([0.0; 3], 0.5, [2, 2, 2], vec![0.1; 8]).unwrap())
}

fn event_log(signals: &TreeSignals) -> Rc<RefCell<Vec<TreeEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    signals.subscribe(move |event| sink.borrow_mut().push(*event));
    log
}

#[test]
fn add_and_remove_event_ordering() {
    let mut scene = SceneManager::new();
    let log = event_log(scene.signals());

    let s = scene.add(molecule("C"), "methane", None).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![TreeEvent::NodeAdded(s), TreeEvent::StructureChanged]
    );

    log.borrow_mut().clear();
    scene.remove(s).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![TreeEvent::NodeRemoved(s), TreeEvent::StructureChanged]
    );
}

#[test]
fn events_arrive_after_the_domain_state_is_consistent() {
    // A subscriber reading shared domain state from its handler must see the
    // finished state of the mutation that triggered the event. The frame
    // list is observable mid-dispatch through the shared trajectory handle.
    let mut scene = SceneManager::new();
    let trajectory = Rc::new(chem::Trajectory::from_frames(vec![
        molecule("H"),
        molecule("He"),
    ]));
    let t = scene.add(Rc::clone(&trajectory), "path", None).unwrap();
    let f1 = scene.get(t).unwrap().children()[1];

    let observed = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&observed);
    let handle = Rc::clone(&trajectory);
    scene.signals().subscribe(move |event| {
        if matches!(event, TreeEvent::StructureChanged) {
            let symbols: Vec<String> = handle
                .frames()
                .iter()
                .map(|frame| frame.symbols()[0].clone())
                .collect();
            seen.borrow_mut().push(symbols);
        }
    });

    // Reorder He in front of H; at dispatch time the frame list must
    // already be reordered.
    scene.move_object(f1, t, Some(0)).unwrap();
    assert_eq!(*observed.borrow(), vec![vec!["He".to_string(), "H".to_string()]]);
}

#[test]
fn batch_scope_defers_to_single_structure_event() {
    let mut scene = SceneManager::new();
    let log = event_log(scene.signals());

    let batch = scene.signals().batch();
    let s = scene.add(molecule("C"), "methane", None).unwrap();
    scene.add_scalar_field(field(), "density", Some(s)).unwrap();
    scene.add(molecule("N"), "ammonia", None).unwrap();
    assert!(log.borrow().is_empty());
    drop(batch);

    assert_eq!(*log.borrow(), vec![TreeEvent::StructureChanged]);
}

#[test]
fn visibility_events_pass_through_a_batch() {
    let mut scene = SceneManager::new();
    let s = scene.add(molecule("C"), "methane", None).unwrap();
    let log = event_log(scene.signals());

    let batch = scene.signals().batch();
    scene.set_visibility(s, false);
    drop(batch);

    assert_eq!(
        *log.borrow(),
        vec![
            TreeEvent::VisibilityChanged(s, false),
            TreeEvent::NodeChanged(s)
        ]
    );
}

#[test]
fn handler_mutating_a_tree_on_the_same_channel() {
    // Two trees share one channel. A handler reacting to the first tree's
    // StructureChanged mutates the second tree from inside its handler; the
    // nested mutation completes and notifies normally, queued behind the
    // event being dispatched rather than dispatched recursively.
    let mut tree_a: Tree<i32> = Tree::new("a");
    let signals = tree_a.signals().clone();
    let tree_b: Rc<RefCell<Tree<i32>>> =
        Rc::new(RefCell::new(Tree::<i32>::new("b").with_signals(signals.clone())));

    let mirror = Rc::clone(&tree_b);
    let fired = Cell::new(false);
    signals.subscribe(move |event| {
        if matches!(event, TreeEvent::StructureChanged) && !fired.replace(true) {
            let mut tree_b = mirror.borrow_mut();
            let root = tree_b.root_id();
            tree_b
                .add_child(root, Node::new("echo", NodeKind::Molecule, 1), None)
                .unwrap();
        }
    });
    let log = event_log(&signals);

    let added = tree_a
        .add_child(tree_a.root_id(), Node::new("x", NodeKind::Molecule, 0), None)
        .unwrap();

    let tree_b = tree_b.borrow();
    let echoed = tree_b.find_by_name("echo").expect("nested mutation applied");

    assert_eq!(
        *log.borrow(),
        vec![
            TreeEvent::NodeAdded(added),
            TreeEvent::StructureChanged,
            TreeEvent::NodeAdded(echoed.id()),
            TreeEvent::StructureChanged,
        ]
    );
}

#[test]
fn handler_unsubscribing_another_mid_dispatch() {
    let signals = TreeSignals::new();
    let token_slot: Rc<Cell<Option<Subscription>>> = Rc::new(Cell::new(None));

    let channel = signals.clone();
    let slot = Rc::clone(&token_slot);
    signals.subscribe(move |_| {
        if let Some(token) = slot.take() {
            channel.unsubscribe(token);
        }
    });

    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let victim = signals.subscribe(move |_| seen.set(seen.get() + 1));
    token_slot.set(Some(victim));

    // The first handler removes the second before it runs.
    signals.emit(TreeEvent::StructureChanged);
    assert_eq!(count.get(), 0);
    assert_eq!(signals.subscriber_count(), 1);
}
