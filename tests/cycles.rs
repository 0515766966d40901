#![cfg(feature = "macros")]

use std::{
    sync::{Arc, Mutex, Weak, mpsc},
    time::Duration,
};

use structview::{
    Action, Config, Error, Explore, Explorer, Instruction, ObjectAccess, Roots, Snapshot, resolve,
};

#[derive(Explore)]
struct Node {
    name: String,
    parent: Weak<Mutex<Node>>,
    children: Vec<Arc<Mutex<Node>>>,
}

fn node(name: &str, parent: Weak<Mutex<Node>>) -> Node {
    Node {
        name: name.into(),
        parent,
        children: Vec::new(),
    }
}

/// Takes a snapshot on another thread, failing instead of hanging.
fn snapshot(explorer: &Explorer) -> Snapshot {
    let (tx, rx) = mpsc::channel();
    let explorer = explorer.clone();
    std::thread::spawn(move || {
        let _ = tx.send(explorer.snapshot());
    });
    rx.recv_timeout(Duration::from_secs(5))
        .expect("snapshot did not complete")
}

fn field<'a>(snapshot: &'a Snapshot, row: usize, column: usize, key: &str) -> &'a str {
    let cell = snapshot.cell(row, column).unwrap();
    &cell.fields.iter().find(|f| f.key == key).unwrap().value
}

#[test]
fn test_self_cycle_through_mutex() {
    let root = Arc::new_cyclic(|me| Mutex::new(node("root", me.clone())));
    let explorer = Explorer::default();
    explorer.register_shared("node", root.clone()).unwrap();

    let first = snapshot(&explorer);
    let cell = first.cell(0, 0).unwrap();
    assert!(!cell.is_error());
    assert_eq!(cell.type_name, "Node");
    assert_eq!(field(&first, 0, 0, "name"), "\"root\"");
    assert_eq!(field(&first, 0, 0, "parent"), "nil");

    // The parent is the cell itself, there is nothing new to expand.
    let nav = explorer
        .apply(&Instruction::new(0, 0, Action::Right).with_selections(["parent", "children"]))
        .unwrap();
    assert_eq!(nav.placed.len(), 1);
    assert!(matches!(nav.skipped[0].error, Error::NotExplorable { .. }));

    // Every lock was released: the value is still usable and explorable.
    root.lock().unwrap().name = "renamed".into();
    assert_eq!(field(&snapshot(&explorer), 0, 0, "name"), "\"renamed\"");
}

#[test]
fn test_tree_with_parent_pointers() {
    let root = Arc::new(Mutex::new(node("root", Weak::new())));
    let leaf = Arc::new(Mutex::new(node("leaf", Arc::downgrade(&root))));
    root.lock().unwrap().children.push(leaf.clone());

    let explorer = Explorer::default();
    explorer.register_shared("tree", root.clone()).unwrap();
    explorer.register_shared("leaf", leaf.clone()).unwrap();

    explorer
        .apply(&Instruction::new(0, 0, Action::Right).with_selections(["children"]))
        .unwrap();
    explorer
        .apply(&Instruction::new(0, 1, Action::Right).with_selections(["0"]))
        .unwrap();
    let nav = explorer
        .apply(&Instruction::new(1, 0, Action::Right).with_selections(["parent"]))
        .unwrap();
    assert_eq!(nav.placed.len(), 1);
    assert_eq!((nav.placed[0].row, nav.placed[0].column), (1, 1));

    let snapshot = snapshot(&explorer);
    assert!(snapshot.occupied().all(|cell| !cell.is_error()));

    // Reached from the root, the leaf's parent is the locked root itself.
    assert_eq!(snapshot.cell(0, 2).unwrap().path, "children.0");
    assert_eq!(field(&snapshot, 0, 2, "name"), "\"leaf\"");
    assert_eq!(field(&snapshot, 0, 2, "parent"), "nil");

    // Reached from the leaf, the parent is a regular value.
    assert_eq!(field(&snapshot, 1, 0, "parent"), "{..}");
    assert_eq!(field(&snapshot, 1, 1, "name"), "\"root\"");
    assert_eq!(field(&snapshot, 1, 1, "children"), "[1 items]");
    assert!(snapshot.cell(1, 1).unwrap().has_nils);
}

#[test]
fn test_reference_chain_longer_than_max_depth() {
    let chain = Some(Some(Some(vec![1u8])));

    let mut roots = Roots::new();
    roots.insert("chain", Arc::new(chain.clone())).unwrap();
    let access = ObjectAccess::for_root("chain").child("0");

    let shallow = Config::default().with_max_depth(2);
    let err = resolve(&roots, &access, &shallow, |v| v.render()).unwrap_err();
    assert!(matches!(err, Error::PathTooDeep { limit: 2, ref path } if path == "chain"));

    let deep = Config::default().with_max_depth(4);
    assert_eq!(resolve(&roots, &access, &deep, |v| v.render()).unwrap(), "1");

    let explorer = Explorer::new(shallow).with_root("chain", chain).unwrap();
    let nav = explorer
        .apply(&Instruction::new(0, 0, Action::Down).with_selections(["0"]))
        .unwrap();
    assert!(nav.placed.is_empty());
    assert!(matches!(nav.skipped[0].error, Error::PathTooDeep { .. }));
}
