//! Error taxonomy: cycles, mismatches, unknown keys, depth.

use std::sync::{Arc, OnceLock};

use ojson::bind::BindError;
use ojson::{Engine, reflect_struct};

reflect_struct! {
    #[derive(Debug, Default)]
    pub struct GraphNode {
        pub name: String,
        pub next: OnceLock<Arc<GraphNode>>,
    }
}

#[test]
fn self_reference_is_a_cycle_with_a_path() {
    let engine = Engine::builder().register_type::<GraphNode>().build();

    let node = Arc::new(GraphNode {
        name: "a".to_string(),
        next: OnceLock::new(),
    });
    node.next.set(node.clone()).ok();

    let error = engine.to_node(&*node).unwrap_err();
    let BindError::Cycle { path, .. } = &error else {
        panic!("expected a cycle, got {error}");
    };
    assert!(path.len() >= 1);
    assert_eq!(path.to_string(), "$.next");
}

#[test]
fn two_node_loops_are_caught_too() {
    let engine = Engine::builder().register_type::<GraphNode>().build();

    let a = Arc::new(GraphNode {
        name: "a".to_string(),
        next: OnceLock::new(),
    });
    let b = Arc::new(GraphNode {
        name: "b".to_string(),
        next: OnceLock::new(),
    });
    a.next.set(b.clone()).ok();
    b.next.set(a.clone()).ok();

    let error = engine.to_node(&*a).unwrap_err();
    let BindError::Cycle { path, .. } = &error else {
        panic!("expected a cycle, got {error}");
    };
    assert_eq!(path.to_string(), "$.next.next");
}

#[test]
fn acyclic_sharing_is_not_a_cycle() {
    let engine = Engine::builder().register_type::<GraphNode>().build();

    let shared = Arc::new(GraphNode {
        name: "leaf".to_string(),
        next: OnceLock::new(),
    });
    let root = GraphNode {
        name: "root".to_string(),
        next: OnceLock::new(),
    };
    root.next.set(shared.clone()).ok();

    // The shared node is reachable once from this root; a diamond would also
    // be fine since the guard tracks ancestors, not visits.
    assert!(engine.to_node(&root).is_ok());
}

// -----------------------------------------------------------------------------
// Shape mismatches

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Batch {
        pub items: Vec<u32>,
    }
}

#[test]
fn mismatches_carry_the_full_path() {
    let engine = Engine::builder().register_type::<Batch>().build();

    let error = ojson::from_str::<Batch>(&engine, r#"{"items":[1,"x",3]}"#).unwrap_err();
    let BindError::TypeMismatch { path, .. } = &error else {
        panic!("expected a mismatch, got {error}");
    };
    assert_eq!(path.to_string(), "$.items[1]");
}

#[test]
fn wrong_document_shape_is_a_mismatch() {
    let engine = Engine::builder().register_type::<Batch>().build();

    let error = ojson::from_str::<Batch>(&engine, r#"{"items":{"nope":1}}"#).unwrap_err();
    assert!(matches!(error, BindError::TypeMismatch { .. }));

    let error = ojson::from_str::<Batch>(&engine, "[1,2]").unwrap_err();
    assert!(matches!(error, BindError::TypeMismatch { .. }));
}

#[test]
fn out_of_range_numbers_do_not_truncate() {
    reflect_struct! {
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct Tiny {
            pub value: u8,
        }
    }

    let engine = Engine::builder().register_type::<Tiny>().build();
    let error = ojson::from_str::<Tiny>(&engine, r#"{"value":300}"#).unwrap_err();
    assert!(matches!(error, BindError::TypeMismatch { .. }));

    let error = ojson::from_str::<Tiny>(&engine, r#"{"value":-1}"#).unwrap_err();
    assert!(matches!(error, BindError::TypeMismatch { .. }));
}

// -----------------------------------------------------------------------------
// Unknown keys under the strict policy

#[test]
fn strict_mode_escalates_unknown_keys() {
    let engine = Engine::builder()
        .register_type::<Batch>()
        .strict_unknown_fields(true)
        .build();

    let error = ojson::from_str::<Batch>(&engine, r#"{"items":[],"extra":1}"#).unwrap_err();
    let BindError::UnknownField { key, .. } = &error else {
        panic!("expected an unknown-field error, got {error}");
    };
    assert_eq!(key, "extra");
}

// -----------------------------------------------------------------------------
// Depth ceiling

reflect_struct! {
    #[derive(Debug, Default)]
    pub struct Link {
        pub next: Option<Box<Link>>,
    }
}

fn chain(length: usize) -> Link {
    let mut head = Link { next: None };
    for _ in 0..length {
        head = Link {
            next: Some(Box::new(head)),
        };
    }
    head
}

#[test]
fn too_deep_graphs_fail_with_a_structured_error() {
    let engine = Engine::builder()
        .register_type::<Link>()
        .max_depth(64)
        .build();

    let error = engine.to_node(&chain(100)).unwrap_err();
    assert!(matches!(error, BindError::DepthExceeded { .. }));

    // A shallow chain is fine under the same ceiling.
    assert!(engine.to_node(&chain(4)).is_ok());
}

#[test]
fn deep_documents_fail_symmetrically_on_decode() {
    let engine = Engine::builder()
        .register_type::<Link>()
        .max_depth(64)
        .build();

    let mut text = String::new();
    for _ in 0..100 {
        text.push_str(r#"{"next":"#);
    }
    text.push_str("null");
    for _ in 0..100 {
        text.push('}');
    }

    let error = ojson::from_str::<Link>(&engine, &text).unwrap_err();
    assert!(matches!(error, BindError::DepthExceeded { .. }));
}
