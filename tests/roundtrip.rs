//! Round-trip behavior of the engine: tree, text and streaming forms.

use ojson::{Engine, JsonNode, reflect_struct};
use ojson_tree::{TreeReader, TreeWriter};

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Address {
        pub street: String,
        pub number: u32,
    }
}

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Person {
        pub name: String,
        pub age: u32,
        pub nickname: Option<String>,
        pub addresses: Vec<Address>,
    }
}

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Pair<T> {
        @param(0) pub first: T,
        @param(0) pub second: T,
    }
}

fn engine() -> Engine {
    Engine::builder()
        .register_type::<Person>()
        .register_type::<Pair<String>>()
        .register_type::<Pair<u32>>()
        .build()
}

fn sample() -> Person {
    Person {
        name: "ada".to_string(),
        age: 36,
        nickname: Some("al".to_string()),
        addresses: vec![
            Address {
                street: "main".to_string(),
                number: 7,
            },
            Address {
                street: "side".to_string(),
                number: 9,
            },
        ],
    }
}

#[test]
fn primitives_and_sequences_round_trip_at_top_level() {
    let engine = Engine::builder().register_type::<Vec<u32>>().build();

    let node = engine.to_node(&7_u32).unwrap();
    let back: u32 = engine.from_node(&node).unwrap();
    assert_eq!(back, 7);

    let items: Vec<u32> = vec![1, 2, 3];
    let node = engine.to_node(&items).unwrap();
    let back: Vec<u32> = engine.from_node(&node).unwrap();
    assert_eq!(back, items);
}

#[test]
fn nested_structs_round_trip() {
    let engine = engine();
    let person = sample();

    let node = engine.to_node(&person).unwrap();
    let back: Person = engine.from_node(&node).unwrap();
    assert_eq!(back, person);
}

#[test]
fn text_round_trip_is_stable() {
    let engine = engine();
    let person = sample();

    let text = ojson::to_string(&engine, &person).unwrap();
    let back: Person = ojson::from_str(&engine, &text).unwrap();
    assert_eq!(back, person);
    assert_eq!(text, ojson::to_string(&engine, &back).unwrap());
}

#[test]
fn generic_pair_produces_the_expected_document() {
    let engine = engine();
    let pair = Pair {
        first: "a".to_string(),
        second: "b".to_string(),
    };

    let text = ojson::to_string(&engine, &pair).unwrap();
    assert_eq!(text, r#"{"first":"a","second":"b"}"#);

    let back: Pair<String> = ojson::from_str(&engine, &text).unwrap();
    assert_eq!(back, pair);
}

#[test]
fn pair_instantiations_resolve_independently() {
    let engine = engine();
    let pair = Pair {
        first: 1_u32,
        second: 2_u32,
    };

    let text = ojson::to_string(&engine, &pair).unwrap();
    assert_eq!(text, r#"{"first":1,"second":2}"#);

    let back: Pair<u32> = ojson::from_str(&engine, &text).unwrap();
    assert_eq!(back, pair);
}

#[test]
fn missing_keys_leave_construction_defaults() {
    let engine = engine();
    let back: Person = ojson::from_str(&engine, r#"{"name":"solo"}"#).unwrap();
    assert_eq!(back.name, "solo");
    assert_eq!(back.age, 0);
    assert_eq!(back.nickname, None);
    assert!(back.addresses.is_empty());
}

#[test]
fn unknown_keys_are_skipped_by_default() {
    let engine = engine();
    let back: Person =
        ojson::from_str(&engine, r#"{"name":"x","mystery":{"deep":[1,2]},"age":3}"#).unwrap();
    assert_eq!(back.name, "x");
    assert_eq!(back.age, 3);
}

#[test]
fn large_integers_survive_the_round_trip() {
    let engine = Engine::builder().register_type::<Pair<u64>>().build();
    let pair = Pair {
        first: u64::MAX,
        second: 9_007_199_254_740_993, // above 2^53
    };

    let text = ojson::to_string(&engine, &pair).unwrap();
    let back: Pair<u64> = ojson::from_str(&engine, &text).unwrap();
    assert_eq!(back, pair);
}

#[test]
fn streaming_and_tree_forms_agree() {
    let engine = engine();
    let person = sample();

    let node = engine.to_node(&person).unwrap();

    let mut writer = TreeWriter::new();
    engine.to_writer(&person, &mut writer).unwrap();
    assert_eq!(writer.finish().unwrap(), node);

    let mut reader = TreeReader::new(&node);
    let streamed: Person = engine.from_reader(&mut reader).unwrap();
    let treed: Person = engine.from_node(&node).unwrap();
    assert_eq!(streamed, treed);
}

#[test]
fn concurrent_conversions_share_one_engine() {
    use std::sync::Arc;

    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let person = sample();
                    let node = engine.to_node(&person).unwrap();
                    let back: Person = engine.from_node(&node).unwrap();
                    assert_eq!(back, person);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn option_some_encodes_as_the_payload() {
    let engine = engine();
    let mut person = sample();
    person.nickname = Some("al".to_string());

    let node = engine.to_node(&person).unwrap();
    let obj = node.as_object().unwrap();
    assert_eq!(obj.get("nickname"), Some(&JsonNode::from("al")));
}
