//! Engine policy knobs: nulls, naming, exclusions, versions, exposure.

use core::marker::PhantomData;

use ojson::{Engine, JsonNode, KeyNaming, reflect_struct};

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Profile {
        pub user_name: String,
        pub home_page: Option<String>,
        pub tags: Vec<Option<String>>,
    }
}

#[test]
fn absent_members_are_omitted_by_default() {
    let engine = Engine::builder().register_type::<Profile>().build();
    let profile = Profile {
        user_name: "ada".to_string(),
        home_page: None,
        tags: Vec::new(),
    };

    let node = engine.to_node(&profile).unwrap();
    let obj = node.as_object().unwrap();
    assert!(!obj.contains_key("home_page"));
}

#[test]
fn serialize_nulls_keeps_absent_members() {
    let engine = Engine::builder()
        .register_type::<Profile>()
        .serialize_nulls(true)
        .build();
    let profile = Profile::default();

    let node = engine.to_node(&profile).unwrap();
    let obj = node.as_object().unwrap();
    assert_eq!(obj.get("home_page"), Some(&JsonNode::Null));
}

#[test]
fn array_positions_always_keep_their_null() {
    let engine = Engine::builder().register_type::<Profile>().build();
    let profile = Profile {
        user_name: "ada".to_string(),
        home_page: None,
        tags: vec![None, Some("x".to_string()), None],
    };

    let node = engine.to_node(&profile).unwrap();
    let tags = node.as_object().unwrap().get("tags").unwrap().as_array().unwrap();
    assert_eq!(tags.len(), 3);
    assert!(tags[0].is_null());
    assert_eq!(tags[1], JsonNode::from("x"));
    assert!(tags[2].is_null());
}

#[test]
fn null_decodes_into_an_absent_option() {
    let engine = Engine::builder().register_type::<Profile>().build();
    let back: Profile = ojson::from_str(&engine, r#"{"home_page":null}"#).unwrap();
    assert_eq!(back.home_page, None);
}

#[test]
fn naming_policy_shapes_keys_both_ways() {
    let engine = Engine::builder()
        .register_type::<Profile>()
        .naming(KeyNaming::CamelCase)
        .build();
    let profile = Profile {
        user_name: "ada".to_string(),
        ..Profile::default()
    };

    let node = engine.to_node(&profile).unwrap();
    let obj = node.as_object().unwrap();
    assert!(obj.contains_key("userName"));
    assert!(!obj.contains_key("user_name"));

    let back: Profile = ojson::from_str(&engine, r#"{"userName":"bo"}"#).unwrap();
    assert_eq!(back.user_name, "bo");
}

// -----------------------------------------------------------------------------
// Exclusions

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Record {
        pub kept: u32,
        @skip pub internal: u32,
        @synthetic pub marker: PhantomData<u32>,
        @since(2.0) pub added_later: u32,
        @until(2.0) pub removed_later: u32,
    }
}

#[test]
fn skip_and_synthetic_fields_never_appear() {
    let engine = Engine::builder().register_type::<Record>().build();
    let record = Record {
        kept: 1,
        internal: 2,
        marker: PhantomData,
        added_later: 3,
        removed_later: 4,
    };

    let node = engine.to_node(&record).unwrap();
    let obj = node.as_object().unwrap();
    assert!(obj.contains_key("kept"));
    assert!(!obj.contains_key("internal"));
    assert!(!obj.contains_key("marker"));

    // An excluded field is unknown on the way back in, and stays default.
    let back: Record = ojson::from_str(&engine, r#"{"kept":9,"internal":8}"#).unwrap();
    assert_eq!(back.kept, 9);
    assert_eq!(back.internal, 0);
}

#[test]
fn version_ranges_gate_fields() {
    let record = Record {
        kept: 1,
        added_later: 3,
        removed_later: 4,
        ..Record::default()
    };

    let old = Engine::builder().register_type::<Record>().version(1.0).build();
    let node = old.to_node(&record).unwrap();
    let obj = node.as_object().unwrap();
    assert!(!obj.contains_key("added_later"));
    assert!(obj.contains_key("removed_later"));

    let new = Engine::builder().register_type::<Record>().version(2.0).build();
    let node = new.to_node(&record).unwrap();
    let obj = node.as_object().unwrap();
    assert!(obj.contains_key("added_later"));
    assert!(!obj.contains_key("removed_later"));
}

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Partial {
        @exposed pub public_bit: u32,
        pub private_bit: u32,
    }
}

#[test]
fn exposure_only_mode_keeps_marked_fields() {
    let engine = Engine::builder()
        .register_type::<Partial>()
        .expose_only(true)
        .build();
    let value = Partial {
        public_bit: 1,
        private_bit: 2,
    };

    let node = engine.to_node(&value).unwrap();
    let obj = node.as_object().unwrap();
    assert!(obj.contains_key("public_bit"));
    assert!(!obj.contains_key("private_bit"));
}

/// A caller-supplied veto by field name.
struct DropByName(&'static str);

impl ojson::bind::exclude::ExclusionStrategy for DropByName {
    fn skip_field(&self, field: &ojson::bind::catalog::FieldDescriptor) -> bool {
        field.name() == self.0
    }
}

#[test]
fn user_exclusion_strategies_compose_by_disjunction() {
    let engine = Engine::builder()
        .register_type::<Profile>()
        .exclude(DropByName("user_name"))
        .build();
    let profile = Profile {
        user_name: "x".to_string(),
        ..Profile::default()
    };

    let node = engine.to_node(&profile).unwrap();
    assert!(!node.as_object().unwrap().contains_key("user_name"));
}

// -----------------------------------------------------------------------------
// Flattened embeddings

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Base<T> {
        @param(0) pub id: T,
        pub revision: u32,
    }
}

reflect_struct! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Document<T> {
        @flatten @param(0) pub base: T,
        pub body: String,
    }
}

#[test]
fn flattened_fields_inline_through_the_generic_chain() {
    let engine = Engine::builder()
        .register_type::<Document<Base<String>>>()
        .build();
    let doc = Document {
        base: Base {
            id: "d-1".to_string(),
            revision: 3,
        },
        body: "text".to_string(),
    };

    let text = ojson::to_string(&engine, &doc).unwrap();
    assert_eq!(text, r#"{"id":"d-1","revision":3,"body":"text"}"#);

    let back: Document<Base<String>> = ojson::from_str(&engine, &text).unwrap();
    assert_eq!(back, doc);
}
