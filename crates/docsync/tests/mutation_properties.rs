use docsync::codec::{parse, serialize, Format, SerializeOptions};
use docsync::mutation::{remove_item, toggle_required, update};
use docsync::pointer::{get, Step};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_document() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,6}", arb_value()), 0..5)
        .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>()))
}

fn arb_path() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        prop_oneof!["[a-z]{1,6}".prop_map(Step::Key), (0usize..3).prop_map(Step::Index)],
        1..4,
    )
}

proptest! {
    #[test]
    fn json_text_round_trips(doc in arb_document(), indent in 0usize..4) {
        let options = SerializeOptions { json_indent: indent };
        let text = serialize(&doc, Format::Json, &options).unwrap();
        let (back, format) = parse(&text).unwrap();
        prop_assert_eq!(format, Format::Json);
        prop_assert_eq!(back, doc);
    }

    #[test]
    fn yaml_text_round_trips(doc in arb_document()) {
        let text = serialize(&doc, Format::Yaml, &SerializeOptions::default()).unwrap();
        let (back, _) = parse(&text).unwrap();
        prop_assert_eq!(back, doc);
    }

    #[test]
    fn update_then_get_reads_value(
        doc in arb_document(),
        path in arb_path(),
        value in arb_value(),
    ) {
        let next = update(&doc, &path, value.clone());
        prop_assert_eq!(get(&next, &path), Some(&value));
    }

    #[test]
    fn update_never_changes_input(
        doc in arb_document(),
        path in arb_path(),
        value in arb_value(),
    ) {
        let before = doc.clone();
        let _ = update(&doc, &path, value);
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn update_at_any_index_is_total(
        doc in arb_document(),
        key in "[a-z]{1,6}",
        index in prop_oneof![0usize..2048, any::<usize>()],
        value in arb_scalar(),
    ) {
        let path = [Step::Key(key), Step::Index(index)];
        let next = update(&doc, &path, value.clone());
        if get(&next, &path) != Some(&value) {
            prop_assert_eq!(next, doc);
        }
    }

    #[test]
    fn remove_shifts_later_elements(
        items in prop::collection::vec(arb_scalar(), 1..6),
        pick in 0usize..6,
    ) {
        let pick = pick % items.len();
        let doc = serde_json::json!({ "list": items.clone() });
        let next = remove_item(&doc, &[Step::key("list"), Step::index(pick)]);
        let mut expected = items;
        expected.remove(pick);
        prop_assert_eq!(&next["list"], &Value::Array(expected));
    }

    #[test]
    fn toggle_required_is_idempotent(key in "[a-z]{1,6}", on in any::<bool>()) {
        let doc = serde_json::json!({"s": {"type": "object", "required": ["id"]}});
        let path = [Step::key("s")];
        let once = toggle_required(&doc, &path, &key, on);
        let twice = toggle_required(&once, &path, &key, on);
        prop_assert_eq!(&once, &twice);
        let member = once["s"]
            .get("required")
            .and_then(Value::as_array)
            .map(|items| items.iter().any(|item| item.as_str() == Some(key.as_str())))
            .unwrap_or(false);
        prop_assert_eq!(member, on);
    }
}
