use serde::{Deserialize, Serialize};
use serde_scl::{
    dumps, from_str, loads, to_document, to_dynamic, to_string, DynMap, Dynamic, Error, List,
    ParseError, SclOptions, TypeError, TypeSpec, Value, MAX_DEPTH,
};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    notes: String,
    total: f64,
}

fn sample_order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.5,
                quantity: 1,
            },
        ],
        notes: "leave at door\nring twice".to_string(),
        total: 109.48,
    }
}

#[test]
fn test_single_num_field() {
    let doc = loads("count :: num { 42 }").unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get("count"), Some(&Value::Num(42)));
}

#[test]
fn test_bool_list_accepts_yes() {
    let doc = loads("flags :: list(bool) { true, false, yes }").unwrap();
    let expected = List::from_values(
        TypeSpec::Bool,
        vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)],
    )
    .unwrap();
    assert_eq!(doc.get("flags"), Some(&Value::List(expected)));
}

#[test]
fn test_string_for_num_is_type_error() {
    let err = loads(r#"age :: num { "30" }"#).unwrap_err();
    match err {
        Error::Type(TypeError::Mismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, "num");
            assert_eq!(found, "string literal");
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
}

#[test]
fn test_nested_class_keeps_field_order() {
    let doc =
        loads(r#"db :: class { host :: str { "localhost" } port :: num { 5432 } }"#).unwrap();
    let db = doc.get("db").and_then(Value::as_document).unwrap();
    assert_eq!(db.keys().collect::<Vec<_>>(), vec!["host", "port"]);
    assert_eq!(db.get("host"), Some(&Value::Str("localhost".into())));
    assert_eq!(db.get("port"), Some(&Value::Num(5432)));
}

#[test]
fn test_nested_struct_roundtrip() {
    let order = sample_order();
    let text = to_string(&order).unwrap();
    println!("Order SCL:\n{}", text);

    assert!(text.contains("items :: list(class) {\n"));
    assert!(text.contains("notes :: ml {\n    'leave at door\nring twice'\n}\n"));

    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_struct_text_is_canonical() {
    let text = to_string(&sample_order()).unwrap();
    assert_eq!(dumps(&loads(&text).unwrap()).unwrap(), text);
}

#[test]
fn test_dynamic_and_document_dump_identically() {
    let dynamic = to_dynamic(&sample_order()).unwrap();
    let doc = to_document(&dynamic, &SclOptions::default()).unwrap();
    assert_eq!(dumps(&dynamic).unwrap(), dumps(&doc).unwrap());
}

#[test]
fn test_json_input_through_dynamic() {
    let dynamic: Dynamic = serde_json::from_str(
        r#"{"service": {"name": "api", "ports": [80, 443], "weights": [0.5, 1.5], "empty": []}}"#,
    )
    .unwrap();
    let text = dumps(&dynamic).unwrap();
    assert_eq!(
        text,
        "service :: class {\n    name :: str { \"api\" }\n    ports :: list(num) { 80, 443 }\n    weights :: list(fl) { 0.5, 1.5 }\n    empty :: list(str) { }\n}\n"
    );
}

#[test]
fn test_json_null_is_unsupported_with_path() {
    let dynamic: Dynamic =
        serde_json::from_str(r#"{"db": {"servers": [{"host": "a"}, {"host": null}]}}"#).unwrap();
    match dumps(&dynamic).unwrap_err() {
        Error::Type(TypeError::UnsupportedValue { path, .. }) => {
            assert_eq!(path, "db.servers[1].host");
        }
        other => panic!("expected unsupported value, got {other:?}"),
    }
}

#[test]
fn test_mixed_numbers_are_heterogeneous() {
    let dynamic: Dynamic = serde_json::from_str(r#"{"xs": [1, 2.5]}"#).unwrap();
    assert!(matches!(
        dumps(&dynamic),
        Err(Error::Type(TypeError::HeterogeneousList { .. }))
    ));
}

#[test]
fn test_cycle_detection_and_shared_siblings() {
    let shared = DynMap::new();
    shared.insert("n", Dynamic::Int(1));
    let root = DynMap::new();
    root.insert("left", Dynamic::Map(shared.clone()));
    root.insert("right", Dynamic::Map(shared.clone()));
    assert_eq!(
        dumps(&Dynamic::Map(root.clone())).unwrap(),
        "left :: class {\n    n :: num { 1 }\n}\nright :: class {\n    n :: num { 1 }\n}\n"
    );

    shared.insert("back", Dynamic::Map(root.clone()));
    match dumps(&Dynamic::Map(root)).unwrap_err() {
        Error::Type(TypeError::CyclicStructure { path }) => assert_eq!(path, "left.back"),
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn test_serde_path_rejects_cycles() {
    let looped = DynMap::new();
    looped.insert("name", Dynamic::from("loop"));
    looped.insert("me", Dynamic::Map(looped.clone()));
    let value = Dynamic::Map(looped.clone());

    assert!(matches!(
        dumps(&value),
        Err(Error::Type(TypeError::CyclicStructure { .. }))
    ));
    match to_string(&value).unwrap_err() {
        Error::Custom(msg) => assert!(msg.contains("cyclic structure")),
        other => panic!("expected serde error, got {other:?}"),
    }
    let mut buffer = Vec::new();
    assert!(serde_scl::to_writer(&mut buffer, &value).is_err());
    assert!(buffer.is_empty());

    looped.insert("me", Dynamic::Null);
}

#[test]
fn test_deep_nesting_is_an_error_not_a_crash() {
    let text = format!(
        "{}x :: num {{ 1 }}{}",
        "a :: class { ".repeat(1000),
        " }".repeat(1000)
    );
    assert!(matches!(
        loads(&text),
        Err(Error::Parse(ParseError::NestingTooDeep { .. }))
    ));

    let text = format!(
        "a :: {}num{} {{ }}",
        "list(".repeat(200_000),
        ")".repeat(200_000)
    );
    assert!(matches!(
        loads(&text),
        Err(Error::Parse(ParseError::NestingTooDeep { .. }))
    ));

    let mut value = Dynamic::from(1);
    for _ in 0..1000 {
        let map = DynMap::new();
        map.insert("a", value);
        value = Dynamic::Map(map);
    }
    assert!(matches!(
        dumps(&value),
        Err(Error::Type(TypeError::NestingTooDeep { limit: MAX_DEPTH, .. }))
    ));
    assert!(to_string(&value).is_err());
}

#[test]
fn test_option_fields() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Opt {
        #[serde(skip_serializing_if = "Option::is_none")]
        nick: Option<String>,
        age: Option<u8>,
    }

    let value = Opt {
        nick: None,
        age: Some(30),
    };
    let text = to_string(&value).unwrap();
    assert_eq!(text, "age :: num { 30 }\n");
    assert_eq!(from_str::<Opt>(&text).unwrap(), value);

    let with_null = Opt {
        nick: None,
        age: None,
    };
    assert!(matches!(
        to_string(&with_null),
        Err(Error::Type(TypeError::UnsupportedValue { ref path, .. })) if path == "age"
    ));
}

#[test]
fn test_enum_fields_roundtrip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Level {
        Low,
        Custom(u8),
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Alert {
        a: Level,
        b: Level,
    }

    let alert = Alert {
        a: Level::Low,
        b: Level::Custom(9),
    };
    let text = to_string(&alert).unwrap();
    assert_eq!(
        text,
        "a :: str { \"Low\" }\nb :: class {\n    Custom :: num { 9 }\n}\n"
    );
    assert_eq!(from_str::<Alert>(&text).unwrap(), alert);
}

#[test]
fn test_deserialize_type_mismatch() {
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Port {
        port: u16,
    }
    assert!(from_str::<Port>(r#"port :: str { "80" }"#).is_err());
}

#[test]
fn test_error_positions_are_reported() {
    let err = loads("a :: num { 1 }\nb :: num { 2 }\nc :: num { 3.5 }").unwrap_err();
    assert_eq!(err.position(), Some((3, 12)));
    assert!(err.to_string().contains("line 3, column 12"));
}
