use serde_scl::{
    dumps, loads, loads_with_options, Document, Error, LexError, List, ParseError, SclOptions,
    TypeError, TypeSpec, Value,
};

fn class(fields: Vec<(&str, Value)>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<Document>(),
    )
}

#[test]
fn test_all_scalar_types() {
    let text = r#"
        a :: bool { no }
        b :: str { "xA\n" }
        c :: num { -9223372036854775808 }
        d :: fl { -0.125 }
        e :: fl { 3 }
        f :: ml { 'raw \n stays' }
    "#;
    let doc = loads(text).unwrap();
    assert_eq!(doc.get("a"), Some(&Value::Bool(false)));
    assert_eq!(doc.get("b"), Some(&Value::Str("xA\n".into())));
    assert_eq!(doc.get("c"), Some(&Value::Num(i64::MIN)));
    assert_eq!(doc.get("d"), Some(&Value::Float(-0.125)));
    assert_eq!(doc.get("e"), Some(&Value::Float(3.0)));
    assert_eq!(doc.get("f"), Some(&Value::Multiline("raw \\n stays".into())));
}

#[test]
fn test_canonical_spellings() {
    let text = "t :: bool { yes } f :: bool { no } r :: fl { 2 } s :: str { \"tab\there\" }";
    let canonical = dumps(&loads(text).unwrap()).unwrap();
    assert_eq!(
        canonical,
        "t :: bool { true }\nf :: bool { false }\nr :: fl { 2.0 }\ns :: str { \"tab\\there\" }\n"
    );
    assert_eq!(dumps(&loads(&canonical).unwrap()).unwrap(), canonical);
}

#[test]
fn test_num_rejects_decimal_point() {
    let err = loads("n :: num { 1.0 }").unwrap_err();
    assert!(matches!(err, Error::Type(TypeError::Mismatch { .. })));

    let err = loads("n :: num { 99999999999999999999 }").unwrap_err();
    assert!(matches!(err, Error::Type(TypeError::NumberOutOfRange { .. })));
}

#[test]
fn test_list_rejects_nonconforming_element() {
    let err = loads(r#"xs :: list(num) { 1, "two", 3 }"#).unwrap_err();
    assert_eq!(
        err.position(),
        Some((1, 22)),
        "error should point at the offending element"
    );
    assert!(matches!(err, Error::Type(TypeError::Mismatch { .. })));
}

#[test]
fn test_multiline_is_byte_for_byte() {
    let content = "\n  leading spaces\n\n\ttab and blank line above\n   ";
    let text = format!("m :: ml {{ '{}' }}", content);
    let doc = loads(&text).unwrap();
    assert_eq!(doc.get("m"), Some(&Value::Multiline(content.to_string())));

    let again = loads(&dumps(&doc).unwrap()).unwrap();
    assert_eq!(again, doc);
}

#[test]
fn test_multiline_dedent_is_opt_in() {
    let text = "m :: ml {\n    'first\n        second\n        third\n    '\n}";
    let verbatim = loads(text).unwrap();
    assert_eq!(
        verbatim.get("m").and_then(Value::as_str),
        Some("first\n        second\n        third\n    ")
    );

    let options = SclOptions::new().with_dedent_multiline(true);
    let dedented = loads_with_options(text, &options).unwrap();
    assert_eq!(
        dedented.get("m").and_then(Value::as_str),
        Some("first\nsecond\nthird\n")
    );
}

#[test]
fn test_comments_have_no_effect() {
    let plain = loads("a :: num { 1 } b :: num { 2 }").unwrap();
    let commented = loads(
        "[ header [ nested ] ]\na :: num { 1 }\n[ between ]\nb :: [ inside ] num { [x] 2 } [ end ]",
    )
    .unwrap();
    assert_eq!(plain, commented);
}

#[test]
fn test_duplicate_field_in_class() {
    let err = loads("db :: class {\n    port :: num { 1 }\n    port :: num { 2 }\n}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Duplicate field 'port' at line 3, column 5"
    );
    assert!(matches!(
        err,
        Error::Parse(ParseError::DuplicateField { .. })
    ));
}

#[test]
fn test_five_levels_of_nesting() {
    let text = r#"
        root :: class {
            items :: list(class) {
                {
                    inner :: class {
                        matrix :: list(list(fl)) { { 1.5 }, { } }
                        deepest :: class {
                            ok :: bool { true }
                        }
                    }
                },
                { }
            }
        }
    "#;
    let doc = loads(text).unwrap();

    let matrix = List::from_values(
        TypeSpec::list(TypeSpec::Float),
        vec![
            Value::List(List::from_values(TypeSpec::Float, vec![Value::Float(1.5)]).unwrap()),
            Value::List(List::new(TypeSpec::Float)),
        ],
    )
    .unwrap();
    let inner = class(vec![
        ("matrix", Value::List(matrix)),
        ("deepest", class(vec![("ok", Value::Bool(true))])),
    ]);
    let items = List::from_values(
        TypeSpec::Class,
        vec![class(vec![("inner", inner)]), class(vec![])],
    )
    .unwrap();
    let expected: Document = vec![(
        "root".to_string(),
        class(vec![("items", Value::List(items))]),
    )]
    .into_iter()
    .collect();
    assert_eq!(doc, expected);

    let text = dumps(&doc).unwrap();
    assert_eq!(
        text,
        "root :: class {\n\
         \x20   items :: list(class) {\n\
         \x20       {\n\
         \x20           inner :: class {\n\
         \x20               matrix :: list(list(fl)) { { 1.5 }, { } }\n\
         \x20               deepest :: class {\n\
         \x20                   ok :: bool { true }\n\
         \x20               }\n\
         \x20           }\n\
         \x20       },\n\
         \x20       { }\n\
         \x20   }\n\
         }\n"
    );
    assert_eq!(loads(&text).unwrap(), doc);
}

#[test]
fn test_nested_list_of_classes() {
    let text = "groups :: list(list(class)) {\n    {\n        {\n            n :: num { 1 }\n        }\n    },\n    { }\n}\n";
    let doc = loads(text).unwrap();
    assert_eq!(dumps(&doc).unwrap(), text);
}

#[test]
fn test_quoted_and_keyword_field_names_roundtrip() {
    let text = "\"has space\" :: num { 1 }\nlist :: num { 2 }\n\"yes\" :: num { 3 }\n";
    let doc = loads(text).unwrap();
    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        vec!["has space", "list", "yes"]
    );
    assert_eq!(dumps(&doc).unwrap(), text);
}

#[test]
fn test_lex_errors() {
    assert!(matches!(
        loads("s :: str { \"open"),
        Err(Error::Lex(LexError::UnterminatedString { line: 1, col: 12 }))
    ));
    assert!(matches!(
        loads("m :: ml { 'open"),
        Err(Error::Lex(LexError::UnterminatedMultiline { .. }))
    ));
    assert!(matches!(
        loads("[ never closed"),
        Err(Error::Lex(LexError::UnterminatedComment { line: 1, col: 1 }))
    ));
    assert!(matches!(
        loads("a :: num { 1 };"),
        Err(Error::Lex(LexError::UnexpectedCharacter { found: ';', .. }))
    ));
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        loads("a num { 1 }"),
        Err(Error::Parse(ParseError::UnexpectedToken { .. }))
    ));
    assert!(matches!(
        loads("a :: list num { 1 }"),
        Err(Error::Parse(ParseError::UnexpectedToken { .. }))
    ));
    assert!(matches!(
        loads("a :: class {"),
        Err(Error::Parse(ParseError::UnexpectedEndOfInput { .. }))
    ));
    assert!(matches!(
        loads("}"),
        Err(Error::Parse(ParseError::UnexpectedToken { .. }))
    ));
}

#[test]
fn test_empty_input() {
    assert!(loads("").unwrap().is_empty());
    assert!(loads("  [ only a comment ]\n").unwrap().is_empty());
    assert_eq!(dumps(&Document::new()).unwrap(), "");
}

#[test]
fn test_custom_indent() {
    let doc = loads("a :: class { b :: ml { 'x\ny' } }").unwrap();
    let text = serde_scl::dumps_with_options(&doc, &SclOptions::new().with_indent(2)).unwrap();
    assert_eq!(text, "a :: class {\n  b :: ml {\n    'x\ny'\n  }\n}\n");
    assert_eq!(loads(&text).unwrap(), doc);
}
