use std::collections::HashMap;

use anyconv::{ConvertError, ConvertErrorKind, ErrorCode, PathSegment, Reflect, Value, object};
use anyconv_testhelpers::test;

#[derive(Reflect, Clone, Default)]
struct Person {
    age: u32,
}

#[derive(Reflect, Clone, Default)]
struct Line {
    qty: i32,
}

#[derive(Reflect, Clone, Default)]
struct Order {
    items: Vec<Line>,
}

#[test]
fn negative_into_unsigned_field() {
    let mut p = Person::default();
    let err = anyconv::to_struct(&object! { "age" => -1 }, &mut p).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConversionFailure);
    assert_eq!(err.path, [PathSegment::Field("age".into())]);
    insta::assert_snapshot!(
        err.to_string(),
        @"at .age: cannot convert Value I64(-1) to u64: negative value cannot convert to unsigned"
    );
}

#[test]
fn nested_path() {
    let mut order = Order::default();
    let err = anyconv::to_struct(&r#"{"items":[{"qty":1},{"qty":"x"}]}"#.to_owned(), &mut order).unwrap_err();
    assert_eq!(err.path_string(), ".items[1].qty");
    insta::assert_snapshot!(
        err.to_string(),
        @r#"at .items[1].qty: cannot convert str "x" to i64: invalid integer"#
    );
}

#[test]
fn map_key_path() {
    let mut dst: HashMap<String, u8> = HashMap::new();
    let err = anyconv::map_to_map(&object! { "k" => "-1" }, &mut dst).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @r#"at ["k"]: cannot convert Value Str("-1") to u64: negative value cannot convert to unsigned"#
    );
}

#[test]
fn wrong_destination_kind() {
    let err = anyconv::to_struct(&object! { "a" => 1 }, &mut 5i32).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);
    assert_eq!(err.path_string(), "<root>");
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid argument: to_struct destination must be a struct, got i32"
    );
}

#[test]
fn rendering_depth_is_bounded() {
    let mut deep = Value::Null;
    for _ in 0..100 {
        deep = Value::Array(vec![deep]);
    }
    let err = anyconv::to_string(&deep).unwrap_err();
    assert_eq!(err.code(), ErrorCode::RecursionLimit);
    assert!(matches!(err.kind, ConvertErrorKind::RecursionLimit { depth: 64 }));
}

#[derive(Reflect, Clone, Default)]
struct Node {
    next: Option<Box<Node>>,
}

fn nested_object(levels: usize) -> Value {
    let mut v = object! { "next" => Value::Null };
    for _ in 1..levels {
        v = object! { "next" => v };
    }
    v
}

#[test]
fn binding_depth_is_bounded() {
    let mut node = Node::default();
    anyconv::to_struct(&nested_object(10), &mut node).unwrap();
    let mut levels = 1;
    let mut cur = &node;
    while let Some(next) = cur.next.as_deref() {
        levels += 1;
        cur = next;
    }
    assert_eq!(levels, 10);

    let mut node = Node::default();
    let err = anyconv::to_struct(&nested_object(100), &mut node).unwrap_err();
    assert_eq!(err.code(), ErrorCode::RecursionLimit);
    assert!(matches!(err.kind, ConvertErrorKind::RecursionLimit { depth: 64 }));
}

#[test]
fn custom_errors_keep_their_source() {
    #[derive(Debug)]
    struct Retired;

    impl core::fmt::Display for Retired {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("retired")
        }
    }

    impl core::error::Error for Retired {}

    let err = ConvertError::custom(Retired).with_path(PathSegment::Index(2));
    assert_eq!(err.code(), ErrorCode::Custom);
    assert_eq!(err.to_string(), "at [2]: retired");
    let source = core::error::Error::source(&err).map(|s| s.to_string());
    assert_eq!(source.as_deref(), Some("retired"));
}
