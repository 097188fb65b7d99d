use anyconv::{ConvertError, Converter, ErrorCode, Reflect, Value};
use anyconv_testhelpers::test;

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct Legacy {
    id: i64,
}

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct Modern {
    id: i64,
}

#[derive(Reflect, Clone, Default)]
struct OldRecord {
    item: Legacy,
    maybe: Option<Legacy>,
}

#[derive(Reflect, Clone, Default)]
struct NewRecord {
    item: Modern,
    maybe: Option<Modern>,
}

fn scaled() -> Converter {
    let conv = Converter::new();
    conv.register_converter(|l: &Legacy| {
        if l.id < 0 {
            return Ok(None);
        }
        Ok(Some(Modern { id: l.id * 100 }))
    })
    .unwrap();
    conv
}

#[test]
fn converter_runs_before_field_matching() {
    let conv = scaled();

    let mut modern = Modern::default();
    conv.scan(&Legacy { id: 3 }, &mut modern).unwrap();
    assert_eq!(modern, Modern { id: 300 });

    let mut record = NewRecord::default();
    let old = OldRecord {
        item: Legacy { id: 2 },
        maybe: Some(Legacy { id: 1 }),
    };
    conv.to_struct(&old, &mut record).unwrap();
    assert_eq!(record.item, Modern { id: 200 });
    assert_eq!(record.maybe, Some(Modern { id: 100 }));
}

#[test]
fn declining_falls_back_to_builtin_binding() {
    let conv = scaled();
    let mut modern = Modern::default();
    conv.scan(&Legacy { id: -5 }, &mut modern).unwrap();
    assert_eq!(modern, Modern { id: -5 });
}

#[test]
fn converters_are_per_instance() {
    let _ = scaled();
    let mut modern = Modern::default();
    Converter::new().scan(&Legacy { id: 4 }, &mut modern).unwrap();
    assert_eq!(modern, Modern { id: 4 });
}

#[test]
fn last_registration_wins() {
    let conv = scaled();
    conv.register_converter(|l: &Legacy| Ok(Some(Modern { id: l.id * 1000 })))
        .unwrap();
    let mut modern = Modern::default();
    conv.scan(&Legacy { id: 1 }, &mut modern).unwrap();
    assert_eq!(modern.id, 1000);
}

#[test]
fn wrapped_types_are_rejected() {
    let conv = Converter::new();
    let err = conv
        .register_converter(|l: &Option<Legacy>| Ok(l.clone().map(|l| Modern { id: l.id })))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);

    let err = conv
        .register_converter(|l: &Legacy| Ok(Some(Box::new(Modern { id: l.id }))))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);
}

#[test]
fn scalar_converters() {
    let conv = Converter::new();
    conv.register_converter(|s: &String| Ok(Some(s.len() as i64))).unwrap();

    #[derive(Reflect, Clone, Default)]
    struct Words {
        a: String,
        b: String,
    }

    #[derive(Reflect, Clone, Default)]
    struct Lengths {
        a: i64,
        b: i32,
    }

    let words = Words {
        a: "four".into(),
        b: "12".into(),
    };
    let mut lengths = Lengths::default();
    conv.to_struct(&words, &mut lengths).unwrap();
    assert_eq!(lengths.a, 4);
    assert_eq!(lengths.b, 12);

    // Dynamic values are a different source type.
    let mut n = 0i64;
    conv.scan(&Value::from("hello"), &mut n).unwrap_err();
    conv.scan(&"hello".to_owned(), &mut n).unwrap();
    assert_eq!(n, 5);
}

#[test]
fn converter_errors_carry_the_path() {
    let conv = Converter::new();
    conv.register_converter(|_: &Legacy| -> Result<Option<Modern>, ConvertError> {
        Err(ConvertError::custom("legacy ids are retired"))
    })
    .unwrap();

    let mut record = NewRecord::default();
    let err = conv
        .to_struct(&OldRecord::default(), &mut record)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Custom);
    insta::assert_snapshot!(err.to_string(), @"at .item: legacy ids are retired");
}
