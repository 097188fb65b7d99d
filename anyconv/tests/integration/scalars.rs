use core::time::Duration;

use anyconv::{ErrorCode, Reflect, Value, object};
use anyconv_testhelpers::test;

#[derive(Reflect, Clone, Default)]
struct Empty {}

#[test]
fn bool_coercion() {
    let falsy: Vec<Box<dyn Reflect>> = vec![
        Box::new(Value::Null),
        Box::new(false),
        Box::new(0i32),
        Box::new(0.0f64),
        Box::new(String::new()),
        Box::new("0".to_owned()),
        Box::new("false".to_owned()),
        Box::new("off".to_owned()),
        Box::new("no".to_owned()),
        Box::new(Vec::<u8>::new()),
        Box::new(None::<i32>),
    ];
    for v in &falsy {
        assert!(!anyconv::to_bool(v.as_ref()).unwrap(), "{:?}", v.as_ref());
    }

    let truthy: Vec<Box<dyn Reflect>> = vec![
        Box::new(true),
        Box::new(1u8),
        Box::new("1".to_owned()),
        Box::new("true".to_owned()),
        Box::new("on".to_owned()),
        Box::new("anything".to_owned()),
        Box::new(Empty {}),
        Box::new(vec![0i32]),
        Box::new(object! { "k" => 0 }),
    ];
    for v in &truthy {
        assert!(anyconv::to_bool(v.as_ref()).unwrap(), "{:?}", v.as_ref());
    }
}

#[test]
fn integer_text_forms() {
    assert_eq!(anyconv::to_i64(&"0x1F".to_owned()).unwrap(), 31);
    assert_eq!(anyconv::to_i64(&"-0x1F".to_owned()).unwrap(), -31);
    assert_eq!(anyconv::to_i32(&"017".to_owned()).unwrap(), 15);
    assert_eq!(anyconv::to_i64(&"12.9".to_owned()).unwrap(), 12);
    assert_eq!(anyconv::to_i64(&Value::from("")).unwrap(), 0);
    assert_eq!(anyconv::to_u16(&Value::from(" 42 ")).unwrap(), 42);
}

#[test]
fn unsigned_rejects_negatives() {
    for v in [Value::Int(-1), Value::Float(-0.5), Value::from("-3")] {
        let err = anyconv::to_u32(&v).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConversionFailure);
    }
    assert_eq!(anyconv::to_u32(&Value::Float(2.7)).unwrap(), 2);
}

#[test]
fn null_and_options_are_zero() {
    assert_eq!(anyconv::to_i64(&Value::Null).unwrap(), 0);
    assert_eq!(anyconv::to_f64(&None::<f64>).unwrap(), 0.0);
    assert_eq!(anyconv::to_string(&None::<String>).unwrap(), "");
    assert_eq!(anyconv::to_i64(&Some(Box::new(7i8))).unwrap(), 7);
}

#[test]
fn text_rendering() {
    assert_eq!(anyconv::to_string(&1.5f64).unwrap(), "1.5");
    assert_eq!(anyconv::to_string(&2.0f64).unwrap(), "2");
    assert_eq!(anyconv::to_string(&0.1f32).unwrap(), "0.1");
    assert_eq!(anyconv::to_string(&'x').unwrap(), "x");
    assert_eq!(anyconv::to_string(&vec![1i32, 2]).unwrap(), "[1,2]");
    assert_eq!(
        anyconv::to_string(&object! { "a" => 1, "b" => "x" }).unwrap(),
        r#"{"a":1,"b":"x"}"#
    );
}

#[test]
fn bytes_round_trip_through_numbers() {
    let bytes = anyconv::to_bytes(&0x0102i32).unwrap();
    assert_eq!(bytes, [2, 1, 0, 0]);
    assert_eq!(anyconv::to_i32(&bytes).unwrap(), 0x0102);
    assert_eq!(anyconv::to_bytes(&"héllo".to_owned()).unwrap(), "héllo".as_bytes());
}

#[test]
fn times() {
    let t = anyconv::to_time(&"2024-01-02 03:04:05".to_owned(), None).unwrap();
    assert_eq!(t.to_rfc3339(), "2024-01-02T03:04:05+00:00");

    let t = anyconv::to_time(&"2024-03-04".to_owned(), Some("Y-m-d")).unwrap();
    assert_eq!(t.to_rfc3339(), "2024-03-04T00:00:00+00:00");

    let t = anyconv::to_time(&1_700_000_000i64, None).unwrap();
    assert_eq!(t.timestamp(), 1_700_000_000);

    let err = anyconv::to_time(&"yesterday".to_owned(), None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConversionFailure);
}

#[test]
fn durations() {
    assert_eq!(anyconv::to_duration(&"1h30m".to_owned()).unwrap(), Duration::from_secs(5400));
    assert_eq!(anyconv::to_duration(&1_500i64).unwrap(), Duration::from_nanos(1_500));
    assert_eq!(anyconv::parse_duration("1.5ms").unwrap(), Duration::from_micros(1_500));
    assert_eq!(anyconv::format_duration(Duration::from_millis(1_500)), "1.5s");
    assert_eq!(anyconv::to_string(&Duration::from_secs(3_600)).unwrap(), "1h0m0s");
    assert!(anyconv::parse_duration("-1s").is_err());
}

#[test]
fn convert_by_name() {
    assert_eq!(anyconv::convert(&"0x10".to_owned(), "int64", &[]).unwrap(), Value::Int(16));
    assert_eq!(anyconv::convert(&"300".to_owned(), "u8", &[]).unwrap(), Value::Uint(44));
    assert_eq!(anyconv::convert(&1i32, "bool", &[]).unwrap(), Value::Bool(true));
    assert_eq!(
        anyconv::convert(&"[1,2]".to_owned(), "[]string", &[]).unwrap(),
        Value::from(vec![Value::from("1"), Value::from("2")])
    );
    assert_eq!(
        anyconv::convert(&"04/03/2024".to_owned(), "time", &["d/m/Y"])
            .unwrap()
            .to_string(),
        r#""2024-03-04T00:00:00+00:00""#
    );
    assert_eq!(
        anyconv::convert(&"5s".to_owned(), "time.Duration", &[]).unwrap(),
        Value::Int(5_000_000_000)
    );
    assert_eq!(anyconv::convert(&3u8, "no-such-type", &[]).unwrap(), Value::Uint(3));
}
