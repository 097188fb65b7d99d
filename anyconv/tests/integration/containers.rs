use std::collections::{BTreeMap, HashMap};

use anyconv::{Converter, ErrorCode, MapOptions, Reflect, SliceOptions, Value, object};
use anyconv_testhelpers::test;

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn null_is_not_empty() {
    assert_eq!(anyconv::to_vec::<i32>(&Value::Null).unwrap(), None);
    assert_eq!(anyconv::to_vec::<i32>(&None::<Vec<i32>>).unwrap(), None);
    assert_eq!(anyconv::to_vec::<i32>(&String::new()).unwrap(), Some(vec![]));
    assert_eq!(anyconv::ints(&Value::Null).unwrap(), Vec::<i32>::new());
}

#[test]
fn lists_from_many_sources() {
    assert_eq!(
        anyconv::int64s(&r#"[1, "2", 3.7]"#.to_owned()).unwrap(),
        [1, 2, 3]
    );
    assert_eq!(anyconv::strings(&5i32).unwrap(), ["5"]);
    assert_eq!(anyconv::float64s(&vec![1u8, 2]).unwrap(), [1.0, 2.0]);
    assert_eq!(anyconv::uint64s(&[7u16, 8, 9]).unwrap(), [7, 8, 9]);
    assert_eq!(
        anyconv::values(&vec!["a".to_owned()]).unwrap(),
        [Value::from("a")]
    );
}

#[test]
fn non_json_bytes_convert_per_byte() {
    assert_eq!(anyconv::ints(&b"ab".to_vec()).unwrap(), [97, 98]);
    assert_eq!(anyconv::ints(&b"[3,4]".to_vec()).unwrap(), [3, 4]);
}

#[test]
fn same_typed_list_is_cloned() {
    let src = vec![Point { x: 1, y: 2 }];
    assert_eq!(anyconv::to_vec::<Point>(&src).unwrap(), Some(src.clone()));
}

#[test]
fn failed_items_keep_their_default() {
    let src = vec![Value::from("1"), Value::from("x"), Value::from("3")];

    let err = anyconv::to_vec::<i32>(&src).unwrap_err();
    assert_eq!(err.path_string(), "[1]");

    let opts = SliceOptions::default().with_continue_on_error(true);
    assert_eq!(anyconv::to_vec_with::<i32>(&src, &opts).unwrap(), Some(vec![1, 0, 3]));
}

#[test]
fn fixed_size_arrays_take_what_fits() {
    let mut short = [0i32; 2];
    anyconv::scan(&vec![1i64, 2, 3], &mut short).unwrap();
    assert_eq!(short, [1, 2]);

    let mut long = [9u8; 4];
    anyconv::scan(&vec![1i64, 2], &mut long).unwrap();
    assert_eq!(long, [1, 2, 9, 9]);
}

#[test]
fn map_forms() {
    let pairs = vec![Value::from("a"), Value::from(1i64), Value::from("b"), Value::from(2i64)];
    let m = anyconv::to_map(&pairs).unwrap().unwrap();
    assert_eq!(Value::Object(m).to_json_string(), r#"{"a":1,"b":2}"#);

    let mut counts = HashMap::new();
    counts.insert(3u8, true);
    let m = anyconv::to_map(&counts).unwrap().unwrap();
    assert_eq!(m["3"], Value::Bool(true));

    assert_eq!(anyconv::to_map(&Value::Null).unwrap(), None);
    assert_eq!(anyconv::to_map(&"not a map".to_owned()).unwrap(), None);
}

#[test]
fn map_of_strings() {
    let m = anyconv::map_str_str(&object! { "a" => 1, "b" => true, "c" => 1.5 })
        .unwrap()
        .unwrap();
    let pairs: Vec<_> = m.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(pairs, [("a", "1"), ("b", "true"), ("c", "1.5")]);
}

#[test]
fn maps_skip_items_without_a_map_form() {
    let list = anyconv::maps(&r#"[{"a":1}, 2, {"b":2}]"#.to_owned())
        .unwrap()
        .unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["b"], Value::Int(2));

    let single = anyconv::maps(&object! { "k" => "v" }).unwrap().unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(anyconv::maps(&Value::Null).unwrap(), None);
}

#[test]
fn map_to_map_converts_keys_and_values() {
    let mut dst: BTreeMap<i32, i64> = BTreeMap::new();
    dst.insert(99, 99);
    anyconv::map_to_map(&object! { "1" => "10", "2" => 20.0 }, &mut dst).unwrap();
    assert_eq!(dst, BTreeMap::from([(1, 10), (2, 20)]));

    let mut points: HashMap<String, Point> = HashMap::new();
    anyconv::map_to_map(
        &object! { "origin" => object! { "x" => 0, "y" => 0 }, "p" => object! { "X" => "3", "y" => 4 } },
        &mut points,
    )
    .unwrap();
    assert_eq!(points["p"], Point { x: 3, y: 4 });
    assert_eq!(points.len(), 2);
}

#[test]
fn map_to_map_needs_a_map() {
    let err = anyconv::map_to_map(&object! { "a" => 1 }, &mut 0i32).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);

    let mut untouched = HashMap::from([("keep".to_owned(), 1i32)]);
    anyconv::map_to_map(&Value::Null, &mut untouched).unwrap();
    assert_eq!(untouched["keep"], 1);
}

#[test]
fn map_to_maps_from_json_text() {
    let mut dst: Vec<HashMap<String, i32>> = Vec::new();
    anyconv::map_to_maps(&r#"[{"a":"1"},{"b":2}]"#.to_owned(), &mut dst).unwrap();
    assert_eq!(dst.len(), 2);
    assert_eq!(dst[0]["a"], 1);
    assert_eq!(dst[1]["b"], 2);

    let err = anyconv::map_to_maps(&Value::Null, &mut Vec::<i32>::new()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);
}

#[test]
fn map_options_pick_tags() {
    #[derive(Reflect, Clone, Default)]
    struct Row {
        #[conv(orm = "row_id", json = "id")]
        id: i64,
        #[conv(json = "label,omitempty")]
        label: String,
    }

    let conv = Converter::new();
    let row = Row { id: 4, label: String::new() };

    let m = conv.to_map(&row).unwrap().unwrap();
    assert_eq!(Value::Object(m).to_json_string(), r#"{"id":4,"label":""}"#);

    let opts = MapOptions::new().with_tags(["orm"]).with_omit_empty(true);
    let m = conv.to_map_with(&row, &opts).unwrap().unwrap();
    assert_eq!(Value::Object(m).to_json_string(), r#"{"row_id":4}"#);
}
