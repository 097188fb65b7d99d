use core::time::Duration;
use std::collections::HashMap;

use anyconv::{ErrorCode, Reflect, StructOptions, Value, object};
use anyconv_testhelpers::test;
use chrono::{DateTime, Utc};

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct User {
    uid: i64,
    #[conv(gconv = "nick", json = "nickname,omitempty")]
    nick_name: String,
    pass1: String,
}

#[test]
fn binds_by_tag_and_fuzzy_name() {
    let src = object! { "uid" => "7", "nick" => "john", "PASS-1" => 123 };
    let mut user = User::default();
    anyconv::to_struct(&src, &mut user).unwrap();
    assert_eq!(
        user,
        User {
            uid: 7,
            nick_name: "john".into(),
            pass1: "123".into(),
        }
    );
}

#[test]
fn lower_priority_tags_and_rust_names_also_match() {
    let mut user = User::default();
    anyconv::to_struct(&object! { "nickname" => "a" }, &mut user).unwrap();
    assert_eq!(user.nick_name, "a");

    let mut user = User::default();
    anyconv::to_struct(&object! { "NickName" => "b" }, &mut user).unwrap();
    assert_eq!(user.nick_name, "b");
}

#[test]
fn higher_priority_tag_wins() {
    #[derive(Reflect, Clone, Default)]
    struct Both {
        #[conv(gconv = "a", json = "b")]
        value: i32,
    }

    let mut both = Both::default();
    anyconv::to_struct(&object! { "b" => 2, "a" => 1 }, &mut both).unwrap();
    assert_eq!(both.value, 1);

    let mut both = Both::default();
    anyconv::to_struct(&object! { "b" => 2 }, &mut both).unwrap();
    assert_eq!(both.value, 2);
}

#[test]
fn exact_names_beat_fuzzy_ones() {
    #[derive(Reflect, Clone, Default)]
    struct Nicks {
        #[conv(gconv = "nickname")]
        nick: String,
        #[conv(gconv = "nick_name")]
        other: String,
    }

    let mut nicks = Nicks::default();
    anyconv::to_struct(&object! { "nick_name" => "x" }, &mut nicks).unwrap();
    assert_eq!(nicks.nick, "");
    assert_eq!(nicks.other, "x");
}

#[test]
fn unmatched_fields_keep_their_value() {
    let mut user = User {
        uid: 1,
        nick_name: "keep".into(),
        pass1: "keep".into(),
    };
    anyconv::to_struct(&object! { "uid" => 2, "unknown" => 3 }, &mut user).unwrap();
    assert_eq!(user.uid, 2);
    assert_eq!(user.nick_name, "keep");
}

#[test]
fn map_round_trip() {
    let user = User {
        uid: 7,
        nick_name: "john".into(),
        pass1: "secret".into(),
    };
    let m = anyconv::to_map(&user).unwrap().unwrap();
    assert_eq!(
        Value::Object(m.clone()).to_json_string(),
        r#"{"uid":7,"nick":"john","pass1":"secret"}"#
    );

    let mut back = User::default();
    anyconv::to_struct(&Value::Object(m), &mut back).unwrap();
    assert_eq!(back, user);
}

#[test]
fn sources_other_than_maps() {
    let mut user = User::default();
    anyconv::to_struct(&r#"{"uid": 3, "nick": "json"}"#.to_owned(), &mut user).unwrap();
    assert_eq!((user.uid, user.nick_name.as_str()), (3, "json"));

    let mut user = User::default();
    let pairs = vec![Value::from("uid"), Value::from(4i64), Value::from("pass1")];
    anyconv::to_struct(&pairs, &mut user).unwrap();
    assert_eq!(user.uid, 4);
    assert_eq!(user.pass1, "");

    #[derive(Reflect, Clone, Default)]
    struct Account {
        uid: u32,
        nick: String,
    }
    let mut user = User::default();
    let account = Account {
        uid: 5,
        nick: "acc".into(),
    };
    anyconv::to_struct(&account, &mut user).unwrap();
    assert_eq!((user.uid, user.nick_name.as_str()), (5, "acc"));

    let mut user = User::default();
    anyconv::to_struct(&String::new(), &mut user).unwrap();
    assert_eq!(user, User::default());
}

#[test]
fn overrides_come_first() {
    let opts = StructOptions::new().with_override("login", "nick_name");
    let mut user = User::default();
    anyconv::to_struct_with(&object! { "login" => "x", "nick" => "y" }, &mut user, &opts).unwrap();
    assert_eq!(user.nick_name, "x");
}

#[test]
fn caller_priority_tags() {
    #[derive(Reflect, Clone, Default)]
    struct Row {
        #[conv(orm = "row_id", json = "id")]
        id: i64,
    }

    let mut row = Row::default();
    let opts = StructOptions::new().with_priority_tags(["orm"]);
    anyconv::to_struct_with(&object! { "id" => 1, "row_id" => 2 }, &mut row, &opts).unwrap();
    assert_eq!(row.id, 2);

    let mut row = Row::default();
    anyconv::to_struct(&object! { "id" => 1, "row_id" => 2 }, &mut row).unwrap();
    assert_eq!(row.id, 1);
}

#[test]
fn continue_on_error_skips_bad_fields() {
    let src = object! { "uid" => "not a number", "nick" => "n" };

    let mut user = User::default();
    let err = anyconv::to_struct(&src, &mut user).unwrap_err();
    assert_eq!(err.path_string(), ".uid");

    let mut user = User::default();
    let opts = StructOptions::new().with_continue_on_error(true);
    anyconv::to_struct_with(&src, &mut user, &opts).unwrap();
    assert_eq!(user.uid, 0);
    assert_eq!(user.nick_name, "n");
}

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct Base {
    id: i64,
    #[conv(json = "created")]
    created_at: String,
}

#[test]
fn flattened_fields_share_names() {
    #[derive(Reflect, Clone, Default)]
    struct Entity {
        #[conv(flatten)]
        base: Base,
        id: i64,
        name: String,
    }

    let mut e = Entity::default();
    anyconv::to_struct(&object! { "id" => 3, "created" => "now", "name" => "n" }, &mut e).unwrap();
    assert_eq!(e.base.id, 3);
    assert_eq!(e.id, 3);
    assert_eq!(e.base.created_at, "now");

    let m = anyconv::to_map(&e).unwrap().unwrap();
    let keys: Vec<_> = m.keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "created", "name"]);
}

#[test]
fn tagged_embedding_nests() {
    #[derive(Reflect, Clone, Default)]
    struct Tagged {
        #[conv(json = "base", flatten)]
        base: Base,
        name: String,
    }

    let mut t = Tagged::default();
    let src = object! { "base" => object! { "id" => 2, "created" => "c" }, "name" => "n" };
    anyconv::to_struct(&src, &mut t).unwrap();
    assert_eq!(
        t.base,
        Base {
            id: 2,
            created_at: "c".into(),
        }
    );

    let m = anyconv::to_map(&t).unwrap().unwrap();
    assert_eq!(
        Value::Object(m).to_json_string(),
        r#"{"base":{"id":2,"created":"c"},"name":"n"}"#
    );
}

#[test]
fn excluded_fields_are_ignored() {
    #[derive(Reflect, Clone, Default)]
    struct Secret {
        name: String,
        #[conv(json = "-")]
        token: String,
    }

    let mut s = Secret::default();
    anyconv::to_struct(&object! { "name" => "n", "token" => "t" }, &mut s).unwrap();
    assert_eq!(s.token, "");

    s.token = "t".into();
    let m = anyconv::to_map(&s).unwrap().unwrap();
    assert!(!m.contains_key("token"));
}

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn nested_options_and_boxes() {
    #[derive(Reflect, Clone, Default)]
    struct Figure {
        origin: Option<Box<Point>>,
        points: Vec<Point>,
        tags: HashMap<String, i32>,
    }

    let src = object! {
        "origin" => object! { "x" => 1, "y" => 2 },
        "points" => r#"[{"x":3},{"y":"4"}]"#,
        "tags" => object! { "a" => "1" },
    };
    let mut figure = Figure::default();
    anyconv::to_struct(&src, &mut figure).unwrap();
    assert_eq!(figure.origin.as_deref(), Some(&Point { x: 1, y: 2 }));
    assert_eq!(figure.points, [Point { x: 3, y: 0 }, Point { x: 0, y: 4 }]);
    assert_eq!(figure.tags["a"], 1);

    anyconv::to_struct(&object! { "origin" => Value::Null }, &mut figure).unwrap();
    assert_eq!(figure.origin, None);
}

#[test]
fn times_and_durations_in_fields() {
    #[derive(Reflect, Clone, Default)]
    struct Job {
        started: DateTime<Utc>,
        timeout: Duration,
    }

    let mut job = Job::default();
    anyconv::to_struct(
        &object! { "started" => "2024-05-06T07:08:09+02:00", "timeout" => "1m30s" },
        &mut job,
    )
    .unwrap();
    assert_eq!(job.started.to_rfc3339(), "2024-05-06T05:08:09+00:00");
    assert_eq!(job.timeout, Duration::from_secs(90));
}

#[test]
fn lists_of_structs_rebind_in_place() {
    let mut users = vec![User {
        uid: 1,
        nick_name: "first".into(),
        pass1: "p".into(),
    }];
    let src = vec![object! { "uid" => 10 }, object! { "uid" => 20, "nick" => "second" }];
    anyconv::to_structs(&src, &mut users).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].uid, 10);
    assert_eq!(users[0].nick_name, "first");
    assert_eq!(users[1].nick_name, "second");

    let mut boxed: Vec<Option<Box<User>>> = Vec::new();
    anyconv::to_structs(&r#"[{"uid": 1}, null]"#.to_owned(), &mut boxed).unwrap();
    assert_eq!(boxed[0].as_ref().map(|u| u.uid), Some(1));
    assert!(boxed[1].is_none());
}

#[test]
fn destination_kinds_are_checked() {
    let err = anyconv::to_struct(&object! { "uid" => 1 }, &mut 5i32).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);

    let err = anyconv::to_structs(&object! { "uid" => 1 }, &mut User::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);

    let err = anyconv::to_struct(&5i32, &mut User::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConversionFailure);
}

#[test]
fn scan_dispatches_on_the_destination() {
    let mut user = User::default();
    anyconv::scan(&object! { "uid" => 1 }, &mut user).unwrap();
    assert_eq!(user.uid, 1);

    let mut users: Vec<User> = Vec::new();
    anyconv::scan(&object! { "uid" => 2 }, &mut users).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].uid, 2);

    let mut dynamic = Value::Null;
    anyconv::scan(&user, &mut dynamic).unwrap();
    assert_eq!(dynamic.get("uid"), Some(&Value::Int(1)));

    let mut n = 0u16;
    anyconv::scan(&"12".to_owned(), &mut n).unwrap();
    assert_eq!(n, 12);

    let mut untouched = 9i32;
    anyconv::scan(&Value::Null, &mut untouched).unwrap();
    assert_eq!(untouched, 9);
}
