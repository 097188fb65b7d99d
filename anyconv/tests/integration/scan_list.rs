use anyconv::{ErrorCode, Reflect, Value, object};
use anyconv_testhelpers::test;

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct EntityUser {
    uid: i64,
    name: String,
}

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct EntityUserDetail {
    uid: i64,
    address: String,
}

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct EntityUserScores {
    id: i64,
    uid: i64,
    score: i64,
}

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
struct Entity {
    user: Option<Box<EntityUser>>,
    user_detail: Option<EntityUserDetail>,
    user_scores: Vec<EntityUserScores>,
}

fn users() -> Vec<Value> {
    vec![
        object! { "uid" => 1, "name" => "john" },
        object! { "uid" => 2, "name" => "smith" },
    ]
}

fn details() -> Vec<Value> {
    vec![
        object! { "uid" => 2, "address" => "beijing" },
        object! { "uid" => 1, "address" => "shanghai" },
    ]
}

fn scores() -> Vec<Value> {
    vec![
        object! { "id" => 10, "uid" => 1, "score" => 90 },
        object! { "id" => 11, "uid" => 1, "score" => 80 },
        object! { "id" => 12, "uid" => 2, "score" => 70 },
    ]
}

fn entities() -> Vec<Entity> {
    let mut entities = Vec::new();
    anyconv::scan_list(&users(), &mut entities, "User", "", "").unwrap();
    entities
}

#[test]
fn records_bind_by_position() {
    let entities = entities();
    assert_eq!(entities.len(), 2);
    assert_eq!(
        entities[1].user.as_deref(),
        Some(&EntityUser {
            uid: 2,
            name: "smith".into(),
        })
    );
    assert_eq!(entities[0].user_detail, None);
}

#[test]
fn one_to_one_by_relation() {
    let mut entities = entities();
    anyconv::scan_list(&details(), &mut entities, "UserDetail", "User", "uid:Uid").unwrap();

    let addresses: Vec<_> = entities
        .iter()
        .map(|e| e.user_detail.as_ref().map(|d| d.address.as_str()))
        .collect();
    assert_eq!(addresses, [Some("shanghai"), Some("beijing")]);
}

#[test]
fn one_to_many_by_relation() {
    let mut entities = entities();
    anyconv::scan_list(&scores(), &mut entities, "UserScores", "User", "uid:Uid").unwrap();

    let ids: Vec<Vec<i64>> = entities
        .iter()
        .map(|e| e.user_scores.iter().map(|s| s.id).collect())
        .collect();
    assert_eq!(ids, [vec![10, 11], vec![12]]);
    assert_eq!(entities[0].user_scores[1].score, 80);
}

#[test]
fn relation_on_the_entity_itself() {
    #[derive(Reflect, Clone, Default)]
    struct Flat {
        uid: i64,
        detail: Option<EntityUserDetail>,
    }

    let mut flats = vec![
        Flat {
            uid: 1,
            detail: None,
        },
        Flat {
            uid: 3,
            detail: None,
        },
    ];
    anyconv::scan_list(&details(), &mut flats, "Detail", "", "uid").unwrap();
    assert_eq!(flats[0].detail.as_ref().map(|d| d.uid), Some(1));
    assert_eq!(flats[1].detail, None);
}

#[test]
fn json_records_and_wrapped_entities() {
    let mut entities: Vec<Option<Box<Entity>>> = Vec::new();
    anyconv::scan_list(
        &r#"[{"uid": 5, "name": "json"}]"#.to_owned(),
        &mut entities,
        "User",
        "",
        "",
    )
    .unwrap();
    let user = entities[0].as_ref().and_then(|e| e.user.as_ref());
    assert_eq!(user.map(|u| u.uid), Some(5));
}

#[test]
fn empty_records_are_a_no_op() {
    let mut entities = entities();
    let before = entities.clone();
    anyconv::scan_list(&Vec::<Value>::new(), &mut entities, "UserDetail", "User", "uid:Uid").unwrap();
    anyconv::scan_list(&Value::Null, &mut entities, "UserDetail", "User", "uid:Uid").unwrap();
    assert_eq!(entities, before);
}

#[test]
fn bad_arguments() {
    let mut entities = entities();
    let cases: [(&str, &str, &str); 5] = [
        ("", "", ""),
        ("Nope", "", ""),
        ("UserScores", "", ""),
        ("UserDetail", "Nope", "uid:Uid"),
        ("UserDetail", "User", "missing:Uid"),
    ];
    for (bind_to, relation_attr, relation) in cases {
        let err = anyconv::scan_list(&details(), &mut entities, bind_to, relation_attr, relation).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter, "{bind_to} {relation_attr} {relation}");
    }

    let mut single = Entity::default();
    let err = anyconv::scan_list(&users(), &mut single, "User", "", "").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameter);
}
