use fury::model::{Slot, introspect};
use fury::{OrmError, Query, Record, Target, Value};

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct User {
    #[orm(flags = "primary_key")]
    user_id: i32,
    #[orm(flags = "auto_increment")]
    counter: i32,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Profile {
    #[orm(flags = "Primary_Key, AUTO_INCREMENT")]
    id: i64,
    display_name: String,
    bio: Option<String>,
    #[orm(ignore)]
    scratch: Vec<std::collections::HashMap<String, String>>,
    #[orm(flags = "unknown_flag")]
    score: f64,
}

#[test]
fn derive_emits_lowercased_names() {
    assert_eq!(User::NAME, "user");
    assert_eq!(Profile::NAME, "profile");

    let names: Vec<&str> = Profile::fields().iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["id", "display_name", "bio", "scratch", "score"]);
}

#[test]
fn derive_emits_flags_and_ignore() {
    let fields = Profile::fields();
    assert_eq!(fields[0].flags, "Primary_Key, AUTO_INCREMENT");
    assert!(!fields[0].ignored);
    assert!(fields[3].ignored);
    assert_eq!(fields[4].flags, "unknown_flag");

    let model = introspect(&Target::One(&mut Profile::default())).unwrap().1;
    let id = model.field("id").unwrap();
    assert!(id.is_primary_key());
    assert!(id.is_auto_increment());
    let score = model.field("score").unwrap();
    assert!(!score.is_primary_key());
    assert!(!score.is_auto_increment());
    assert_eq!(model.primary_keys().count(), 1);
}

#[test]
fn derive_accessors() {
    let mut profile = Profile {
        id: 7,
        display_name: "ada".into(),
        bio: None,
        scratch: vec![Default::default()],
        score: 0.0,
    };

    assert_eq!(profile.value(0), Value::Int8(7));
    assert_eq!(profile.value(1), Value::Text("ada".into()));
    assert_eq!(profile.value(2), Value::Null);
    assert_eq!(profile.value(3), Value::Null);

    assert!(!profile.is_zero(0));
    assert!(profile.is_zero(2));
    assert!(profile.is_zero(4));
    assert!(!profile.is_zero(3));

    profile.set_value(2, Value::Text("hello".into())).unwrap();
    profile.set_value(4, Value::Float8(1.5)).unwrap();
    profile.set_value(3, Value::Text("ignored".into())).unwrap();
    assert_eq!(profile.bio.as_deref(), Some("hello"));
    assert_eq!(profile.score, 1.5);
    assert_eq!(profile.scratch.len(), 1);
}

#[test]
fn derive_set_value_reports_column() {
    let mut user = User::default();
    let err = user.set_value(0, Value::Text("x".into())).unwrap_err();
    match err {
        OrmError::Decode { column, .. } => assert_eq!(column, "user_id"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = user.set_value(1, Value::Null).unwrap_err();
    assert!(matches!(err, OrmError::Decode { .. }));
}

#[test]
fn derived_record_drives_synthesis() {
    let mut user = User {
        user_id: 123,
        counter: 1,
    };
    let query = Query::new(&mut user).unwrap();

    assert_eq!(
        query.build_insert(0).unwrap().sql,
        "INSERT INTO user(user_id) VALUES($1);"
    );
    assert_eq!(
        query.build_update(0).unwrap().sql,
        "UPDATE user SET (user_id,counter) = ($1,$2) WHERE user.user_id = $3;"
    );
    assert_eq!(
        query.build_delete(0).unwrap().sql,
        "DELETE FROM user WHERE user.user_id = $1;"
    );
}

#[test]
fn empty_list_discovers_columns() {
    let mut profiles: Vec<Profile> = Vec::new();
    let (list, primary) = introspect(&Target::Many(&mut profiles)).unwrap();
    assert!(list.is_empty());
    assert_eq!(primary.slot(), Slot::Template);

    let (columns, values) = primary.column_values(&Profile::default(), true);
    assert_eq!(columns, vec!["display_name", "bio", "score"]);
    assert_eq!(
        values,
        vec![Value::Text(String::new()), Value::Null, Value::Float8(0.0)]
    );
}
