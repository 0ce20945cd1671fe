//! Statement AST composition and checked projections.

use huddle_sql::*;
use serde_json::json;

struct Member;
impl Selectable for Member {
    fn schema() -> Schema {
        Schema::new("member")
            .field("id", FieldKind::scalar())
            .field("nickname", FieldKind::scalar())
            .field("joined", FieldKind::date())
    }
}

struct Channel;
impl Selectable for Channel {
    fn schema() -> Schema {
        Schema::new("channel")
            .field("id", FieldKind::scalar())
            .field("name", FieldKind::scalar())
            .field("members", FieldKind::records::<Member>())
            .field("parent", FieldKind::record::<Channel>())
    }
}

#[derive(serde::Serialize)]
struct NewChannel<'a> {
    name: &'a str,
    owner: &'a str,
    topics: Vec<&'a str>,
}

#[test]
fn test_create_from_serializable_record() {
    let record = NewChannel {
        name: "ops",
        owner: "$auth.id",
        topics: vec!["incidents", "$topic"],
    };
    let create = Create::from_record("channel", &record)
        .unwrap()
        .returning(Return::After);
    assert_eq!(
        render_trimmed(&create),
        "CREATE channel CONTENT {name:\"ops\",owner:$auth.id,topics:[\"incidents\",$topic]} RETURN AFTER"
    );
}

#[test]
fn test_checked_select_accepts_nested_paths() {
    let select = Select::new("channel")
        .checked_fields::<Channel>(["name", "members.nickname"])
        .unwrap();
    assert_eq!(select.fields, Fields::List(vec!["name".into(), "members.nickname".into()]));
    assert_eq!(render(&select), "SELECT name,members.nickname FROM channel ");
}

#[test]
fn test_checked_select_rejects_unknown_path() {
    let err = Select::new("channel")
        .checked_fields::<Channel>(["parent.name"])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown field path `parent.name` on record `channel`"
    );
}

#[test]
fn test_checked_return_fields() {
    let ret = Return::checked_fields::<Channel>(["id", "members.joined"]).unwrap();
    let stmt = Create::new("channel", json!({ "name": "ops" })).returning(ret);
    assert_eq!(
        render(&stmt),
        "CREATE channel CONTENT {name:\"ops\"} RETURN id,members.joined "
    );
    assert!(Return::checked_fields::<Channel>(["members.email"]).is_err());
}

#[test]
fn test_transaction_of_structured_statements() {
    let stmt = Statement::transaction([
        Statement::from(Let::new(
            "channel",
            Wrap::new(Create::new("channel", json!({ "name": "ops" }))).append("[0]"),
        )),
        Relate::new("$auth", "member_of", "$channel.id")
            .content(json!({ "role": "owner" }))
            .into(),
        Statement::raw("RETURN $channel"),
    ]);

    assert_eq!(
        render(&stmt),
        "BEGIN TRANSACTION; LET $channel = (CREATE channel CONTENT {name:\"ops\"}) [0]; \
         RELATE $auth->member_of->$channel.id CONTENT {role:\"owner\"} RETURN NONE; \
         RETURN $channel; COMMIT TRANSACTION "
    );
}

#[test]
fn test_if_statement_with_structured_branches() {
    let stmt = IfStmt::new(
        Cond::matching([("$member.role", json!("admin"))]),
        Delete::new("message:1"),
    )
    .otherwise(Statement::raw("THROW \"forbidden\""));

    assert_eq!(
        render(&stmt),
        "IF $member.role=\"admin\" THEN DELETE message:1 RETURN NONE ELSE THROW \"forbidden\" END "
    );
}

#[test]
fn test_statements_compare_structurally() {
    let a = Update::new("task:1").set("done", Assignment::assign(true));
    let b = Update::new("task:1").set("done", Assignment::from(json!(true)));
    assert_eq!(a, b);
    assert_ne!(a, Update::new("task:1").set("done", Assignment::assign(false)));
}

#[test]
fn test_display_of_statement_matches_trimmed_render() {
    let stmt = Statement::multi(["SELECT * FROM a", "SELECT * FROM b"]);
    assert_eq!(stmt.to_string(), render(&stmt).trim_end());
}
