//! End-to-end post lifecycle over a file-backed store.

use std::sync::Arc;

use planner_core::domain::{PostId, Status, StatusFilter};
use planner_core::ports::{KeyValueStore, KeyValueStoreExt, PostRepository};
use planner_core::session::DraftEdit;
use planner_core::{Action, Outcome, Session, View};
use planner_infra::{FileStore, POSTS_KEY, StoredPostRepository};

fn open_session(dir: &std::path::Path) -> (Session<StoredPostRepository>, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir).unwrap());
    let repo = StoredPostRepository::load(store.clone());
    (Session::new(repo, store.clone()), store)
}

fn save_text(session: &mut Session<StoredPostRepository>, text: &str, status: Status) -> PostId {
    session.dispatch(Action::NewPost).unwrap();
    session
        .dispatch(Action::Edit(DraftEdit::SetText {
            index: 0,
            text: text.to_string(),
        }))
        .unwrap();
    session
        .dispatch(Action::Edit(DraftEdit::SetStatus(status)))
        .unwrap();
    match session.dispatch(Action::Save).unwrap() {
        Outcome::Saved { post, .. } => post.id().clone(),
        other => panic!("expected save, got {other:?}"),
    }
}

#[test]
fn test_create_then_edit_status() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = open_session(dir.path());
    let before = session.posts().len();

    session.dispatch(Action::NewPost).unwrap();
    session
        .dispatch(Action::Edit(DraftEdit::SetText {
            index: 0,
            text: "hello".into(),
        }))
        .unwrap();
    let created_at = session.draft().unwrap().body().created_at();
    let Outcome::Saved { post, .. } = session.dispatch(Action::Save).unwrap() else {
        panic!("expected save");
    };

    assert_eq!(session.posts().len(), before + 1);
    assert!(post.id().millis().is_some());
    assert_eq!(post.body().created_at(), created_at);
    assert_eq!(post.body().scheduled_at(), None);
    assert_eq!(post.status(), Status::Idea);

    // Second record so the edited one is not at the front.
    save_text(&mut session, "newer", Status::Perfect);
    let position = session
        .posts()
        .iter()
        .position(|p| p.id() == post.id())
        .unwrap();

    session.dispatch(Action::EditPost(post.id().clone())).unwrap();
    session
        .dispatch(Action::Edit(DraftEdit::SetStatus(Status::ReadyToPost)))
        .unwrap();
    session.dispatch(Action::Save).unwrap();

    assert_eq!(session.posts().len(), before + 2);
    let stored = &session.posts()[position];
    assert_eq!(stored.id(), post.id());
    assert_eq!(stored.status(), Status::ReadyToPost);
    assert_eq!(stored.body().content(), post.body().content());
    assert_eq!(stored.body().created_at(), post.body().created_at());
    assert_eq!(stored.body().tones(), post.body().tones());
}

#[test]
fn test_filter_by_status() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = open_session(dir.path());

    save_text(&mut session, "one", Status::Idea);
    let ready = save_text(&mut session, "two", Status::ReadyToPost);
    save_text(&mut session, "three", Status::Perfect);

    session
        .dispatch(Action::SetFilter(StatusFilter::Only(Status::ReadyToPost)))
        .unwrap();
    let visible = session.visible_posts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), &ready);
}

#[test]
fn test_delete_open_draft() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = open_session(dir.path());
    let id = save_text(&mut session, "bye", Status::Idea);

    session.dispatch(Action::EditPost(id.clone())).unwrap();
    assert_eq!(session.view(), View::Editor);

    session.dispatch(Action::Delete(id)).unwrap();
    assert_eq!(session.view(), View::Dashboard);
    assert!(session.draft().is_none());
    assert!(session.posts().is_empty());
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let ids = {
        let (mut session, _) = open_session(dir.path());
        let a = save_text(&mut session, "a", Status::Idea);
        let b = save_text(&mut session, "b", Status::Perfect);
        session.dispatch(Action::ToggleTheme).unwrap();
        vec![b, a]
    };

    let (session, store) = open_session(dir.path());
    let reloaded: Vec<PostId> = session.posts().iter().map(|p| p.id().clone()).collect();
    assert_eq!(reloaded, ids);
    assert!(!session.theme().is_dark());
    assert_eq!(session.repository().list().len(), 2);

    let raw: serde_json::Value = store.read_json(POSTS_KEY).unwrap().unwrap();
    assert_eq!(raw["version"], 1);
    assert_eq!(raw["posts"][0]["status"], "Perfect");
}

#[test]
fn test_legacy_file_is_upgraded_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(format!("{POSTS_KEY}.json")),
        r#"[{"id":"1","content":[{"text":"legacy"}],"status":"Idea","tones":[],"createdAt":"2024-05-01T10:00:00Z"}]"#,
    )
    .unwrap();

    let (mut session, store) = open_session(dir.path());
    assert_eq!(session.posts().len(), 1);
    assert_eq!(session.posts()[0].body().content().first().text, "legacy");

    save_text(&mut session, "fresh", Status::Idea);

    let raw: serde_json::Value = store.read_json(POSTS_KEY).unwrap().unwrap();
    assert_eq!(raw["version"], 1);
    assert_eq!(raw["posts"].as_array().unwrap().len(), 2);
}
