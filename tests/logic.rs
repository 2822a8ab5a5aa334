mod common;

use axum::http::StatusCode;
use common::TestApp;
use notebox::forms::WARNING;
use notebox::slug::slugify;

const SLUG_NOTE_UNIQUE: &str = "slug1";
const SLUG_NOTE_EDITED: &str = "slug_new";
const URL_ADD: &str = "/notes/add";
const URL_SUCCESS: &str = "/notes/success";

fn form_data() -> Vec<(&'static str, &'static str)> {
    vec![("text", "text_2"), ("title", "title_2")]
}

#[tokio::test]
async fn test_anonymous_user_cant_create_note() {
    let app = TestApp::new();
    let user = app.create_user("Пользователь-Автор-1").await;
    app.create_note(&user, "title_1", "text_1", SLUG_NOTE_UNIQUE)
        .await;

    let before = app.note_count().await;
    let response = app.anonymous().post(URL_ADD, &form_data()).await;
    response.assert_redirects("/users/login?next=/notes/add");
    assert_eq!(app.note_count().await, before);
}

#[tokio::test]
async fn test_authorized_user_can_create_note() {
    let app = TestApp::new();
    let user = app.create_user("Пользователь-Автор-1").await;
    let client = app.client_for(&user).await;

    let response = client.post(URL_ADD, &form_data()).await;
    response.assert_redirects(URL_SUCCESS);

    assert_eq!(app.note_count_for(&user).await, 1);
    let created = app.latest_note().await;
    assert_eq!(created.title, "title_2");
    assert_eq!(created.text, "text_2");
    assert_eq!(created.author, user.id);
}

#[tokio::test]
async fn test_same_slug() {
    let app = TestApp::new();
    let user = app.create_user("Пользователь-Автор-1").await;
    let note = app
        .create_note(&user, "title_1", "text_1", SLUG_NOTE_UNIQUE)
        .await;
    let client = app.client_for(&user).await;

    let before = app.note_count().await;
    let response = client.post(URL_ADD, &[("slug", SLUG_NOTE_UNIQUE)]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(&format!("<li>{}{}</li>", note.slug, WARNING)));
    assert_eq!(app.note_count().await, before);
}

#[tokio::test]
async fn test_same_derived_slug() {
    let app = TestApp::new();
    let user = app.create_user("author").await;
    app.create_note(&user, "Title", "Text", "zagolovok").await;
    let client = app.client_for(&user).await;

    let response = client
        .post(URL_ADD, &[("title", "Заголовок"), ("text", "Текст")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(&format!("zagolovok{}", WARNING)));
    assert_eq!(app.note_count().await, 1);
}

#[tokio::test]
async fn test_slugify_works() {
    let app = TestApp::new();
    let user = app.create_user("Пользователь-Автор-1").await;
    let client = app.client_for(&user).await;

    client.post(URL_ADD, &form_data()).await;
    assert_eq!(app.note_count_for(&user).await, 1);

    let expected: String = slugify("title_2").chars().take(100).collect();
    assert_eq!(app.latest_note().await.slug, expected);
}

#[tokio::test]
async fn test_slugify_cyrillic_title() {
    let app = TestApp::new();
    let user = app.create_user("author").await;
    let client = app.client_for(&user).await;

    let response = client
        .post(URL_ADD, &[("title", "Заголовок"), ("text", "Текст")])
        .await;
    response.assert_redirects(URL_SUCCESS);

    let expected: String = slugify("Заголовок").chars().take(100).collect();
    assert_eq!(app.latest_note().await.slug, expected);
    assert_eq!(expected, "zagolovok");
}

struct EditFixture {
    app: TestApp,
    author_user: notebox::entity::User,
    author: common::Client,
    reader: common::Client,
    note: notebox::entity::Note,
}

const OLD_NOTE_TEXT: &str = "OLD TEXT";
const NEW_NOTE_TEXT: &str = "UPDATED TEXT";

async fn edit_fixture() -> EditFixture {
    let app = TestApp::new();
    let author = app.create_user("Пользователь-Автор").await;
    let note = app
        .create_note(&author, "title1", OLD_NOTE_TEXT, SLUG_NOTE_UNIQUE)
        .await;
    let reader = app.create_user("Пользователь-Читатель").await;
    EditFixture {
        author: app.client_for(&author).await,
        author_user: author,
        reader: app.client_for(&reader).await,
        app,
        note,
    }
}

fn edit_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("text", NEW_NOTE_TEXT),
        ("title", "title_new"),
        ("slug", SLUG_NOTE_EDITED),
    ]
}

#[tokio::test]
async fn test_author_can_delete_note() {
    let f = edit_fixture().await;
    let before = f.app.note_count().await;

    let response = f.author.delete(&format!("/notes/{}/delete", SLUG_NOTE_UNIQUE)).await;
    response.assert_redirects(URL_SUCCESS);
    assert_eq!(f.app.note_count().await, before - 1);
}

#[tokio::test]
async fn test_author_can_delete_note_with_post() {
    let f = edit_fixture().await;

    let response = f
        .author
        .post(&format!("/notes/{}/delete", SLUG_NOTE_UNIQUE), &[])
        .await;
    response.assert_redirects(URL_SUCCESS);
    assert!(f.app.get_note(f.note.id).await.is_none());
}

#[tokio::test]
async fn test_user_cant_delete_note_of_another_user() {
    let f = edit_fixture().await;
    let before = f.app.note_count().await;

    let response = f.reader.delete(&format!("/notes/{}/delete", SLUG_NOTE_UNIQUE)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(f.app.note_count().await, before);
}

#[tokio::test]
async fn test_author_can_edit_note() {
    let f = edit_fixture().await;
    let before = f.app.note_count().await;

    let response = f
        .author
        .post(&format!("/notes/{}/edit", SLUG_NOTE_UNIQUE), &edit_form())
        .await;
    response.assert_redirects(URL_SUCCESS);

    let edited = f.app.get_note(f.note.id).await.unwrap();
    assert_eq!(f.app.note_count().await, before);
    assert_eq!(edited.text, NEW_NOTE_TEXT);
    assert_eq!(edited.title, "title_new");
    assert_eq!(edited.slug, SLUG_NOTE_EDITED);
}

#[tokio::test]
async fn test_author_can_keep_slug_when_editing() {
    let f = edit_fixture().await;

    let response = f
        .author
        .post(
            &format!("/notes/{}/edit", SLUG_NOTE_UNIQUE),
            &[("title", "title1"), ("text", NEW_NOTE_TEXT), ("slug", SLUG_NOTE_UNIQUE)],
        )
        .await;
    response.assert_redirects(URL_SUCCESS);
    assert_eq!(f.app.get_note(f.note.id).await.unwrap().text, NEW_NOTE_TEXT);
}

#[tokio::test]
async fn test_user_cant_edit_note_of_another_user() {
    let f = edit_fixture().await;
    let before = f.app.note_count().await;

    let response = f
        .reader
        .post(&format!("/notes/{}/edit", SLUG_NOTE_UNIQUE), &edit_form())
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let unedited = f.app.get_note(f.note.id).await.unwrap();
    assert_eq!(f.app.note_count().await, before);
    assert_eq!(unedited, f.note);
}

#[tokio::test]
async fn test_edit_to_taken_slug_is_rejected() {
    let f = edit_fixture().await;
    f.app
        .create_note(&f.author_user, "Other", "Text", "other")
        .await;

    let response = f
        .author
        .post(
            &format!("/notes/{}/edit", SLUG_NOTE_UNIQUE),
            &[("title", "title1"), ("text", "Text"), ("slug", "other")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(&format!("other{}", WARNING)));
    assert_eq!(f.app.get_note(f.note.id).await.unwrap().slug, SLUG_NOTE_UNIQUE);
}
