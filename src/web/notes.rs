use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use super::{found, pages, paths, AppState, CurrentUser, RequireUser, WebError};
use crate::entity::{Note, User};
use crate::error::NoteboxError;
use crate::forms::{FormErrors, NoteForm, Validated, WARNING};
use crate::storage::SqliteStore;

type HandlerResult<T> = Result<T, WebError>;

pub async fn home(CurrentUser(user): CurrentUser) -> Html<String> {
    Html(pages::home(user.as_ref()))
}

pub async fn list(State(state): State<AppState>, RequireUser(user): RequireUser) -> HandlerResult<Html<String>> {
    let notes = {
        let store = state.store.lock().await;
        store.list_notes_for_author(user.id)?
    };
    Ok(Html(pages::note_list(&user, &notes)))
}

pub async fn add_form(RequireUser(user): RequireUser) -> Html<String> {
    Html(pages::note_form(
        &user,
        "Add note",
        paths::ADD,
        &NoteForm::default(),
        &FormErrors::new(),
    ))
}

pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<NoteForm>,
) -> HandlerResult<Response> {
    let store = state.store.lock().await;

    let draft = match form.validate(&store, None)? {
        Validated::Valid(draft) => draft,
        Validated::Invalid(errors) => return Ok(add_page(&user, &form, &errors)),
    };

    match store.create_note(user.id, &draft) {
        Ok(note) => {
            tracing::info!(user = %user.username, slug = %note.slug, "note created");
            Ok(found(paths::SUCCESS))
        }
        Err(e) => Ok(add_page(&user, &form, &form_errors_for(e)?)),
    }
}

pub async fn detail(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(slug): Path<String>,
) -> HandlerResult<Html<String>> {
    let note = {
        let store = state.store.lock().await;
        owned_note(&store, &slug, &user)?
    };
    Ok(Html(pages::note_detail(&user, &note)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(slug): Path<String>,
) -> HandlerResult<Html<String>> {
    let note = {
        let store = state.store.lock().await;
        owned_note(&store, &slug, &user)?
    };
    Ok(Html(pages::note_form(
        &user,
        "Edit note",
        &paths::edit(&note.slug),
        &NoteForm::from_note(&note),
        &FormErrors::new(),
    )))
}

pub async fn edit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> HandlerResult<Response> {
    let store = state.store.lock().await;
    let note = owned_note(&store, &slug, &user)?;

    let draft = match form.validate(&store, Some(note.id))? {
        Validated::Valid(draft) => draft,
        Validated::Invalid(errors) => return Ok(edit_page(&user, &note, &form, &errors)),
    };

    match store.update_note(note.id, user.id, &draft) {
        Ok(updated) => {
            tracing::info!(user = %user.username, from = %note.slug, to = %updated.slug, "note updated");
            Ok(found(paths::SUCCESS))
        }
        Err(e) => Ok(edit_page(&user, &note, &form, &form_errors_for(e)?)),
    }
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(slug): Path<String>,
) -> HandlerResult<Html<String>> {
    let note = {
        let store = state.store.lock().await;
        owned_note(&store, &slug, &user)?
    };
    Ok(Html(pages::delete_confirm(&user, &note)))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(slug): Path<String>,
) -> HandlerResult<Response> {
    let store = state.store.lock().await;
    let note = owned_note(&store, &slug, &user)?;

    if !store.delete_note(note.id, user.id)? {
        return Err(WebError::NotFound);
    }
    tracing::info!(user = %user.username, slug = %note.slug, "note deleted");
    Ok(found(paths::SUCCESS))
}

pub async fn success(RequireUser(user): RequireUser) -> Html<String> {
    Html(pages::success(&user))
}

/// The note at `slug`, if `user` wrote it; anything else is not found
fn owned_note(store: &SqliteStore, slug: &str, user: &User) -> HandlerResult<Note> {
    store
        .note_for_author(slug, user.id)?
        .ok_or(WebError::NotFound)
}

/// Form errors for a failed write. A unique-slug violation (lost race with a
/// concurrent save) reads the same as the validation pre-check; anything else
/// is a server error.
fn form_errors_for(err: NoteboxError) -> HandlerResult<FormErrors> {
    match err {
        NoteboxError::SlugTaken(slug) => {
            let mut errors = FormErrors::new();
            errors.add("slug", format!("{}{}", slug, WARNING));
            Ok(errors)
        }
        other => Err(other.into()),
    }
}

fn add_page(user: &User, form: &NoteForm, errors: &FormErrors) -> Response {
    Html(pages::note_form(user, "Add note", paths::ADD, form, errors)).into_response()
}

fn edit_page(user: &User, note: &Note, form: &NoteForm, errors: &FormErrors) -> Response {
    Html(pages::note_form(
        user,
        "Edit note",
        &paths::edit(&note.slug),
        form,
        errors,
    ))
    .into_response()
}
