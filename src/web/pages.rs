//! HTML rendering for every page.

use std::fmt::Write;

use super::paths;
use crate::entity::{Note, User};
use crate::forms::{FormErrors, LoginForm, NoteForm, SignupForm};

/// Escape text for use in HTML bodies and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            r#"<a href="{home}">Home</a> <a href="{list}">My notes</a> <a href="{add}">Add note</a>
<span class="user">{name}</span>
<form method="post" action="{logout}" class="inline"><button type="submit">Log out</button></form>"#,
            home = paths::HOME,
            list = paths::LIST,
            add = paths::ADD,
            name = escape(&user.username),
            logout = paths::LOGOUT,
        ),
        None => format!(
            r#"<a href="{home}">Home</a> <a href="{login}">Log in</a> <a href="{signup}">Sign up</a>"#,
            home = paths::HOME,
            login = paths::LOGIN,
            signup = paths::SIGNUP,
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Notebox</title>
</head>
<body>
<nav>{nav}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        nav = nav,
        body = body,
    )
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<ul class="errorlist">"#);
    for message in messages {
        let _ = write!(out, "<li>{}</li>", escape(message));
    }
    out.push_str("</ul>");
    out
}

fn input(label: &str, name: &str, kind: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<p><label for="id_{name}">{label}</label>
<input type="{kind}" name="{name}" id="id_{name}" value="{value}">
{errors}</p>"#,
        label = label,
        name = name,
        kind = kind,
        value = escape(value),
        errors = error_list(errors.field(name)),
    )
}

pub fn home(user: Option<&User>) -> String {
    let body = match user {
        Some(user) => format!(
            r#"<h1>Notebox</h1>
<p>Welcome back, {}. <a href="{}">Open your notes</a>.</p>"#,
            escape(&user.username),
            paths::LIST
        ),
        None => format!(
            r#"<h1>Notebox</h1>
<p>Keep personal notes, each at its own short address. <a href="{}">Log in</a> or <a href="{}">sign up</a> to start.</p>"#,
            paths::LOGIN,
            paths::SIGNUP
        ),
    };
    layout("Home", user, &body)
}

pub fn note_list(user: &User, notes: &[Note]) -> String {
    let mut body = String::from("<h1>My notes</h1>\n");
    if notes.is_empty() {
        body.push_str(r#"<p class="empty">You have no notes yet.</p>"#);
    } else {
        body.push_str(r#"<ul class="object_list">"#);
        for note in notes {
            let _ = write!(
                body,
                r#"<li><a href="{}">{}</a></li>"#,
                escape(&paths::detail(&note.slug)),
                escape(&note.title)
            );
        }
        body.push_str("</ul>");
    }
    let _ = write!(body, "\n<p><a href=\"{}\">Add a note</a></p>", paths::ADD);
    layout("My notes", Some(user), &body)
}

/// The add/edit page. `action` is the URL the form posts to.
pub fn note_form(user: &User, heading: &str, action: &str, form: &NoteForm, errors: &FormErrors) -> String {
    let body = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}" id="note-form">
{non_field}
{title}
<p><label for="id_text">Text</label>
<textarea name="text" id="id_text">{text}</textarea>
{text_errors}</p>
{slug}
<p class="help">Leave the address empty to build it from the title.</p>
<button type="submit">Save</button>
</form>"#,
        heading = escape(heading),
        action = escape(action),
        non_field = error_list(errors.non_field()),
        title = input("Title", "title", "text", &form.title, errors),
        text = escape(&form.text),
        text_errors = error_list(errors.field("text")),
        slug = input("Address (slug)", "slug", "text", &form.slug, errors),
    );
    layout(heading, Some(user), &body)
}

pub fn note_detail(user: &User, note: &Note) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<div class="note-text">{text}</div>
<p><a href="{edit}">Edit</a> <a href="{delete}">Delete</a></p>"#,
        title = escape(&note.title),
        text = escape(&note.text),
        edit = escape(&paths::edit(&note.slug)),
        delete = escape(&paths::delete(&note.slug)),
    );
    layout(&note.title, Some(user), &body)
}

pub fn delete_confirm(user: &User, note: &Note) -> String {
    let body = format!(
        r#"<h1>Delete note</h1>
<p>Delete &laquo;{title}&raquo;? This cannot be undone.</p>
<form method="post" action="{action}" id="delete-form">
<button type="submit">Delete</button>
<a href="{detail}">Cancel</a>
</form>"#,
        title = escape(&note.title),
        action = escape(&paths::delete(&note.slug)),
        detail = escape(&paths::detail(&note.slug)),
    );
    layout("Delete note", Some(user), &body)
}

pub fn success(user: &User) -> String {
    let body = format!(
        r#"<h1>Done</h1>
<p>Your change was saved. <a href="{}">Back to your notes</a>.</p>"#,
        paths::LIST
    );
    layout("Done", Some(user), &body)
}

pub fn login(user: Option<&User>, form: &LoginForm, errors: &FormErrors) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="{action}" id="login-form">
{non_field}
{username}
{password}
<input type="hidden" name="next" value="{next}">
<button type="submit">Log in</button>
</form>
<p>No account? <a href="{signup}">Sign up</a>.</p>"#,
        action = paths::LOGIN,
        non_field = error_list(errors.non_field()),
        username = input("Username", "username", "text", &form.username, errors),
        password = input("Password", "password", "password", "", errors),
        next = escape(&form.next),
        signup = paths::SIGNUP,
    );
    layout("Log in", user, &body)
}

pub fn logged_out() -> String {
    let body = format!(
        r#"<h1>Logged out</h1>
<p>You have been logged out. <a href="{}">Log in again</a>.</p>"#,
        paths::LOGIN
    );
    layout("Logged out", None, &body)
}

pub fn signup(user: Option<&User>, form: &SignupForm, errors: &FormErrors) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
<form method="post" action="{action}" id="signup-form">
{non_field}
{username}
{password1}
{password2}
<button type="submit">Sign up</button>
</form>"#,
        action = paths::SIGNUP,
        non_field = error_list(errors.non_field()),
        username = input("Username", "username", "text", &form.username, errors),
        password1 = input("Password", "password1", "password", "", errors),
        password2 = input("Password confirmation", "password2", "password", "", errors),
    );
    layout("Sign up", user, &body)
}

pub fn not_found() -> String {
    layout(
        "Not found",
        None,
        "<h1>Not found</h1>\n<p>The page you asked for does not exist.</p>",
    )
}

pub fn server_error() -> String {
    layout(
        "Server error",
        None,
        "<h1>Server error</h1>\n<p>Something went wrong on our side.</p>",
    )
}
