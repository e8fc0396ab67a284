//! Server-rendered HTML pages.
//!
//! Plain string templates behind small functions; no client framework.
//! All dynamic text goes through [`escape_html`].

use crate::notes::forms::{FormErrors, NoteForm};
use crate::store::Note;
use axum::http::StatusCode;

/// Escape text for safe interpolation into HTML.
pub fn escape_html(text: &str) -> String {
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

/// Shared page shell.
fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Notekeeper</title>
</head>
<body>
<header>
  <nav>
    <a href="/">Home</a>
    <a href="/notes">My notes</a>
    <a href="/notes/add">Add note</a>
    <a href="/auth/logout">Log out</a>
  </nav>
</header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

fn field_error(errors: &FormErrors, field: &str) -> String {
    match errors.get(field) {
        Some(msg) => format!(
            r#"<p class="field-error">{}</p>"#,
            escape_html(msg)
        ),
        None => String::new(),
    }
}

// ============================================================================
// Public pages
// ============================================================================

pub fn home_page() -> String {
    layout(
        "Welcome",
        r#"<h1>Notekeeper</h1>
<p>Your personal notes, one slug at a time.</p>
<p><a href="/auth/login">Log in</a> or <a href="/auth/signup">sign up</a> to get started.</p>"#,
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    layout(
        &status.to_string(),
        &format!(
            "<h1>{}</h1>\n<p>{}</p>",
            status.as_u16(),
            escape_html(message)
        ),
    )
}

// ============================================================================
// Auth pages
// ============================================================================

/// Login form. `error` re-renders after a failed attempt; `next` is carried
/// through as a hidden field so the post-login redirect lands back where
/// the user was headed.
pub fn login_page(username: &str, next: Option<&str>, error: Option<&str>) -> String {
    let error_html = match error {
        Some(msg) => format!(r#"<p class="form-error">{}</p>"#, escape_html(msg)),
        None => String::new(),
    };
    let next_field = match next {
        Some(url) => format!(
            r#"<input type="hidden" name="next" value="{}">"#,
            escape_html(url)
        ),
        None => String::new(),
    };
    layout(
        "Log in",
        &format!(
            r#"<h1>Log in</h1>
{error_html}
<form method="post" action="/auth/login">
  {next_field}
  <label>Username <input type="text" name="username" value="{username}" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/auth/signup">Sign up</a>.</p>"#,
            error_html = error_html,
            next_field = next_field,
            username = escape_html(username),
        ),
    )
}

pub fn signup_page(username: &str, error: Option<&str>) -> String {
    let error_html = match error {
        Some(msg) => format!(r#"<p class="form-error">{}</p>"#, escape_html(msg)),
        None => String::new(),
    };
    layout(
        "Sign up",
        &format!(
            r#"<h1>Sign up</h1>
{error_html}
<form method="post" action="/auth/signup">
  <label>Username <input type="text" name="username" value="{username}" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Create account</button>
</form>"#,
            error_html = error_html,
            username = escape_html(username),
        ),
    )
}

pub fn logout_page() -> String {
    layout(
        "Logged out",
        r#"<h1>You are logged out</h1>
<p><a href="/auth/login">Log in again</a></p>"#,
    )
}

// ============================================================================
// Note pages
// ============================================================================

pub fn note_list_page(notes: &[Note]) -> String {
    let items = if notes.is_empty() {
        "<p>No notes yet. <a href=\"/notes/add\">Add your first one</a>.</p>".to_string()
    } else {
        let rows: String = notes
            .iter()
            .map(|n| {
                format!(
                    r#"  <li><a href="/notes/{slug}">{title}</a></li>
"#,
                    slug = escape_html(&n.slug),
                    title = escape_html(&n.title),
                )
            })
            .collect();
        format!("<ul class=\"note-list\">\n{}</ul>", rows)
    };
    layout("My notes", &format!("<h1>My notes</h1>\n{}", items))
}

pub fn note_detail_page(note: &Note) -> String {
    layout(
        &note.title,
        &format!(
            r#"<article class="note">
<h1>{title}</h1>
<p class="note-body">{body}</p>
</article>
<a href="/notes/{slug}/edit">Edit</a>
<form method="post" action="/notes/{slug}/delete">
  <button type="submit">Delete</button>
</form>"#,
            title = escape_html(&note.title),
            body = escape_html(&note.body),
            slug = escape_html(&note.slug),
        ),
    )
}

/// Add/edit form. Renders the submitted values back on validation failure
/// with per-field errors inline.
pub fn note_form_page(heading: &str, action: &str, form: &NoteForm, errors: &FormErrors) -> String {
    layout(
        heading,
        &format!(
            r#"<h1>{heading}</h1>
<form method="post" action="{action}" class="note-form">
  <label>Title <input type="text" name="title" value="{title}"></label>
  {title_error}
  <label>Text <textarea name="body">{body}</textarea></label>
  {body_error}
  <label>Slug <input type="text" name="slug" value="{slug}"></label>
  {slug_error}
  <button type="submit">Save</button>
</form>"#,
            heading = escape_html(heading),
            action = escape_html(action),
            title = escape_html(&form.title),
            title_error = field_error(errors, "title"),
            body = escape_html(&form.body),
            body_error = field_error(errors, "body"),
            slug = escape_html(&form.slug),
            slug_error = field_error(errors, "slug"),
        ),
    )
}

pub fn success_page() -> String {
    layout(
        "Done",
        r#"<h1>Done!</h1>
<p>Your change was saved.</p>
<p><a href="/notes">Back to my notes</a></p>"#,
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_note(title: &str, slug: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: "body".to_string(),
            slug: slug.to_string(),
            author_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_note_detail_escapes_content() {
        let note = sample_note("<b>Title</b>", "slug");
        let html = note_detail_page(&note);
        assert!(html.contains("&lt;b&gt;Title&lt;/b&gt;"));
        assert!(!html.contains("<b>Title</b>"));
    }

    #[test]
    fn test_note_list_links_each_note() {
        let notes = vec![sample_note("First", "first"), sample_note("Second", "second")];
        let html = note_list_page(&notes);
        assert!(html.contains(r#"href="/notes/first""#));
        assert!(html.contains(r#"href="/notes/second""#));
    }

    #[test]
    fn test_form_renders_field_errors() {
        let form = NoteForm {
            title: "Title".into(),
            body: "Body".into(),
            slug: "dup".into(),
        };
        let mut errors = FormErrors::default();
        errors.push("slug", "dup is taken");
        let html = note_form_page("Add a note", "/notes/add", &form, &errors);
        assert!(html.contains(r#"class="field-error""#));
        assert!(html.contains("dup is taken"));
        assert!(html.contains(r#"value="dup""#));
    }

    #[test]
    fn test_login_page_carries_next() {
        let html = login_page("", Some("/notes/secret"), None);
        assert!(html.contains(r#"name="next" value="/notes/secret""#));
    }
}
