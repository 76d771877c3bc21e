//! Server-rendered HTML for the signup, verification, login and task pages.

use crate::databases::auth::pending::SignupData;
use crate::databases::todo::tasks::{Task, TaskStatus};
use crate::services::validation::{errors_for, FieldError};
use crate::session::Flash;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn layout(title: &str, flash: Option<&Flash>, authenticated: bool, body: &str) -> String {
    let nav = if authenticated {
        r#"<a href="/">Home</a> <a href="/conquer">Conquer</a> <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/">Home</a> <a href="/sign-up">Sign up</a> <a href="/login">Log in</a>"#
    };
    let flash = flash
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                escape(&f.category),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav>{nav}</nav>
{flash}
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

fn field_errors(errors: &[FieldError], field: &str) -> String {
    errors_for(errors, field)
        .map(|message| format!(r#"<span class="error">{}</span>"#, escape(message)))
        .collect()
}

pub fn home(flash: Option<&Flash>, authenticated: bool) -> String {
    let body = if authenticated {
        r#"<h1>Welcome back</h1><p><a href="/conquer">Go to your tasks</a></p>"#
    } else {
        r#"<h1>Conquer your day</h1><p><a href="/sign-up">Create an account</a> or <a href="/login">log in</a>.</p>"#
    };
    layout("Home", flash, authenticated, body)
}

pub fn signup(data: &SignupData, errors: &[FieldError], flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
<form method="post" action="/sign-up">
  <label>Name <input name="name" value="{name}"></label>{name_err}
  <label>Email <input name="email" type="email" value="{email}"></label>{email_err}
  <label>Password <input name="password" type="password"></label>{password_err}
  <label>Confirm Password <input name="confirm_password" type="password"></label>{confirm_err}
  <button type="submit">Sign up</button>
</form>"#,
        name = escape(&data.name),
        email = escape(&data.email),
        name_err = field_errors(errors, "name"),
        email_err = field_errors(errors, "email"),
        password_err = field_errors(errors, "password"),
        confirm_err = field_errors(errors, "confirm_password"),
    );
    layout("Sign up", flash, false, &body)
}

pub fn verify(email: &str, errors: &[FieldError]) -> String {
    let body = format!(
        r#"<h1>Verify your account</h1>
<p>We sent a 6-digit code to {email}.</p>
<form method="post" action="/verify">
  <label>Verification Code <input name="ver_code" maxlength="6" autocomplete="one-time-code"></label>{code_err}
  <button type="submit">Verify</button>
</form>"#,
        email = escape(email),
        code_err = field_errors(errors, "ver_code"),
    );
    layout("Verify", None, false, &body)
}

pub fn login(email: &str, errors: &[FieldError], flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="/login">
  <label>Email <input name="email" type="email" value="{email}"></label>{email_err}
  <label>Password <input name="password" type="password"></label>{password_err}
  <button type="submit">Login</button>
</form>"#,
        email = escape(email),
        email_err = field_errors(errors, "email"),
        password_err = field_errors(errors, "password"),
    );
    layout("Log in", flash, false, &body)
}

fn task_row(task: &Task) -> String {
    let finish = match task.status {
        TaskStatus::InProgress => r#"<button name="action" value="finish">Finish</button>"#.to_string(),
        TaskStatus::Finished => String::new(),
    };
    format!(
        r#"<li class="{status_class}">
  <form method="post" action="/conquer">
    <input type="hidden" name="task_id" value="{id}">
    <span>{title}</span> <em>{status}</em>
    {finish}
    <button name="action" value="delete">Delete</button>
  </form>
</li>"#,
        status_class = if task.status == TaskStatus::Finished { "finished" } else { "in-progress" },
        id = task.id,
        title = escape(&task.task_name),
        status = task.status.label(),
    )
}

pub fn conquer(tasks: &[Task]) -> String {
    let rows: String = tasks.iter().map(task_row).collect();
    let body = format!(
        r#"<h1>Your tasks</h1>
<form method="post" action="/conquer">
  <input name="title" placeholder="What needs doing?" maxlength="150">
  <button name="action" value="save">Save</button>
</form>
<ul>
{rows}
</ul>"#
    );
    layout("Conquer", None, true, &body)
}
