use actix_web::{web, HttpResponse};
use log::debug;
use serde::Deserialize;
use sqlx::PgPool;

use crate::databases::todo::tasks::{delete_task, finish_task, insert_task, list_tasks};
use crate::error::AuthError;
use crate::pages;
use crate::routes::{html, redirect};
use crate::session::CurrentAccount;

#[derive(Debug, Default, Deserialize)]
pub struct TaskForm {
    pub action: Option<String>,
    pub title: Option<String>,
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Save(String),
    Finish(i32),
    Delete(i32),
}

impl TaskAction {
    /// Unknown actions and unparsable ids map to `None`, which the handler
    /// treats as a no-op.
    pub fn parse(form: TaskForm) -> Option<Self> {
        let task_id = || form.task_id.as_deref().and_then(|id| id.trim().parse::<i32>().ok());

        match form.action.as_deref()? {
            "save" => Some(TaskAction::Save(form.title.clone().unwrap_or_default())),
            "finish" => task_id().map(TaskAction::Finish),
            "delete" => task_id().map(TaskAction::Delete),
            _ => None,
        }
    }
}

pub async fn show_tasks(account: CurrentAccount, db_pool: web::Data<PgPool>) -> Result<HttpResponse, AuthError> {
    let tasks = list_tasks(db_pool.get_ref(), account.id).await?;
    Ok(html(pages::conquer(&tasks)))
}

pub async fn update_tasks(
    account: CurrentAccount,
    form: web::Form<TaskForm>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, AuthError> {
    let pool = db_pool.get_ref();

    match TaskAction::parse(form.into_inner()) {
        Some(TaskAction::Save(title)) => {
            if let Some(task) = insert_task(pool, account.id, &title).await? {
                debug!("Account {} created task {}", account.id, task.id);
            }
        }
        Some(TaskAction::Finish(task_id)) => {
            if !finish_task(pool, account.id, task_id).await? {
                debug!("Account {} cannot finish task {}", account.id, task_id);
            }
        }
        Some(TaskAction::Delete(task_id)) => {
            if !delete_task(pool, account.id, task_id).await? {
                debug!("Account {} cannot delete task {}", account.id, task_id);
            }
        }
        None => {}
    }

    Ok(redirect("/conquer"))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/conquer")
            .route(web::get().to(show_tasks))
            .route(web::post().to(update_tasks)),
    );
}
