// src/board.rs

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth;
use crate::models::task::{Assignee, Priority, Status, Task, TaskPatch};

/// Response payload for `GET /api/tasks`.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub tasks: Vec<Task>,
    pub meta: BoardMeta,
}

#[derive(Debug, Serialize)]
pub struct BoardMeta {
    pub storage: &'static str,
}

/// Creation payload. Unknown fields are rejected outright.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub assignee: Option<Assignee>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

/// Partial update payload. Unknown fields are rejected outright.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<Assignee>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

/// GET /api/tasks
/// The full board plus the active backend name. Reads are public.
pub async fn get_board(data: web::Data<AppState>) -> impl Responder {
    match data.board.read_board() {
        Ok(board) => HttpResponse::Ok().json(BoardResponse {
            tasks: board.tasks,
            meta: BoardMeta {
                storage: data.board.storage_mode().as_str(),
            },
        }),
        Err(e) => {
            error!("Error reading board: {}", e);
            HttpResponse::InternalServerError().body("Error reading board")
        }
    }
}

/// POST /api/tasks
pub async fn create_task(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> impl Responder {
    if let Err(resp) = auth::require_edit(&req, &data.config) {
        return resp;
    }

    let payload = payload.into_inner();
    let patch = TaskPatch {
        id: format!("t_{}", Uuid::new_v4()),
        title: Some(payload.title),
        description: payload.description,
        assignee: payload.assignee,
        status: payload.status,
        priority: payload.priority,
    };
    if let Err(msg) = patch.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }));
    }

    match data.board.upsert_task(&patch) {
        Ok(task) => {
            info!("Task created: {}", task.id);
            HttpResponse::Created().json(serde_json::json!({ "task": task }))
        }
        Err(e) => {
            error!("Error creating task: {}", e);
            HttpResponse::InternalServerError().body("Error creating task")
        }
    }
}

/// PATCH /api/tasks/{id}
/// Upsert semantics: an unseen id creates the task with create-path
/// defaults.
pub async fn update_task(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdateTaskRequest>,
) -> impl Responder {
    if let Err(resp) = auth::require_edit(&req, &data.config) {
        return resp;
    }

    let payload = payload.into_inner();
    let patch = TaskPatch {
        id: path.into_inner(),
        title: payload.title,
        description: payload.description,
        assignee: payload.assignee,
        status: payload.status,
        priority: payload.priority,
    };
    if let Err(msg) = patch.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }));
    }

    match data.board.upsert_task(&patch) {
        Ok(task) => HttpResponse::Ok().json(serde_json::json!({ "task": task })),
        Err(e) => {
            error!("Error updating task {}: {}", patch.id, e);
            HttpResponse::InternalServerError().body("Error updating task")
        }
    }
}

/// DELETE /api/tasks/{id}
/// Idempotent; reports success whether or not the id existed.
pub async fn delete_task(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(resp) = auth::require_edit(&req, &data.config) {
        return resp;
    }

    let id = path.into_inner();
    match data.board.delete_task(&id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => {
            error!("Error deleting task {}: {}", id, e);
            HttpResponse::InternalServerError().body("Error deleting task")
        }
    }
}
