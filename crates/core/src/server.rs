use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use async_trait::async_trait;
use log::{error, info};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};

use crate::card::AgentCard;
use crate::executor::{AgentExecutor, EventQueue, ExecutorEvent, RequestContext};
use crate::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::protocol::{MessageSendParams, Task, TaskIdParams};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Executor failed: {0}")]
    Executor(String),

    #[error("Task store lost task {0}")]
    StoreInconsistent(String),
}

/// Storage seam for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn save(&self, task: Task);
    async fn get(&self, id: &str) -> Option<Task>;
}

#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task);
    }

    async fn get(&self, id: &str) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(id).cloned()
    }
}

/// Dispatches protocol methods onto an executor and folds the resulting
/// event stream back into the task store.
pub struct RequestHandler {
    executor: Arc<dyn AgentExecutor>,
    store: Arc<dyn TaskStore>,
}

impl RequestHandler {
    pub fn new(executor: Arc<dyn AgentExecutor>, store: Arc<dyn TaskStore>) -> Self {
        Self { executor, store }
    }

    /// Apply an executor's events to the store as they arrive.
    async fn fold_events(&self, rx: tokio::sync::mpsc::Receiver<ExecutorEvent>) {
        let mut events = ReceiverStream::new(rx);
        while let Some(event) = events.next().await {
            match event {
                ExecutorEvent::StatusUpdate(update) => {
                    if let Some(mut task) = self.store.get(&update.task_id).await {
                        task.status = update.status;
                        self.store.save(task).await;
                    }
                }
                ExecutorEvent::Task(task) => self.store.save(task).await,
            }
        }
    }

    pub async fn on_message_send(&self, params: MessageSendParams) -> Result<Task, ServerError> {
        let ctx = RequestContext::new(params.message);
        let task_id = ctx.task_id.clone();
        self.store
            .save(Task::submitted(&task_id, &ctx.context_id))
            .await;

        let (queue, rx) = EventQueue::new(32);
        let executor = self.executor.clone();
        let run = tokio::spawn(async move { executor.execute(ctx, queue).await });

        self.fold_events(rx).await;

        match run.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(ServerError::Executor(e.to_string())),
            Err(e) => return Err(ServerError::Executor(e.to_string())),
        }

        self.store
            .get(&task_id)
            .await
            .ok_or(ServerError::StoreInconsistent(task_id))
    }

    pub async fn on_get_task(&self, params: TaskIdParams) -> Result<Task, ServerError> {
        self.store
            .get(&params.id)
            .await
            .ok_or(ServerError::TaskNotFound(params.id))
    }

    pub async fn on_cancel_task(&self, params: TaskIdParams) -> Result<Task, ServerError> {
        let task = self
            .store
            .get(&params.id)
            .await
            .ok_or_else(|| ServerError::TaskNotFound(params.id.clone()))?;

        let ctx = RequestContext::for_task(&task.id, &task.context_id);
        let (queue, rx) = EventQueue::new(32);
        let executor = self.executor.clone();
        let run = tokio::spawn(async move { executor.cancel(ctx, queue).await });

        self.fold_events(rx).await;

        match run.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(ServerError::Executor(e.to_string())),
            Err(e) => return Err(ServerError::Executor(e.to_string())),
        }

        self.store
            .get(&params.id)
            .await
            .ok_or(ServerError::StoreInconsistent(params.id))
    }
}

struct AppState {
    card: AgentCard,
    handler: Arc<RequestHandler>,
}

async fn agent_card(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(&state.card)
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(params).map_err(JsonRpcError::invalid_params)
}

fn server_error_to_rpc(error: ServerError) -> JsonRpcError {
    match error {
        ServerError::TaskNotFound(id) => JsonRpcError::task_not_found(&id),
        other => JsonRpcError::internal_error(other),
    }
}

async fn dispatch(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id.clone();
    let result = match request.method.as_str() {
        "message/send" => match parse_params::<MessageSendParams>(request.params) {
            Ok(params) => state
                .handler
                .on_message_send(params)
                .await
                .map_err(server_error_to_rpc),
            Err(e) => Err(e),
        },
        "tasks/get" => match parse_params::<TaskIdParams>(request.params) {
            Ok(params) => state
                .handler
                .on_get_task(params)
                .await
                .map_err(server_error_to_rpc),
            Err(e) => Err(e),
        },
        "tasks/cancel" => match parse_params::<TaskIdParams>(request.params) {
            Ok(params) => state
                .handler
                .on_cancel_task(params)
                .await
                .map_err(server_error_to_rpc),
            Err(e) => Err(e),
        },
        method => Err(JsonRpcError::method_not_found(method)),
    };

    match result.and_then(|task| {
        serde_json::to_value(task).map_err(JsonRpcError::internal_error)
    }) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            error!("JSON-RPC request failed: {} ({})", e.message, e.code);
            JsonRpcResponse::error(id, e)
        }
    }
}

async fn rpc(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => {
            return HttpResponse::Ok()
                .json(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
        }
    };

    HttpResponse::Ok().json(dispatch(&state, request).await)
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/.well-known/agent-card.json",
        web::get().to(agent_card),
    )
    .route("/", web::post().to(rpc));
}

/// An agent served over the protocol: card endpoint plus JSON-RPC method
/// dispatch on the root path.
pub struct A2AServer {
    card: AgentCard,
    handler: Arc<RequestHandler>,
}

impl A2AServer {
    pub fn new(card: AgentCard, executor: Arc<dyn AgentExecutor>) -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        Self {
            card,
            handler: Arc::new(RequestHandler::new(executor, store)),
        }
    }

    pub async fn serve(self, host: &str, port: u16) -> std::io::Result<()> {
        info!("Starting A2A server for {} on {host}:{port}", self.card.name);
        info!("Agent card: http://{host}:{port}/.well-known/agent-card.json");
        info!("JSON-RPC endpoint: POST http://{host}:{port}/");

        let state = web::Data::new(AppState {
            card: self.card,
            handler: self.handler,
        });

        HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
            .bind((host, port))?
            .run()
            .await
    }
}
