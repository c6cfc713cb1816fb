//! # 测试用模拟后端
//!
//! 在测试进程内启动一个 hyper HTTP/1.1 服务器，监听随机端口，
//! 以内存中的 JSON 文档模拟远程项目存储、认证和代码执行接口。
//!
//! 所有请求按到达顺序记录 `(路径, 请求体)`，测试据此断言线格式和请求次数。

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// 模拟后端的内部状态
#[derive(Default)]
struct MockState {
    /// 已收到的请求：(路径, 请求体)
    requests: Vec<(String, Value)>,
    /// 项目文档
    projects: Vec<Value>,
    next_id: u32,
    /// `/executeCode` 的固定应答
    execute_reply: Option<Value>,
    /// 设置后 `/executeCode` 在收到通知前不返回
    execute_gate: Option<Arc<Notify>>,
    /// `/updateProject` 的固定应答（覆盖默认的合并写入）
    update_reply: Option<Value>,
    /// `/getProfileStats` 的固定应答
    profile_stats_reply: Option<Value>,
    /// 删除成功但不真正移除（模拟列表接口滞后）
    keep_deleted: bool,
}

impl MockState {
    fn respond(&mut self, path: &str, payload: &Value) -> Value {
        match path {
            "/login" => {
                if payload["password"] == "wrong" {
                    json!({ "success": false, "message": "Invalid credentials" })
                } else {
                    json!({ "success": true, "token": "tok-1", "userId": "u1" })
                }
            }
            "/signUp" => json!({ "success": true }),
            "/getUserDetails" => json!({
                "success": true,
                "user": { "username": "ada", "name": "Ada", "email": "ada@example.com" }
            }),
            "/getProfileStats" => self.profile_stats_reply.clone().unwrap_or_else(|| {
                json!({
                    "success": true,
                    "stats": {
                        "joinDate": "2024-01-15T08:00:00.000Z",
                        "activeDays": 9,
                        "daysCoding": 40
                    }
                })
            }),
            "/createProject" => {
                let title = payload["title"].as_str().unwrap_or_default().to_string();
                let language = payload["language"].as_str().unwrap_or_default().to_string();
                let id = self.push_project(&title, &language);
                json!({ "success": true, "projectId": id })
            }
            "/getProjects" => json!({ "success": true, "projects": self.projects }),
            "/getProject" => match self.find(&payload["projId"]) {
                Some(idx) => json!({ "success": true, "project": self.projects[idx] }),
                None => json!({ "success": false, "message": "Project not found" }),
            },
            "/updateProject" => {
                if let Some(reply) = &self.update_reply {
                    return reply.clone();
                }
                match self.find(&payload["projId"]) {
                    Some(idx) => {
                        for key in ["code", "htmlCode", "cssCode", "jsCode", "input"] {
                            if let Some(value) = payload.get(key) {
                                self.projects[idx][key] = value.clone();
                            }
                        }
                        json!({ "success": true })
                    }
                    None => json!({ "success": false, "message": "Project not found" }),
                }
            }
            "/deleteProject" => match self.find(&payload["progId"]) {
                Some(idx) => {
                    if !self.keep_deleted {
                        self.projects.remove(idx);
                    }
                    json!({ "success": true })
                }
                None => json!({ "success": false, "message": "Project not found" }),
            },
            "/executeCode" => self
                .execute_reply
                .clone()
                .unwrap_or_else(|| json!({ "success": true, "output": "" })),
            _ => json!({ "success": false, "message": "unknown endpoint" }),
        }
    }

    fn push_project(&mut self, title: &str, language: &str) -> String {
        self.next_id += 1;
        let id = format!("proj-{}", self.next_id);
        self.projects.push(json!({
            "_id": id,
            "title": title,
            "language": language,
            "date": format!("2024-06-{:02}T10:00:00.000Z", self.next_id.min(28)),
        }));
        id
    }

    fn find(&self, id: &Value) -> Option<usize> {
        self.projects.iter().position(|p| &p["_id"] == id)
    }
}

/// 进程内模拟后端
pub(crate) struct MockBackend {
    addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// 在随机端口上启动模拟后端
    pub(crate) async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(MockState::default()));

        let server_state = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = server_state.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, state.clone()));
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, state }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// 已收到的全部请求
    pub(crate) fn requests(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// 发往指定路径的请求体
    pub(crate) fn requests_to(&self, path: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body)
            .collect()
    }

    /// 直接插入一个项目，返回其 ID
    pub(crate) fn insert_project(&self, title: &str, language: &str) -> String {
        self.state.lock().unwrap().push_project(title, language)
    }

    /// 当前存储中的项目文档
    pub(crate) fn project(&self, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.find(&json!(id)).map(|idx| state.projects[idx].clone())
    }

    pub(crate) fn set_execute_reply(&self, reply: Value) {
        self.state.lock().unwrap().execute_reply = Some(reply);
    }

    pub(crate) fn set_update_reply(&self, reply: Value) {
        self.state.lock().unwrap().update_reply = Some(reply);
    }

    pub(crate) fn set_profile_stats_reply(&self, reply: Value) {
        self.state.lock().unwrap().profile_stats_reply = Some(reply);
    }

    /// 挂起后续所有 `/executeCode` 请求，直到返回的 Notify 被通知
    pub(crate) fn hold_executions(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().execute_gate = Some(gate.clone());
        gate
    }

    /// 删除接口只应答成功，不移除文档
    pub(crate) fn keep_deleted_projects(&self) {
        self.state.lock().unwrap().keep_deleted = true;
    }
}

async fn handle(
    req: Request<Incoming>,
    state: Arc<Mutex<MockState>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let body = req
        .into_body()
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let gate = {
        let mut state = state.lock().unwrap();
        state.requests.push((path.clone(), payload.clone()));
        if path == "/executeCode" {
            state.execute_gate.clone()
        } else {
            None
        }
    };
    if let Some(gate) = gate {
        gate.notified().await;
    }

    let reply = state.lock().unwrap().respond(&path, &payload);
    let response = Response::builder()
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(reply.to_string())))
        .unwrap();
    Ok(response)
}

/// 一个当前没有任何监听者的本地地址
pub(crate) fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
