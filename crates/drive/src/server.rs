// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stdio JSON-RPC MCP server exposing the drive library.
//!
//! Transport is line-delimited JSON objects: one request per line on
//! stdin, one response per line on stdout. Three tools are exposed:
//! `get_context`, `get_section`, and `add_note`. Tool failures are
//! reported inside the tool result (`Error: ...`), not as protocol
//! errors, so agents can read them.

use crate::section::{extract_section, mq_available, mq_outline, mq_section};
use crate::store::DriveStore;
use agx_core::SystemClock;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

const PROTOCOL_VERSION: &str = "2024-11-05";
const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

pub struct DriveServer {
    drives: DriveStore,
}

impl DriveServer {
    pub fn new(drives: DriveStore) -> Self {
        Self { drives }
    }

    /// Serve one connection over arbitrary streams. Returns when the
    /// reader reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut encoded = response.to_string();
            encoded.push('\n');
            writer.write_all(encoded.as_bytes()).await?;
            writer.flush().await?;
        }
        Ok(())
    }

    /// Handle one raw line; notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                return Some(error_response(
                    Value::Null,
                    PARSE_ERROR,
                    &format!("parse error: {e}"),
                ));
            }
        };

        if request.method.starts_with("notifications/") {
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let result = match request.method.as_str() {
            "initialize" => json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "agx-drive", "version": env!("CARGO_PKG_VERSION") },
            }),
            "ping" => json!({}),
            "tools/list" => json!({ "tools": tool_schemas() }),
            "tools/call" => {
                let params = request.params.unwrap_or(Value::Null);
                let name = params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let args = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                let text = self.call_tool(&name, &args).await;
                json!({ "content": [{ "type": "text", "text": text }] })
            }
            other => {
                return Some(error_response(
                    id,
                    METHOD_NOT_FOUND,
                    &format!("method not found: {other}"),
                ));
            }
        };

        Some(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
    }

    /// Dispatch one tool call; every failure becomes an `Error: ...` string.
    pub async fn call_tool(&self, name: &str, args: &Value) -> String {
        let result = match name {
            "get_context" => self.get_context(args).await,
            "get_section" => self.get_section(args).await,
            "add_note" => self.add_note(args),
            other => Err(format!("unknown tool: {other}")),
        };
        match result {
            Ok(text) => text,
            Err(message) => format!("Error: {message}"),
        }
    }

    async fn get_context(&self, args: &Value) -> Result<String, String> {
        let project = args.get("project").and_then(|v| v.as_str());

        let drive = match project {
            Some(project) => match self.drives.get(project) {
                Some(d) => Some(d),
                None => {
                    let path = agx_core::expand_tilde(project, self.drives.home());
                    self.drives.resolve_by_project(&path)
                }
            },
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| self.drives.resolve_by_project(&cwd)),
        };

        let Some(drive) = drive else {
            let suggestions: Vec<String> = self
                .drives
                .list()
                .iter()
                .map(|d| match &d.front.description {
                    Some(desc) => format!("- {}: {}", d.name, desc),
                    None => format!("- {}", d.name),
                })
                .collect();
            if project.is_some() && !suggestions.is_empty() {
                return Ok(format!(
                    "No drive matched. Available drives:\n{}",
                    suggestions.join("\n")
                ));
            }
            return Err("no drive found for this project".to_string());
        };

        let large = self.drives.is_large(&drive);
        let content = if large && mq_available() {
            let doc = drive
                .representative_doc()
                .ok_or_else(|| "drive has no documents".to_string())?;
            let target = match drive.body {
                crate::model::DriveBody::File => doc,
                crate::model::DriveBody::Directory => drive.path.clone(),
            };
            mq_outline(&target).await.map_err(|e| e.to_string())?
        } else {
            self.drives.read_content(&drive).map_err(|e| e.to_string())?
        };

        let header = drive.front.to_header();
        let payload = json!({
            "content": format!("{header}\n{content}"),
            "drive": drive.name,
            "large": large,
        });
        serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())
    }

    async fn get_section(&self, args: &Value) -> Result<String, String> {
        let project = required_str(args, "project")?;
        let file = required_str(args, "file")?;
        let section = required_str(args, "section")?;

        let drive = self
            .drives
            .get(project)
            .ok_or_else(|| format!("drive '{project}' not found"))?;
        let path = self
            .drives
            .file_in_drive(&drive, file)
            .map_err(|e| e.to_string())?;

        if mq_available() {
            return mq_section(&path, section).await.map_err(|e| e.to_string());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
        extract_section(&content, section).map_err(|e| e.to_string())
    }

    fn add_note(&self, args: &Value) -> Result<String, String> {
        let project = required_str(args, "project")?;
        let title = required_str(args, "title")?;
        let content = required_str(args, "content")?;

        let path = self
            .drives
            .add_note(project, title, content, &SystemClock)
            .map_err(|e| e.to_string())?;
        Ok(format!("Note saved to {}", path.display()))
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing required argument: {key}"))
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}

fn tool_schemas() -> Value {
    json!([
        {
            "name": "get_context",
            "description": "Get the knowledge drive for a project (by drive name or project path; defaults to the current directory).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": { "type": "string", "description": "Drive name or project path" }
                }
            }
        },
        {
            "name": "get_section",
            "description": "Get one section of a drive document by heading.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": { "type": "string", "description": "Drive name" },
                    "file": { "type": "string", "description": "Markdown file within the drive" },
                    "section": { "type": "string", "description": "Heading text" }
                },
                "required": ["project", "file", "section"]
            }
        },
        {
            "name": "add_note",
            "description": "Append a timestamped note to a drive.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": { "type": "string", "description": "Drive name" },
                    "title": { "type": "string" },
                    "content": { "type": "string" }
                },
                "required": ["project", "title", "content"]
            }
        }
    ])
}

/// Serve a single stdio connection until EOF.
pub async fn serve_stdio(drives: DriveStore) -> std::io::Result<()> {
    let server = DriveServer::new(drives);
    server
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
