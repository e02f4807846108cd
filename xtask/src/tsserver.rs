//! Minimal tsserver client.
//!
//! Requests go to stdin as one JSON object per line. Responses and events
//! come back on stdout framed with a `Content-Length` header.

use anyhow::{bail, Context, Result};
use html_id_dom::Member;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::dom_completions::TypeAnalysisService;

/// Completion kinds that mark a callable member.
const CALLABLE_KINDS: &[&str] = &["method", "function"];

pub struct TsServer {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    seq: u64,
}

impl TsServer {
    /// Spawn tsserver and configure the inferred project for DOM typings.
    pub fn spawn(program: &Path) -> Result<Self> {
        let mut child = Command::new(program)
            .args(["--disableAutomaticTypingAcquisition"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", program.display()))?;

        let stdin = child.stdin.take().context("tsserver stdin unavailable")?;
        let stdout = child.stdout.take().context("tsserver stdout unavailable")?;
        let mut server = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            seq: 0,
        };

        server.request(
            "compilerOptionsForInferredProjects",
            json!({
                "options": {
                    "target": "ESNext",
                    "module": "ESNext",
                    "lib": ["dom", "es2020"],
                    "allowJs": false
                }
            }),
        )?;
        Ok(server)
    }

    /// Send a command without waiting for a reply. `open` and `close` never get one.
    fn send(&mut self, command: &str, arguments: Value) -> Result<u64> {
        self.seq += 1;
        let line = encode_request(self.seq, command, &arguments);
        self.stdin
            .write_all(line.as_bytes())
            .and_then(|()| self.stdin.flush())
            .with_context(|| format!("Failed to send {command}"))?;
        Ok(self.seq)
    }

    /// Send a command and wait for its response body, skipping events.
    fn request(&mut self, command: &str, arguments: Value) -> Result<Value> {
        let seq = self.send(command, arguments)?;
        loop {
            let Some(message) = read_message(&mut self.stdout)? else {
                bail!("tsserver exited while waiting for {command}");
            };
            if message["type"] != "response" || message["request_seq"] != seq {
                continue;
            }
            if message["success"] != true {
                let reason = message["message"].as_str().unwrap_or("unknown error");
                bail!("{command} failed: {reason}");
            }
            return Ok(message.get("body").cloned().unwrap_or(Value::Null));
        }
    }
}

impl TypeAnalysisService for TsServer {
    fn member_completions(&mut self, type_name: &str) -> Result<Vec<Member>> {
        let file = format!("/__html_id__/{type_name}.ts");
        let content = format!("declare var __el: {type_name}; __el.");

        self.send(
            "open",
            json!({ "file": file, "fileContent": content, "scriptKindName": "TS" }),
        )?;
        let body = self.request(
            "completionInfo",
            json!({
                "file": file,
                "line": 1,
                "offset": content.len() + 1,
                "includeExternalModuleExports": false,
                "includeInsertTextCompletions": true
            }),
        );
        self.send("close", json!({ "file": file }))?;

        Ok(members_from_completion_info(&body?))
    }
}

impl Drop for TsServer {
    fn drop(&mut self) {
        let _ = self.send("exit", Value::Null);
        let _ = self.child.wait();
    }
}

fn encode_request(seq: u64, command: &str, arguments: &Value) -> String {
    let request = json!({
        "seq": seq,
        "type": "request",
        "command": command,
        "arguments": arguments,
    });
    format!("{request}\n")
}

/// Read one framed message. `None` at end of stream.
fn read_message(reader: &mut impl BufRead) -> Result<Option<Value>> {
    let mut content_length = None;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }
        let header = header.trim_end();
        if header.is_empty() {
            if content_length.is_some() {
                break;
            }
            continue;
        }
        if let Some(value) = header.strip_prefix("Content-Length:") {
            content_length = Some(
                value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("Bad Content-Length header: {header}"))?,
            );
        }
    }

    let mut body = vec![0; content_length.unwrap_or_default()];
    reader.read_exact(&mut body)?;
    let message = serde_json::from_slice(&body).context("tsserver sent invalid JSON")?;
    Ok(Some(message))
}

/// Convert a `completionInfo` body into members, keeping tsserver's order.
fn members_from_completion_info(body: &Value) -> Vec<Member> {
    body["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let name = entry["name"].as_str()?;
                    let kind = entry["kind"].as_str().unwrap_or_default();
                    Some(if CALLABLE_KINDS.contains(&kind) {
                        Member::method(name)
                    } else {
                        Member::property(name)
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{body}\n", body.len() + 1)
    }

    #[test]
    fn test_encode_request() {
        let line = encode_request(3, "close", &json!({ "file": "/a.ts" }));
        assert!(line.ends_with('\n'));

        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["seq"], 3);
        assert_eq!(value["type"], "request");
        assert_eq!(value["command"], "close");
        assert_eq!(value["arguments"]["file"], "/a.ts");
    }

    #[test]
    fn test_read_messages_in_sequence() {
        let stream = frame(r#"{"type":"event","event":"typingsInstallerPid"}"#)
            + &frame(r#"{"type":"response","request_seq":1,"success":true}"#);
        let mut reader = Cursor::new(stream.into_bytes());

        let first = read_message(&mut reader).unwrap().unwrap();
        assert_eq!(first["type"], "event");
        let second = read_message(&mut reader).unwrap().unwrap();
        assert_eq!(second["request_seq"], 1);
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_read_message_rejects_bad_length() {
        let mut reader = Cursor::new(b"Content-Length: many\r\n\r\n{}".to_vec());
        assert!(read_message(&mut reader).is_err());
    }

    #[test]
    fn test_members_from_completion_info() {
        let body = json!({
            "entries": [
                { "name": "value", "kind": "property" },
                { "name": "focus", "kind": "method" },
                { "name": "onclick", "kind": "property" },
                { "name": "requestSubmit", "kind": "function" },
                { "kind": "keyword" }
            ]
        });

        assert_eq!(
            members_from_completion_info(&body),
            vec![
                Member::property("value"),
                Member::method("focus"),
                Member::property("onclick"),
                Member::method("requestSubmit"),
            ]
        );
    }

    #[test]
    fn test_members_from_empty_body() {
        assert!(members_from_completion_info(&Value::Null).is_empty());
    }
}
