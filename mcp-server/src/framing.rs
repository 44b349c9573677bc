//! Newline-delimited JSON-RPC framing for the agent protocol service.

use anyhow::Context;
use rmcp::model::ErrorData;
use rmcp::service::{RxJsonRpcMessage, TxJsonRpcMessage};
use rmcp::transport::Transport;
use rmcp::RoleServer;
use serde_json::{json, Value};
use std::future::Future;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One JSON-RPC message per line in each direction.
///
/// A line that cannot be decoded is answered on the spot (`-32700` when it is
/// not JSON, `-32600` when it is JSON but not a message) and reading goes on.
/// Replies go through a channel to a single writer task, so frames never
/// interleave.
pub(crate) struct LineTransport<R> {
    input: BufReader<R>,
    frames: Option<UnboundedSender<Vec<u8>>>,
    line: Vec<u8>,
}

enum Decoded {
    Message(Box<RxJsonRpcMessage<RoleServer>>),
    Reply(Value),
    Skip,
}

impl<R> LineTransport<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Returns the transport and the writer task that owns `output`. The task
    /// finishes once the transport is closed or dropped.
    pub(crate) fn new<W>(input: R, output: W) -> (Self, JoinHandle<anyhow::Result<()>>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_frames(rx, output));
        let transport = Self {
            input: BufReader::new(input),
            frames: Some(tx),
            line: Vec::new(),
        };
        (transport, writer)
    }

    fn push(&self, frame: &impl serde::Serialize) -> io::Result<()> {
        let mut bytes = serde_json::to_vec(frame)?;
        bytes.push(b'\n');
        self.frames
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "transport closed"))?
            .send(bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response writer stopped"))
    }
}

impl<R> Transport<RoleServer> for LineTransport<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    type Error = io::Error;

    fn send(
        &mut self,
        item: TxJsonRpcMessage<RoleServer>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        std::future::ready(self.push(&item))
    }

    fn receive(&mut self) -> impl Future<Output = Option<RxJsonRpcMessage<RoleServer>>> + Send {
        async move {
            loop {
                // the service polls this inside `select!`; bytes of a partial
                // line stay in `self.line` until the line completes
                match self.input.read_until(b'\n', &mut self.line).await {
                    Ok(0) if self.line.is_empty() => return None,
                    Ok(_) => {}
                    Err(err) => {
                        warn!(error = %err, "failed to read from input");
                        return None;
                    }
                }
                let line = std::mem::take(&mut self.line);
                if line.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                match decode(&line) {
                    Decoded::Message(message) => return Some(*message),
                    Decoded::Reply(frame) => {
                        if self.push(&frame).is_err() {
                            return None;
                        }
                    }
                    Decoded::Skip => {}
                }
            }
        }
    }

    fn close(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.frames.take();
        std::future::ready(Ok(()))
    }
}

fn decode(line: &[u8]) -> Decoded {
    let value: Value = match serde_json::from_slice(line) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "rejected malformed frame");
            let error = ErrorData::parse_error(format!("Parse error: {err}"), None);
            return Decoded::Reply(error_frame(Value::Null, error));
        }
    };

    let id = value.get("id").cloned();
    let has_method = value.get("method").is_some();
    match serde_json::from_value::<RxJsonRpcMessage<RoleServer>>(value) {
        Ok(message) => Decoded::Message(Box::new(message)),
        Err(err) => match id {
            Some(id) => Decoded::Reply(error_frame(
                id,
                ErrorData::invalid_request(format!("Invalid request: {err}"), None),
            )),
            None if has_method => {
                debug!(error = %err, "dropped undecodable notification");
                Decoded::Skip
            }
            None => Decoded::Reply(error_frame(
                Value::Null,
                ErrorData::invalid_request(format!("Invalid request: {err}"), None),
            )),
        },
    }
}

fn error_frame(id: Value, error: ErrorData) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": error })
}

async fn write_frames<W>(mut frames: UnboundedReceiver<Vec<u8>>, mut output: W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = frames.recv().await {
        output
            .write_all(&frame)
            .await
            .context("Failed to write response")?;
        output.flush().await.context("Failed to flush output")?;
    }
    Ok(())
}
