use crate::framing::LineTransport;
use crate::{prompts, resources};
use anyhow::Context;
use revx_gateway::{ContentBlock, DispatchError, Dispatcher, HttpTransport, ResultEnvelope, Transport};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, CustomRequest, CustomResult, ErrorCode,
    ErrorData as McpError, GetPromptRequestParams, GetPromptResult, Implementation, JsonObject,
    ListPromptsResult, ListResourcesResult, ListToolsResult, PaginatedRequestParams, ProtocolVersion,
    ReadResourceRequestParams, ReadResourceResult, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use std::future::Future;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

pub(crate) const SERVER_NAME: &str = "revolutx-mcp";

/// Methods with typed params. One of these reaching `on_custom_request` means
/// its params did not decode.
const TYPED_METHODS: &[&str] = &[
    "initialize",
    "ping",
    "tools/list",
    "tools/call",
    "resources/list",
    "resources/read",
    "prompts/list",
    "prompts/get",
];

/// Protocol error for a dispatch that never reached the exchange.
pub(crate) fn dispatch_error(err: DispatchError) -> McpError {
    match err {
        DispatchError::MalformedSchema(_) => McpError::internal_error(err.to_string(), None),
        _ => McpError::invalid_params(err.to_string(), None),
    }
}

fn tool_result(envelope: &ResultEnvelope) -> CallToolResult {
    let content = envelope
        .content()
        .iter()
        .map(ContentBlock::as_text)
        .map(Content::text)
        .collect();
    if envelope.is_ok() {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    }
}

/// Agent protocol front end over a [`Dispatcher`]. Every registry operation is
/// a tool; business failures come back as `isError` results.
pub(crate) struct McpServer<T = HttpTransport> {
    dispatcher: Dispatcher<T>,
}

impl<T: Transport + 'static> McpServer<T> {
    pub(crate) fn new(dispatcher: Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .registry()
            .iter()
            .map(|spec| {
                let schema = match spec.input_schema() {
                    Value::Object(schema) => schema,
                    _ => JsonObject::new(),
                };
                Tool::new(spec.name, spec.description, schema)
            })
            .collect()
    }

    async fn call(&self, request: CallToolRequestParams) -> Result<CallToolResult, McpError> {
        let CallToolRequestParams {
            name, arguments, ..
        } = request;
        let envelope = self
            .dispatcher
            .dispatch_json(&name, arguments.map(Value::Object))
            .await
            .map_err(dispatch_error)?;
        if !envelope.is_ok() {
            debug!(tool = %name, category = ?envelope.category(), "tool call failed");
        }
        Ok(tool_result(&envelope))
    }

    /// Serve one session until `input` closes, then let the writer drain.
    pub(crate) async fn run<R, W>(self, input: R, output: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (transport, writer) = LineTransport::new(input, output);
        let session = self
            .serve(transport)
            .await
            .context("Agent protocol handshake failed")?;
        let reason = session
            .waiting()
            .await
            .context("Agent protocol session panicked")?;
        info!(?reason, "session ended");
        writer.await.context("Response writer task panicked")?
    }

    pub(crate) async fn serve_stdio(self) -> anyhow::Result<()> {
        self.run(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

impl<T: Transport + 'static> ServerHandler for McpServer<T> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Revolut X".to_string()),
                ..Default::default()
            },
            instructions: None,
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        self.call(request)
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(resources::list()))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move { resources::read(&self.dispatcher, &request.uri).await }
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(prompts::list()))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        std::future::ready(prompts::get(&request.name, request.arguments.as_ref()))
    }

    fn on_custom_request(
        &self,
        request: CustomRequest,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CustomResult, McpError>> + Send + '_ {
        std::future::ready(Err(unroutable(&request.method)))
    }
}

fn unroutable(method: &str) -> McpError {
    if TYPED_METHODS.contains(&method) {
        McpError::invalid_params(format!("Invalid params for {method}"), None)
    } else {
        McpError::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
            None,
        )
    }
}
