use crate::server::dispatch_error;
use revx_gateway::{Dispatcher, ErrorCategory, InvocationArgs, Transport, CREDENTIAL_ENV};
use rmcp::model::{
    AnnotateAble, ErrorData as McpError, ListResourcesResult, RawResource, ReadResourceResult,
    ResourceContents,
};

pub(crate) const PAIRS_URI: &str = "revolutx://pairs";
const PAIRS_OPERATION: &str = "get_pairs";
const JSON_MIME: &str = "application/json";

pub(crate) fn list() -> ListResourcesResult {
    let mut pairs = RawResource::new(PAIRS_URI, "Currency Pairs");
    pairs.description = Some("List of all available currency pairs".to_string());
    pairs.mime_type = Some(JSON_MIME.to_string());
    ListResourcesResult::with_all_items(vec![pairs.no_annotation()])
}

/// The pairs resource is a live `get_pairs` call.
pub(crate) async fn read<T: Transport>(
    dispatcher: &Dispatcher<T>,
    uri: &str,
) -> Result<ReadResourceResult, McpError> {
    if uri != PAIRS_URI {
        return Err(McpError::resource_not_found(
            format!("Resource not found: {uri}"),
            None,
        ));
    }

    let envelope = dispatcher
        .dispatch(PAIRS_OPERATION, &InvocationArgs::new())
        .await
        .map_err(dispatch_error)?;

    match envelope.category() {
        None => Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(JSON_MIME.to_string()),
                text: envelope.text(),
                meta: None,
            }],
        }),
        Some(ErrorCategory::MissingCredential) => Err(McpError::internal_error(
            format!("{CREDENTIAL_ENV} is required to read this resource."),
            None,
        )),
        Some(_) => Err(McpError::internal_error(
            format!("Failed to fetch pairs: {}", envelope.text()),
            None,
        )),
    }
}
