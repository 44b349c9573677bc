use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use strum::{Display, EnumIter, IntoStaticStr};

/// Why a recognised operation did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, Serialize)]
pub enum ErrorCategory {
    MissingCredential,
    MissingArgument,
    Unauthorized,
    Forbidden,
    Conflict,
    ServerError,
    ClientError,
    TransportFailure,
}

impl ErrorCategory {
    /// Category for a received HTTP status, `None` on 2xx.
    ///
    /// Total over `u16`: anything that is neither success nor explicitly mapped
    /// is a client error.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            409 => Some(Self::Conflict),
            500..=599 => Some(Self::ServerError),
            _ => Some(Self::ClientError),
        }
    }
}

/// One displayable block of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// The single outcome shape of every recognised dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEnvelope {
    Success {
        content: Vec<ContentBlock>,
    },
    Failure {
        content: Vec<ContentBlock>,
        category: ErrorCategory,
    },
}

impl ResultEnvelope {
    pub fn success(text: impl Into<String>) -> Self {
        ResultEnvelope::Success {
            content: vec![ContentBlock::text(text)],
        }
    }

    pub fn failure(category: ErrorCategory, text: impl Into<String>) -> Self {
        ResultEnvelope::Failure {
            content: vec![ContentBlock::text(text)],
            category,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResultEnvelope::Success { .. })
    }

    pub fn content(&self) -> &[ContentBlock] {
        match self {
            ResultEnvelope::Success { content } | ResultEnvelope::Failure { content, .. } => content,
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { category, .. } => Some(*category),
        }
    }

    /// All text blocks joined by newlines.
    pub fn text(&self) -> String {
        self.content()
            .iter()
            .map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for ResultEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResultEnvelope::Success { content } => {
                let mut state = serializer.serialize_struct("ResultEnvelope", 2)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("content", content)?;
                state.end()
            }
            ResultEnvelope::Failure { content, category } => {
                let mut state = serializer.serialize_struct("ResultEnvelope", 3)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("content", content)?;
                state.serialize_field("errorCategory", category)?;
                state.end()
            }
        }
    }
}
