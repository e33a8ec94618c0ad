//! What a single strategy hands back to the orchestrator.

use listcheck_core::ExtractedData;

use crate::browser::RenderError;
use crate::error::ExtractError;

/// Data captured from one page or API response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCapture {
    pub data: ExtractedData,
    pub raw_text: Option<String>,
}

/// A strategy either produced usable data or missed. A miss is never an
/// error: the orchestrator moves on to the next strategy.
#[derive(Debug)]
pub enum StrategyOutcome {
    Hit(PageCapture),
    Miss(MissReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// The profile declares no API for this source.
    NoApiDescriptor,
    /// API strategy needs both brand and model hints.
    MissingHints,
    Timeout,
    Status(u16),
    Transport(String),
    Decode(String),
    /// The response parsed but every mapped field was absent.
    EmptyMapping,
    /// Neither structured fields nor enough page text.
    TooSparse { text_chars: usize },
    Render(String),
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissReason::NoApiDescriptor => write!(f, "no API descriptor"),
            MissReason::MissingHints => write!(f, "brand and model hints required"),
            MissReason::Timeout => write!(f, "timed out"),
            MissReason::Status(status) => write!(f, "HTTP status {status}"),
            MissReason::Transport(reason) => write!(f, "transport error: {reason}"),
            MissReason::Decode(reason) => write!(f, "undecodable response: {reason}"),
            MissReason::EmptyMapping => write!(f, "response carried no mapped fields"),
            MissReason::TooSparse { text_chars } => {
                write!(f, "no structured fields and only {text_chars} chars of text")
            }
            MissReason::Render(reason) => write!(f, "render failed: {reason}"),
        }
    }
}

impl From<ExtractError> for MissReason {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Http(e) if e.is_timeout() => MissReason::Timeout,
            ExtractError::Http(e) => MissReason::Transport(e.to_string()),
            ExtractError::UnexpectedStatus { status, .. } => MissReason::Status(status),
            ExtractError::EmptyBody { .. } => MissReason::TooSparse { text_chars: 0 },
            ExtractError::Deserialize { source, .. } => MissReason::Decode(source.to_string()),
            ExtractError::InvalidHeader { name, reason } => {
                MissReason::Transport(format!("invalid header '{name}': {reason}"))
            }
        }
    }
}

impl From<RenderError> for MissReason {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::NavigationTimeout { .. } => MissReason::Timeout,
            other => MissReason::Render(other.to_string()),
        }
    }
}
