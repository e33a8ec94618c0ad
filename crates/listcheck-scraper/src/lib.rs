//! Multi-strategy extraction waterfall: API call, static HTML parse, then a
//! headless-browser render, tried in order until one yields usable data.

pub mod api;
pub mod browser;
pub mod error;
mod html;
pub mod json_path;
pub mod orchestrator;
pub mod outcome;
mod retry;
pub mod settings;
pub mod static_html;

pub use browser::{
    BrowserLaunchOptions, BrowserManager, EngineState, PageRenderer, RenderError, RenderRequest,
};
pub use error::ExtractError;
pub use orchestrator::{strategy_order, ExtractRequest, Extractor, UNKNOWN_SOURCE};
pub use outcome::{MissReason, PageCapture, StrategyOutcome};
pub use settings::ExtractSettings;
