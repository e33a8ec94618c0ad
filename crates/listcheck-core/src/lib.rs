pub mod app_config;
pub mod comparison;
pub mod config;
pub mod error;
pub mod extraction;
pub mod profiles;
pub mod records;

pub use app_config::{AppConfig, Environment};
pub use comparison::{
    ComparisonResult, FieldComparison, FieldStatus, VariantCheck, VariantStatus,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, InputError};
pub use extraction::{
    AttemptOutcome, ExtractedData, ExtractionResult, Strategy, StrategyAttempt, StrategyTag,
};
pub use profiles::{
    ApiDescriptor, ApiMapping, ExtractorSpec, ProfileStore, SelectorDescriptor, SiteProfile,
};
pub use records::{field_key, records_from_table, AuthoritativeRecord};
