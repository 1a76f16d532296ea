//! Configuration
//!
//! Corpus-level settings (`codestylo.toml`): worker count, error policy,
//! file extensions, disabled extractors and export format.

mod extraction_config;

pub use extraction_config::{
    load_config, load_config_file, ErrorPolicy, ExtractionConfig, CONFIG_FILE_NAME,
    DEFAULT_WORKERS, MAX_WORKERS,
};
