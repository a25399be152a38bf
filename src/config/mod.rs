//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (range checks)
//!     → HandshakeConfig (validated, immutable)
//!     → AdmissionGate::init_global (capacity)
//!     → AltsCredentials::from_config (timeout, frame size)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - The gate capacity is read once; there is no reload

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdmissionConfig, HandshakeConfig, HandshakerConfig, ObservabilityConfig, TimeoutConfig,
    DEFAULT_SERVER_HANDSHAKE_TIMEOUT,
};
pub use validation::{validate_config, ValidationError};
