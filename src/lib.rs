pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;

// Re-export commonly used types for convenience
pub use api::{MinifyRequest, MinifyResponse, ResolveResponse};
pub use client::{MiniUrlClient, Minified, Operation};
pub use config::{ClientConfig, ClientConfigBuilder, ValidationError};
pub use error::{MinifyError, INVALID_URL_MESSAGE};
pub use normalize::{classify, has_valid_protocol, normalize, trim_input, HostPattern};
