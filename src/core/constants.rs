//! Constants for host environment keys and endpoint paths

/// Host environment value keys
pub mod env_key {
    /// Default base URL for the completions endpoint
    pub const BASE_URL: &str = "localai_base_url";

    /// API key sent as a bearer token
    pub const API_KEY: &str = "localai_api_key";
}

/// Endpoint paths owned by the external API
pub mod endpoint {
    /// Chat completions path appended to the base URL
    pub const CHAT_COMPLETIONS: &str = "/chat/completions";
}
