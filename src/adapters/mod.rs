//! Adapter implementations

pub mod chat_completions;
pub mod device_login;

pub use chat_completions::ChatCompletionsAdapter;
pub use device_login::DeviceLoginAdapter;
