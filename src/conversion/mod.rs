//! Request shaping helpers

pub mod request_builder;
