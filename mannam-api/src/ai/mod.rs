mod client;

pub use client::AiClient;
