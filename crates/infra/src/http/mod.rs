//! HTTP transport over reqwest

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
