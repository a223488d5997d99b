pub mod base;
pub mod catalog;
pub mod configs;
pub mod groq;
pub mod serpapi;
pub mod utils;

#[cfg(test)]
pub mod mock;
