//! Built-in event handlers.

pub mod fizz;
pub mod ping;

pub use fizz::FizzHandler;
pub use ping::PingHandler;
