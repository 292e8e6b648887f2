pub mod browser;
pub mod services;
pub mod websocket;
