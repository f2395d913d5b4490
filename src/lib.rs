pub mod ai;
pub mod app;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod handler;
pub mod tui;
pub mod ui;
pub mod view;

// Re-export main types for convenience
pub use ai::{AiError, GeminiClient, ResponseGenerator};
pub use app::App;
pub use cart::{Cart, CartItem};
pub use catalog::Product;
pub use chat::{ChatMessage, ChatRole, ChatSession, SendBlocked};
pub use config::Config;
pub use view::{ViewController, ViewState};
