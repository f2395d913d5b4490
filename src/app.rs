use std::path::PathBuf;
use std::sync::Arc;

use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::ai::{AiError, GeminiClient, ResponseGenerator};
use crate::cart::Cart;
use crate::catalog::{self, Product};
use crate::chat::{ChatSession, PendingReply, SendBlocked};
use crate::config::Config;
use crate::tui::AppEvent;
use crate::view::{ViewController, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub views: ViewController,
    pub cart: Cart,
    pub chat: ChatSession,

    // Selection
    pub shop_state: ListState,
    pub cart_state: ListState,

    // Chat panel
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input (chars)
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of transcript area for scroll calculations
    pub chat_width: u16,  // Width of transcript area for wrap calculations
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // API key capture
    pub show_api_key_input: bool,
    pub api_key_input: String,
    pub api_key_input_cursor: usize,
    /// Message waiting for a credential before it can be sent
    pub deferred_message: Option<String>,

    // One-line notice shown in the footer
    pub status: Option<String>,

    pub config: Config,
    /// Where a captured key is persisted; `None` keeps it in memory only
    pub config_path: Option<PathBuf>,
    pub generator: Option<Arc<dyn ResponseGenerator>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let generator = config
            .api_key()
            .and_then(|key| match GeminiClient::new(&key, &config.model(), &config.base_url()) {
                Ok(client) => {
                    info!(model = client.model(), source = ?config.key_source(), "sommelier client initialized");
                    Some(Arc::new(client) as Arc<dyn ResponseGenerator>)
                }
                Err(e) => {
                    warn!(error = %e, "sommelier client not configured");
                    None
                }
            });

        let mut app = Self::with_generator(config, generator);
        app.config_path = Config::get_config_path().ok();
        app
    }

    pub fn with_generator(config: Config, generator: Option<Arc<dyn ResponseGenerator>>) -> Self {
        let mut shop_state = ListState::default();
        shop_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            views: ViewController::new(),
            cart: Cart::new(),
            chat: ChatSession::new(),

            shop_state,
            cart_state: ListState::default(),

            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,

            show_api_key_input: false,
            api_key_input: String::new(),
            api_key_input_cursor: 0,
            deferred_message: None,

            status: None,

            config,
            config_path: None,
            generator,
        }
    }

    // Shop
    pub fn selected_product(&self) -> Option<&'static Product> {
        self.shop_state.selected().and_then(|i| catalog::all().get(i))
    }

    pub fn shop_nav_down(&mut self) {
        let len = catalog::all().len();
        if len > 0 {
            let i = self.shop_state.selected().unwrap_or(0);
            self.shop_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn shop_nav_up(&mut self) {
        let i = self.shop_state.selected().unwrap_or(0);
        self.shop_state.select(Some(i.saturating_sub(1)));
    }

    /// Add the highlighted product and open the cart drawer on its line.
    pub fn add_selected_to_cart(&mut self) {
        let Some(product) = self.selected_product() else {
            return;
        };

        self.cart.add_to_cart(product);
        self.views.open_cart();

        let line = self.cart.items().iter().position(|i| i.product.id == product.id);
        self.cart_state.select(line);
        info!(product = product.id, cart_count = self.cart.cart_count(), "cart: added");
    }

    // Cart drawer
    pub fn toggle_cart(&mut self) {
        if self.views.is_cart_open() {
            self.views.close_cart();
        } else {
            self.views.open_cart();
            if self.cart_state.selected().is_none() && !self.cart.is_empty() {
                self.cart_state.select(Some(0));
            }
        }
    }

    pub fn cart_nav_down(&mut self) {
        let len = self.cart.len();
        if len > 0 {
            let i = self.cart_state.selected().unwrap_or(0);
            self.cart_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn cart_nav_up(&mut self) {
        let i = self.cart_state.selected().unwrap_or(0);
        self.cart_state.select(Some(i.saturating_sub(1)));
    }

    /// Change the highlighted cart line by `delta` units.
    pub fn adjust_selected_line(&mut self, delta: i64) {
        let Some(i) = self.cart_state.selected() else {
            return;
        };
        let Some(id) = self.cart.items().get(i).map(|item| item.product.id) else {
            return;
        };

        self.cart.update_quantity(id, delta);

        // Keep the selection on a valid line after a removal
        if self.cart.is_empty() {
            self.cart_state.select(None);
        } else if i >= self.cart.len() {
            self.cart_state.select(Some(self.cart.len() - 1));
        }
    }

    /// Drop the highlighted cart line whatever its quantity.
    pub fn remove_selected_line(&mut self) {
        let Some(id) = self
            .cart_state
            .selected()
            .and_then(|i| self.cart.items().get(i))
            .map(|item| item.product.id)
        else {
            return;
        };

        // A u64 quantity can exceed what one i64 delta removes
        while let Some(item) = self.cart.get(id) {
            let delta = i64::try_from(item.quantity).map_or(i64::MIN, |q| -q);
            self.adjust_selected_line(delta);
        }
    }

    pub fn checkout(&mut self) {
        if !self.cart.is_empty() {
            self.status = Some("Checkout is coming soon. Your cart is kept for now.".to_string());
        }
    }

    // Views
    pub fn set_view(&mut self, view: ViewState) {
        self.views.set_view(view);
    }

    // Chat panel
    pub fn open_chat_input(&mut self) {
        self.views.open_chat();
        self.input_mode = InputMode::Editing;
        self.chat_cursor = self.chat_input.chars().count();
    }

    pub fn close_chat(&mut self) {
        self.views.close_chat();
        self.input_mode = InputMode::Normal;
    }

    /// Send the chat input box contents to the sommelier.
    pub fn submit_chat(&mut self, tx: &UnboundedSender<AppEvent>) {
        let text = self.chat_input.clone();

        match self.chat.begin(&text, self.generator.clone()) {
            Ok((pending, generator)) => {
                self.chat_input.clear();
                self.chat_cursor = 0;
                spawn_reply(pending, generator, tx);
                self.scroll_chat_to_bottom();
            }
            Err(SendBlocked::NeedsCredential) => {
                self.deferred_message = Some(text);
                self.chat_input.clear();
                self.chat_cursor = 0;
                self.open_api_key_input();
            }
            Err(SendBlocked::EmptyInput) | Err(SendBlocked::InFlight) => {}
        }
    }

    pub fn on_chat_reply(&mut self, pending: PendingReply, result: Result<String, AiError>) {
        self.chat.complete(pending, result);
        self.scroll_chat_to_bottom();
    }

    // API key capture
    pub fn open_api_key_input(&mut self) {
        self.show_api_key_input = true;
        self.api_key_input.clear();
        self.api_key_input_cursor = 0;
    }

    /// Store the typed key, build the client and resume any deferred message.
    pub fn submit_api_key(&mut self, tx: &UnboundedSender<AppEvent>) {
        let key = self.api_key_input.trim().to_string();
        if key.is_empty() {
            return;
        }

        let client = match GeminiClient::new(&key, &self.config.model(), &self.config.base_url()) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "api key rejected");
                self.status = Some(format!("Could not use that key: {}", e));
                return;
            }
        };

        match &self.config_path {
            Some(path) => {
                if let Err(e) = self.config.save_api_key_to(path, &key) {
                    warn!(error = %e, "failed to save api key");
                    self.status = Some("Key is in use for this session but could not be saved.".to_string());
                }
            }
            None => self.config.gemini_api_key = Some(key),
        }

        self.resume_with_generator(Arc::new(client), tx);
    }

    pub fn resume_with_generator(
        &mut self,
        generator: Arc<dyn ResponseGenerator>,
        tx: &UnboundedSender<AppEvent>,
    ) {
        self.generator = Some(generator);
        self.show_api_key_input = false;
        self.api_key_input.clear();
        self.api_key_input_cursor = 0;

        if let Some(message) = self.deferred_message.take() {
            self.chat_input = message;
            self.submit_chat(tx);
        }
    }

    /// Close the key dialog without sending; the message goes back in the input box.
    pub fn cancel_api_key_input(&mut self) {
        self.show_api_key_input = false;
        self.api_key_input.clear();
        self.api_key_input_cursor = 0;

        if let Some(message) = self.deferred_message.take() {
            self.chat_input = message;
            self.chat_cursor = self.chat_input.chars().count();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat.is_in_flight() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll the transcript so the newest line (or "Thinking...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            40
        };

        let mut total_lines: u16 = 0;
        for msg in self.chat.transcript() {
            total_lines = total_lines.saturating_add(1); // Role line
            for line in msg.text.lines() {
                // Character count, not bytes, for UTF-8 text
                let char_count = line.chars().count();
                let wrapped = char_count.div_ceil(wrap_width).max(1);
                total_lines = total_lines.saturating_add(wrapped as u16);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.chat.is_in_flight() {
            total_lines = total_lines.saturating_add(2);
        }

        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}

/// Run the reply on a background task and post it back as [`AppEvent::ChatReply`].
///
/// The call runs in its own task so a panic inside the generator still
/// returns the pending reply and the session leaves the sending state.
fn spawn_reply(
    pending: PendingReply,
    generator: Arc<dyn ResponseGenerator>,
    tx: &UnboundedSender<AppEvent>,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let history = pending.history.clone();
        let message = pending.message.clone();
        let call = tokio::spawn(async move { generator.generate(&history, &message).await });

        let result = match call.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "chat: reply task failed");
                Err(AiError::ApiRequest(format!("reply task failed: {}", e)))
            }
        };

        // The receiver only goes away when the app is shutting down
        let _ = tx.send(AppEvent::ChatReply { pending, result });
    });
}
