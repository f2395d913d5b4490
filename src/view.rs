#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Home,
    Shop,
    About,
}

impl ViewState {
    pub fn all() -> [ViewState; 3] {
        [ViewState::Home, ViewState::Shop, ViewState::About]
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewState::Home => "Home",
            ViewState::Shop => "Shop",
            ViewState::About => "Our Heritage",
        }
    }
}

/// Which screen is showing and which overlays are open.
///
/// The cart drawer and chat panel flags are independent of each other and
/// of the active screen.
#[derive(Debug, Default)]
pub struct ViewController {
    view: ViewState,
    cart_open: bool,
    chat_open: bool,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    pub fn open_cart(&mut self) {
        self.cart_open = true;
    }

    pub fn close_cart(&mut self) {
        self.cart_open = false;
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn open_chat(&mut self) {
        self.chat_open = true;
    }

    pub fn close_chat(&mut self) {
        self.chat_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_home_with_overlays_closed() {
        let views = ViewController::new();
        assert_eq!(views.view(), ViewState::Home);
        assert!(!views.is_cart_open());
        assert!(!views.is_chat_open());
    }

    #[test]
    fn test_set_view_replaces_unconditionally() {
        let mut views = ViewController::new();
        views.set_view(ViewState::About);
        views.set_view(ViewState::About);
        assert_eq!(views.view(), ViewState::About);
        views.set_view(ViewState::Shop);
        assert_eq!(views.view(), ViewState::Shop);
    }

    #[test]
    fn test_cart_flag_independent_of_view() {
        let mut views = ViewController::new();
        views.open_cart();
        views.set_view(ViewState::Shop);
        assert!(views.is_cart_open());

        views.close_cart();
        assert_eq!(views.view(), ViewState::Shop);
        assert!(!views.is_cart_open());
    }

    #[test]
    fn test_chat_flag_independent_of_cart() {
        let mut views = ViewController::new();
        views.open_chat();
        views.open_cart();
        views.close_cart();
        assert!(views.is_chat_open());
    }
}
