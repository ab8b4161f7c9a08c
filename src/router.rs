//! Client-side view routing. The router owns the only copy of the
//! navigation state; the root view reads it to decide what to render.

use crate::page::PageId;

/// Something that can reset the document scroll position.
pub trait ScrollPort {
    fn scroll_to_origin(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub current_page: PageId,
    pub menu_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Router {
    state: NavigationState,
    unknown_key: bool,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn current_page(&self) -> PageId {
        self.state.current_page
    }

    pub fn menu_open(&self) -> bool {
        self.state.menu_open
    }

    /// Page whose background should be shown. `None` after navigating to a
    /// key that names no page: home content is rendered without a backdrop.
    pub fn backdrop_page(&self) -> Option<PageId> {
        (!self.unknown_key).then_some(self.state.current_page)
    }

    /// Switch page, close the menu and scroll back to the top.
    pub fn navigate(&mut self, page: PageId, port: &dyn ScrollPort) {
        if page != self.state.current_page {
            log::info!("navigate {} -> {}", self.state.current_page, page);
        }
        self.state.current_page = page;
        self.state.menu_open = false;
        self.unknown_key = false;
        port.scroll_to_origin();
    }

    pub fn navigate_key(&mut self, key: &str, port: &dyn ScrollPort) -> PageId {
        let page = PageId::resolve(key);
        self.navigate(page, port);
        if PageId::from_key(key).is_none() {
            log::debug!("unknown page key {key:?}, showing {page} without background");
            self.unknown_key = true;
        }
        page
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.state.menu_open = !self.state.menu_open;
        self.state.menu_open
    }
}
