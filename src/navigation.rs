//! View-navigation state for the presentation layer.
//!
//! The site has one selected page and a collapsible menu. The state is a
//! plain value; [`NavState::transition`] returns the next state for an event
//! instead of mutating anything shared.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Home,
    Professor,
    Honors,
    Patents,
    Conferences,
    Projects,
    Activities,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::Professor,
        Page::Honors,
        Page::Patents,
        Page::Conferences,
        Page::Projects,
        Page::Activities,
    ];

    /// Menu label.
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Professor => "Professor",
            Page::Honors => "Honors",
            Page::Patents => "Patents",
            Page::Conferences => "Conferences",
            Page::Projects => "Projects",
            Page::Activities => "Activities",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Show a page; also closes the menu.
    Select(Page),
    ToggleMenu,
    CloseMenu,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub page: Page,
    pub menu_open: bool,
}

impl NavState {
    pub fn transition(self, event: NavEvent) -> NavState {
        match event {
            NavEvent::Select(page) => NavState {
                page,
                menu_open: false,
            },
            NavEvent::ToggleMenu => NavState {
                menu_open: !self.menu_open,
                ..self
            },
            NavEvent::CloseMenu => NavState {
                menu_open: false,
                ..self
            },
        }
    }
}
