//! Page navigation state for the interactive shell.
//!
//! Navigation is an explicit value: [`AppState`] records the active page and
//! the last notice, and [`transition`] computes the next state from an
//! [`Event`]. Nothing here touches storage or the terminal.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Pages reachable from the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Menu,
    AddHouse,
    AddAppliance,
    ViewAppliances,
    AddDocument,
    GenerateIdentifier,
    Exit,
}

impl Page {
    /// Menu entries in display order; entry `n` is chosen by typing `n + 1`.
    pub const MENU: [Self; 6] = [
        Self::AddHouse,
        Self::AddAppliance,
        Self::ViewAppliances,
        Self::AddDocument,
        Self::GenerateIdentifier,
        Self::Exit,
    ];

    /// Heading shown for the page.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Menu => "Appliance Management System",
            Self::AddHouse => "Add House",
            Self::AddAppliance => "Add Appliance",
            Self::ViewAppliances => "View Appliances",
            Self::AddDocument => "Add Document",
            Self::GenerateIdentifier => "Generate QR Code",
            Self::Exit => "Quit",
        }
    }

    /// Parses a menu choice: a 1-based index or a case-insensitive title.
    pub fn from_choice(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(n) = input.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::MENU.get(i).copied());
        }
        match input.to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Some(Self::Exit),
            other => Self::MENU
                .into_iter()
                .find(|p| p.title().eq_ignore_ascii_case(other)),
        }
    }
}

/// Feedback from the last completed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Navigation state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub page: Page,
    /// House chosen most recently; offered as the default on later forms.
    pub selected_house: Option<i64>,
    pub notice: Option<Notice>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the user has quit.
    pub fn is_finished(&self) -> bool {
        self.page == Page::Exit
    }
}

/// Inputs driving navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Menu selection.
    Select(Page),
    /// Return to the menu without acting.
    Back,
    /// The user picked a house on a form.
    HouseSelected(i64),
    /// The current page's action succeeded.
    Completed(String),
    /// The current page's action failed. Recoverable failures keep the page
    /// open so the user can resubmit.
    Failed { message: String, recoverable: bool },
    Quit,
}

/// Computes the state following `event`.
pub fn transition(state: &AppState, event: Event) -> AppState {
    trace!(from = ?state.page, ?event, "Navigation event");
    let mut next = state.clone();
    match event {
        Event::Select(page) => {
            next.page = page;
            next.notice = None;
        }
        Event::Back => {
            next.page = Page::Menu;
            next.notice = None;
        }
        Event::HouseSelected(id) => {
            next.selected_house = Some(id);
        }
        Event::Completed(message) => {
            next.page = Page::Menu;
            next.notice = Some(Notice::Success(message));
        }
        Event::Failed {
            message,
            recoverable,
        } => {
            if !recoverable {
                next.page = Page::Menu;
            }
            next.notice = Some(Notice::Error(message));
        }
        Event::Quit => {
            next.page = Page::Exit;
        }
    }
    next
}
