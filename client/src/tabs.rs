//! Tab state. Exactly one tab is active at any time.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    PlayHand,
    Tournament,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::PlayHand, Tab::Tournament];

    pub fn title(self) -> &'static str {
        match self {
            Tab::PlayHand => "Play Hand",
            Tab::Tournament => "Tournament",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::PlayHand => 0,
            Tab::Tournament => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Tab::ALL.get(index).copied()
    }

    pub fn from_name(name: &str) -> Option<Tab> {
        match name.to_lowercase().as_str() {
            "hand" | "play" | "play-hand" => Some(Tab::PlayHand),
            "match" | "tournament" => Some(Tab::Tournament),
            _ => None,
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Activate `tab`. Returns whether anything changed; switching to the active tab is a no-op.
    pub fn switch(&mut self, tab: Tab) -> bool {
        if self.active == tab {
            return false;
        }
        self.active = tab;
        true
    }

    /// Every tab with its active marker, in display order.
    pub fn markers(&self) -> impl Iterator<Item = (Tab, bool)> + '_ {
        Tab::ALL.into_iter().map(move |tab| (tab, self.is_active(tab)))
    }
}
