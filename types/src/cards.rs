//! Card values as the simulation service reports them.
//!
//! The service works with a single deck collapsed to ten ranks: `1` is an ace and `10` covers every
//! ten-valued card. Anything else on the wire is kept as [`Card::Unknown`] so a bad code degrades
//! to a placeholder instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Symbol shown for a card whose value was withheld.
pub const CARD_BACK: &str = "🂠";

/// Symbol shown for a card code outside the known ranks.
pub const UNKNOWN_CARD: &str = "?";

const LABELS: [&str; 10] = ["A", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

const EMOJI: [&str; 10] = [
    "🅰️", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟",
];

/// A card rank in `1..=10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardRank(u8);

impl CardRank {
    pub const ACE: Self = Self(1);
    pub const TEN: Self = Self(10);

    /// Returns `None` when `value` is not a rank the service deals.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 10 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        LABELS[usize::from(self.0 - 1)]
    }

    pub fn emoji(self) -> &'static str {
        EMOJI[usize::from(self.0 - 1)]
    }
}

impl fmt::Display for CardRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How cards are drawn by the view layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardStyle {
    #[default]
    Text,
    Emoji,
}

/// A card as carried by a step or summary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Card {
    Rank(CardRank),
    /// Raw code that did not map to a rank.
    Unknown(String),
}

impl Card {
    pub fn rank(&self) -> Option<CardRank> {
        match self {
            Card::Rank(rank) => Some(*rank),
            Card::Unknown(_) => None,
        }
    }

    pub fn render(&self, style: CardStyle) -> &'static str {
        match (self, style) {
            (Card::Rank(rank), CardStyle::Text) => rank.label(),
            (Card::Rank(rank), CardStyle::Emoji) => rank.emoji(),
            (Card::Unknown(_), _) => UNKNOWN_CARD,
        }
    }

    /// Map a JSON card code. Never fails: unmapped codes become [`Card::Unknown`].
    pub fn from_json(value: &Value) -> Self {
        let rank = value
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .and_then(CardRank::new);
        match (rank, value) {
            (Some(rank), _) => Card::Rank(rank),
            (None, Value::String(raw)) => Card::Unknown(raw.clone()),
            (None, other) => Card::Unknown(other.to_string()),
        }
    }
}

impl From<CardRank> for Card {
    fn from(rank: CardRank) -> Self {
        Card::Rank(rank)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(CardStyle::Text))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Card::Rank(rank) => serializer.serialize_u8(rank.value()),
            Card::Unknown(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Card::from_json(&value))
    }
}

/// Render an optional card; an absent value is a face-down card.
pub fn render_optional(card: Option<&Card>, style: CardStyle) -> &'static str {
    card.map_or(CARD_BACK, |card| card.render(style))
}
