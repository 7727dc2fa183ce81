//! Target descriptors.
//!
//! A [`CardTarget`] names one candidate for a card play, a deploy effect, a
//! unit order or a mulligan pick. The engine produces them, clients send them
//! back unchanged, and the engine accepts a selection only when an equal
//! descriptor is in a freshly computed list. Equality ignores the label and
//! the bot score so a client cannot make a stale pick match by editing those.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};

/// What a target is being chosen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetMode {
    /// Where a card from hand is played.
    CardPlay,
    /// Targets of a card's deploy or spell effect.
    DeployEffect,
    /// What an on-board unit is ordered against.
    UnitOrder,
    /// Cards replaced from the opening hand.
    Mulligan,
}

/// Candidate category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetType {
    Unit,
    BoardRow,
    /// An insertion slot inside a row.
    Position,
    /// A card class offered from the library.
    CardInLibrary,
    CardInUnitHand,
    CardInSpellHand,
    CardInUnitDeck,
    CardInSpellDeck,
}

impl TargetType {
    /// Whether candidates are cards held in a zone, which are listed in
    /// canonical card order.
    #[must_use]
    pub fn is_card_zone(self) -> bool {
        matches!(
            self,
            TargetType::CardInLibrary
                | TargetType::CardInUnitHand
                | TargetType::CardInSpellHand
                | TargetType::CardInUnitDeck
                | TargetType::CardInSpellDeck
        )
    }
}

/// The thing a target points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetSubject {
    Unit { card: CardId },
    Row { row: usize },
    Position { row: usize, index: usize },
    /// A card in a hand or deck.
    Card { card: CardId },
    LibraryCard { class: String },
}

impl TargetSubject {
    /// The card instance behind a unit or zone-card subject.
    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self {
            TargetSubject::Unit { card } | TargetSubject::Card { card } => Some(*card),
            _ => None,
        }
    }

    /// The row behind a row or position subject.
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        match self {
            TargetSubject::Row { row } | TargetSubject::Position { row, .. } => Some(*row),
            _ => None,
        }
    }
}

/// One selectable target.
///
/// ```
/// use ccg_rules::core::CardId;
/// use ccg_rules::targeting::{CardTarget, TargetMode, TargetSubject, TargetType};
///
/// let offered = CardTarget::new(
///     TargetMode::DeployEffect,
///     TargetType::Unit,
///     Some(CardId(1)),
///     TargetSubject::Unit { card: CardId(9) },
/// )
/// .with_label("Strike")
/// .with_expected_value(4);
///
/// let json = serde_json::to_string(&offered).unwrap();
/// let returned: CardTarget = serde_json::from_str(&json).unwrap();
/// assert_eq!(offered, returned);
/// assert_eq!(returned.label, "Strike");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTarget {
    pub mode: TargetMode,
    pub target_type: TargetType,
    /// Acting card; `None` for mulligan picks.
    pub source: Option<CardId>,
    pub subject: TargetSubject,
    #[serde(default)]
    pub label: String,
    /// Bot preference score.
    #[serde(default)]
    pub expected_value: i32,
}

impl CardTarget {
    #[must_use]
    pub fn new(
        mode: TargetMode,
        target_type: TargetType,
        source: Option<CardId>,
        subject: TargetSubject,
    ) -> Self {
        Self {
            mode,
            target_type,
            source,
            subject,
            label: String::new(),
            expected_value: 0,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_expected_value(mut self, value: i32) -> Self {
        self.expected_value = value;
        self
    }
}

impl PartialEq for CardTarget {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.target_type == other.target_type
            && self.source == other.source
            && self.subject == other.subject
    }
}

impl Eq for CardTarget {}

/// Context handed to target requirements and evaluators.
#[derive(Debug)]
pub struct TargetArgs<'a> {
    pub mode: TargetMode,
    pub target_type: TargetType,
    pub source: Option<CardId>,
    /// The choosing player.
    pub player: PlayerId,
    pub subject: &'a TargetSubject,
    /// Targets already confirmed in this resolution.
    pub previous: &'a [CardTarget],
}

impl TargetArgs<'_> {
    /// Shorthand for [`TargetSubject::card`].
    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        self.subject.card()
    }

    /// Shorthand for [`TargetSubject::row`].
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        self.subject.row()
    }
}
