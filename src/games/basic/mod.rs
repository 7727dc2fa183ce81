//! The basic set.
//!
//! Every card here is plain data plus an ability script; nothing in the
//! engine knows any of these classes by name.
//!
//! ```
//! use std::sync::Arc;
//! use ccg_rules::core::{Game, GameConfig, PlayerId};
//! use ccg_rules::games::basic::{self, classes};
//!
//! let library = Arc::new(basic::library());
//! let mut game = Game::new(GameConfig::default().with_mulligan_count(0), library);
//! for player in PlayerId::all() {
//!     game.load_deck(player, &[classes::TESTING_UNIT; 10]).unwrap();
//! }
//! game.start().unwrap();
//! assert_eq!(game.round(), 1);
//! ```

mod buffs;
mod cards;

use crate::cards::CardLibrary;

/// Class names of the basic set.
pub mod classes {
    pub const TESTING_UNIT: &str = "testingUnitNoEffect";
    pub const LOST_SHIELDBEARER: &str = "lostShieldbearer";
    pub const TRAVELING_ENCHANTRESS: &str = "travelingEnchantress";
    pub const ELDER_HOUNDMASTER: &str = "elderHoundmaster";
    pub const TRAINED_HOUND: &str = "trainedHound";
    pub const FAMINE_RIDER: &str = "famineRider";
    pub const CONQUEST_RIDER: &str = "conquestRider";
    pub const STUBBORN_KNIGHT: &str = "stubbornKnight";
    pub const ARCANE_SCHOLAR: &str = "arcaneScholar";
    pub const VOLATILE_CRYSTAL: &str = "volatileCrystal";

    pub const QUICK_STRIKE: &str = "quickStrike";
    pub const ARCANE_VOLLEY: &str = "arcaneVolley";
    pub const CRYSTAL_BARRAGE: &str = "crystalBarrage";
    pub const MENDING_TOUCH: &str = "mendingTouch";
    pub const VEIL_OF_MIST: &str = "veilOfMist";
    pub const CONJURE_ALLY: &str = "conjureAlly";
    pub const WILD_SPARK: &str = "wildSpark";

    pub const STRENGTH: &str = "strength";
    pub const PROTECTOR: &str = "protector";
    pub const SPELL_DISCOUNT: &str = "spellDiscount";
    pub const UNDYING: &str = "undying";
    pub const VEIL: &str = "veil";
}

/// A library holding every basic card and buff.
#[must_use]
pub fn library() -> CardLibrary {
    let mut library = CardLibrary::new();
    buffs::register(&mut library);
    cards::register(&mut library);
    library
}
