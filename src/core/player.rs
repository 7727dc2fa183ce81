//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! A match always seats exactly two players, `PlayerId(0)` and `PlayerId(1)`.
//! `opponent()` flips between them.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats in a match.
pub const PLAYER_COUNT: usize = 2;

/// Identifier of one of the two seated players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The player who takes the first turn.
    pub const FIRST: PlayerId = PlayerId(0);
    /// The player who takes the second turn.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a new player ID.
    ///
    /// ```
    /// use ccg_rules::core::PlayerId;
    /// assert_eq!(PlayerId::new(1), PlayerId::SECOND);
    /// ```
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seated player.
    ///
    /// ```
    /// use ccg_rules::core::PlayerId;
    /// assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
    /// assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - (self.0 & 1))
    }

    /// Both player IDs in seat order.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        [Self::FIRST, Self::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage.
///
/// ```
/// use ccg_rules::core::{PlayerId, PlayerMap};
///
/// let mut morale: PlayerMap<u32> = PlayerMap::new(|_| 3);
/// morale[PlayerId::SECOND] -= 1;
/// assert_eq!(morale[PlayerId::FIRST], 3);
/// assert_eq!(morale[PlayerId::SECOND], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Map each entry to a new value.
    pub fn map<U>(&self, f: impl Fn(PlayerId, &T) -> U) -> PlayerMap<U> {
        PlayerMap::new(|player| f(player, self.get(player)))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        for player in PlayerId::all() {
            assert_eq!(player.opponent().opponent(), player);
            assert_ne!(player.opponent(), player);
        }
    }

    #[test]
    fn test_player_map_iteration_order() {
        let map = PlayerMap::new(|p| p.index() * 10);
        let collected: Vec<_> = map.iter().map(|(p, v)| (p, *v)).collect();
        assert_eq!(collected, vec![(PlayerId(0), 0), (PlayerId(1), 10)]);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<Vec<u32>> = PlayerMap::with_default();
        map[PlayerId::FIRST].push(1);
        for (_, v) in map.iter_mut() {
            v.push(2);
        }
        assert_eq!(map[PlayerId::FIRST], vec![1, 2]);
        assert_eq!(map[PlayerId::SECOND], vec![2]);
    }

    #[test]
    fn test_map_projection() {
        let map = PlayerMap::new(|p| p.index() as i32);
        let doubled = map.map(|_, v| v * 2);
        assert_eq!(doubled[PlayerId::SECOND], 2);
    }
}
