//! Match lifecycle: mulligan, turns, rounds, morale and the client surface.

use std::sync::Arc;

use ccg_rules::cards::CardType;
use ccg_rules::core::{Game, GameConfig, GamePhase, PlayerId};
use ccg_rules::games::basic::{self, classes};
use ccg_rules::net::{BuffView, Delivery, HiddenBuffMessage, IntentOutcome, OutgoingMessage, RejectReason};
use ccg_rules::rules::{BotPlayer, FinishReason};
use ccg_rules::targeting::TargetMode;
use ccg_rules::zones::CardLocation;
use tracing_subscriber::EnvFilter;

const FIRST: PlayerId = PlayerId::FIRST;
const SECOND: PlayerId = PlayerId::SECOND;

/// Route engine logs to the test output; `RUST_LOG=ccg_rules=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn game_with(config: GameConfig, deck: &[&str]) -> Game {
    let mut game = Game::new(config, Arc::new(basic::library()));
    for player in PlayerId::all() {
        game.load_deck(player, deck).unwrap();
    }
    game
}

/// A started match with `units` cards in each opening hand and no mulligan.
fn deploy_game(config: GameConfig, units: usize) -> Game {
    let config = config.with_mulligan_count(0).with_starting_hand(units, 0);
    let mut game = game_with(config, &[classes::TESTING_UNIT; 10]);
    game.start().unwrap();
    game.drain_messages();
    game
}

fn first_in_hand(game: &Game, player: PlayerId) -> ccg_rules::core::CardId {
    game.zones().cards_in(CardLocation::Hand(player))[0]
}

fn messages_to(deliveries: Vec<Delivery>, player: PlayerId) -> Vec<OutgoingMessage> {
    deliveries
        .into_iter()
        .filter(|d| d.to == player)
        .map(|d| d.message)
        .collect()
}

// =============================================================================
// Mulligan
// =============================================================================

/// Each pick swaps a card for the top of the deck; ending the turn confirms.
#[test]
fn test_mulligan_flow() {
    let mut game = game_with(GameConfig::default(), &[classes::TESTING_UNIT; 12]);
    game.start().unwrap();
    assert_eq!(game.phase(), GamePhase::Mulligan);
    assert_eq!(game.hand_count(FIRST, CardType::Unit), 8);

    let request = game.pending_target_request(FIRST).unwrap();
    assert_eq!(request.mode, TargetMode::Mulligan);
    assert_eq!(request.targets.len(), 8);
    let picked = request.targets[0].subject.card().unwrap();

    assert!(game.select_mulligan_target(FIRST, request.targets[0].clone()).unwrap().is_applied());
    assert_eq!(game.card_location(picked), Some(CardLocation::Deck(FIRST)));
    assert_eq!(game.hand_count(FIRST, CardType::Unit), 8);
    assert_eq!(game.zones().size(CardLocation::Deck(FIRST)), 4);

    assert!(game.end_turn(SECOND).unwrap().is_applied());
    assert!(game.player(SECOND).mulligan_confirmed());
    assert_eq!(game.phase(), GamePhase::Mulligan);
    assert!(game.pending_target_request(SECOND).is_none());

    assert!(game.end_turn(FIRST).unwrap().is_applied());
    assert_eq!(game.phase(), GamePhase::Deploy);
    assert_eq!(game.round(), 1);
    assert_eq!(game.active_player(), FIRST);
}

/// Using the last pick confirms automatically.
#[test]
fn test_mulligan_confirms_when_picks_run_out() {
    let config = GameConfig::default().with_mulligan_count(1);
    let mut game = game_with(config, &[classes::TESTING_UNIT; 12]);
    game.start().unwrap();

    let target = game.pending_target_request(FIRST).unwrap().targets.remove(0);
    assert!(game.select_mulligan_target(FIRST, target.clone()).unwrap().is_applied());
    assert!(game.player(FIRST).mulligan_confirmed());
    assert_eq!(
        game.select_mulligan_target(FIRST, target).unwrap(),
        IntentOutcome::Rejected(RejectReason::NothingToTarget)
    );
}

/// Deploy intents wait for the mulligan to finish.
#[test]
fn test_no_play_during_mulligan() {
    let mut game = game_with(GameConfig::default(), &[classes::TESTING_UNIT; 12]);
    game.start().unwrap();
    let card = first_in_hand(&game, FIRST);

    assert_eq!(
        game.play_card(FIRST, card, 3, 0).unwrap(),
        IntentOutcome::Rejected(RejectReason::WrongPhase)
    );
}

// =============================================================================
// Turns and rounds
// =============================================================================

/// Players alternate; passing drops a player out of the round.
#[test]
fn test_turns_alternate_until_both_pass() {
    let mut game = deploy_game(GameConfig::default(), 2);
    assert_eq!(game.player(FIRST).unit_mana(), 1);
    assert_eq!(game.player(FIRST).spell_mana(), 6);

    let card = first_in_hand(&game, FIRST);
    assert!(game.play_card(FIRST, card, 3, 0).unwrap().is_applied());
    assert!(game.end_turn(FIRST).unwrap().is_applied());
    assert!(!game.player(FIRST).round_ended());
    assert_eq!(game.active_player(), SECOND);
    assert_eq!(
        game.end_turn(FIRST).unwrap(),
        IntentOutcome::Rejected(RejectReason::NotYourTurn)
    );

    assert!(game.end_turn(SECOND).unwrap().is_applied());
    assert!(game.player(SECOND).round_ended());
    assert_eq!(game.active_player(), FIRST);
    assert_eq!(game.player(FIRST).unit_mana(), 1);

    // FIRST keeps the turn while SECOND has passed.
    let card = first_in_hand(&game, FIRST);
    assert!(game.play_card(FIRST, card, 3, 1).unwrap().is_applied());
    assert!(game.end_turn(FIRST).unwrap().is_applied());
    assert_eq!(game.active_player(), FIRST);
    assert_eq!(game.round(), 1);

    assert!(game.end_turn(FIRST).unwrap().is_applied());
    assert_eq!(game.round(), 2);
}

/// The weaker side loses morale, the board is cleared and the next round
/// opens with the other player and fresh cards.
#[test]
fn test_round_end_scores_and_resets() {
    let mut game = deploy_game(GameConfig::default(), 2);
    let card = first_in_hand(&game, FIRST);
    assert!(game.play_card(FIRST, card, 3, 0).unwrap().is_applied());
    game.set_row_owner(2, Some(FIRST)).unwrap();
    game.end_turn(FIRST).unwrap();
    game.end_turn(SECOND).unwrap();
    game.drain_messages();
    game.end_turn(FIRST).unwrap();

    assert_eq!(game.player(FIRST).morale(), 3);
    assert_eq!(game.player(SECOND).morale(), 2);
    assert_eq!(game.card_location(card), Some(CardLocation::Graveyard(FIRST)));
    assert_eq!(game.board().all_units().count(), 0);
    assert_eq!(game.board().row(2).unwrap().owner(), Some(SECOND));

    assert_eq!(game.round(), 2);
    assert_eq!(game.active_player(), SECOND);
    assert_eq!(game.player(FIRST).spell_mana(), 12);
    assert_eq!(game.hand_count(FIRST, CardType::Unit), 4);
    assert_eq!(game.hand_count(SECOND, CardType::Unit), 5);

    let seen = messages_to(game.drain_messages(), SECOND);
    assert!(seen.contains(&OutgoingMessage::RoundEnded {
        round: 1,
        victorious: Some(FIRST),
    }));
    assert!(seen.contains(&OutgoingMessage::RoundStarted { round: 2 }));
}

/// A tied round costs both players morale.
#[test]
fn test_tied_round_costs_both() {
    let mut game = deploy_game(GameConfig::default(), 0);
    game.end_turn(FIRST).unwrap();
    game.end_turn(SECOND).unwrap();

    assert_eq!(game.player(FIRST).morale(), 2);
    assert_eq!(game.player(SECOND).morale(), 2);
    assert_eq!(game.round(), 2);
}

// =============================================================================
// Finishing
// =============================================================================

/// The player left without morale loses.
#[test]
fn test_morale_loss_finishes_match() {
    let mut game = deploy_game(GameConfig::default().with_starting_morale(1), 1);
    let card = first_in_hand(&game, FIRST);
    game.play_card(FIRST, card, 3, 0).unwrap();
    game.end_turn(FIRST).unwrap();
    game.end_turn(SECOND).unwrap();
    game.end_turn(FIRST).unwrap();

    assert_eq!(game.phase(), GamePhase::Finished);
    let outcome = game.outcome().unwrap();
    assert!(outcome.is_winner(FIRST));
    assert_eq!(outcome.reason, FinishReason::Morale);
    assert!(messages_to(game.drain_messages(), SECOND).contains(&OutgoingMessage::GameFinished {
        victorious: Some(FIRST),
        reason: FinishReason::Morale,
    }));

    let spare = first_in_hand(&game, SECOND);
    assert_eq!(
        game.play_card(SECOND, spare, 2, 0).unwrap(),
        IntentOutcome::Rejected(RejectReason::MatchNotRunning)
    );
}

/// Both players hitting zero together is a draw.
#[test]
fn test_simultaneous_defeat_is_draw() {
    let mut game = deploy_game(GameConfig::default().with_starting_morale(1), 0);
    game.end_turn(FIRST).unwrap();
    game.end_turn(SECOND).unwrap();

    let outcome = game.outcome().unwrap();
    assert!(outcome.is_draw());
    assert!(!game.is_running());
}

#[test]
fn test_surrender() {
    let mut game = deploy_game(GameConfig::default(), 0);

    assert!(game.handle_message(SECOND, r#"{"type":"surrender"}"#).unwrap().is_applied());
    let outcome = game.outcome().unwrap();
    assert!(outcome.is_winner(FIRST));
    assert_eq!(outcome.reason, FinishReason::Surrender);
    assert_eq!(
        game.surrender(FIRST).unwrap(),
        IntentOutcome::Rejected(RejectReason::MatchNotRunning)
    );
}

/// Destroying a match tells both players once and stops all intents.
#[test]
fn test_destroy_match() {
    let mut game = deploy_game(GameConfig::default(), 0);
    game.destroy_match("host shutdown");
    game.destroy_match("again");

    assert_eq!(game.phase(), GamePhase::Destroyed);
    assert_eq!(game.outcome().unwrap().reason, FinishReason::Destroyed);
    let destroyed: Vec<Delivery> = game
        .drain_messages()
        .into_iter()
        .filter(|d| matches!(d.message, OutgoingMessage::GameDestroyed { .. }))
        .collect();
    assert_eq!(destroyed.len(), 2);
    assert_eq!(
        game.end_turn(FIRST).unwrap(),
        IntentOutcome::Rejected(RejectReason::MatchNotRunning)
    );
}

// =============================================================================
// Client surface
// =============================================================================

/// Raw JSON intents are applied like typed ones.
#[test]
fn test_handle_message_plays_card() {
    let mut game = deploy_game(GameConfig::default(), 1);
    let card = first_in_hand(&game, FIRST);
    let raw = format!(r#"{{"type":"playCard","data":{{"card":{},"row":4,"index":0}}}}"#, card.0);

    assert!(game.handle_message(FIRST, &raw).unwrap().is_applied());
    assert_eq!(game.board().row(4).unwrap().units(), &[card]);
}

/// A rejected intent sends the player a snapshot to resync from.
#[test]
fn test_rejection_sends_snapshot() {
    let mut game = deploy_game(GameConfig::default(), 1);
    let card = first_in_hand(&game, FIRST);
    let raw = format!(r#"{{"type":"playCard","data":{{"card":{},"row":1,"index":0}}}}"#, card.0);

    assert_eq!(
        game.handle_message(FIRST, &raw).unwrap(),
        IntentOutcome::Rejected(RejectReason::InvalidRow)
    );
    let deliveries = game.drain_messages();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].to, FIRST);
    assert!(matches!(deliveries[0].message, OutgoingMessage::Snapshot(_)));
}

#[test]
fn test_malformed_message_is_an_error() {
    let mut game = deploy_game(GameConfig::default(), 0);
    assert!(game.handle_message(FIRST, "{not json").is_err());
    assert!(game.is_running());
}

/// Changes to a card in a hidden hand reach the opponent in redacted form.
#[test]
fn test_hidden_card_updates_are_redacted() {
    let mut game = deploy_game(GameConfig::default(), 1);
    let card = first_in_hand(&game, FIRST);

    let buff = game.add_buff(card, classes::STRENGTH, None).unwrap();
    let deliveries = game.drain_messages();

    let to_owner = messages_to(deliveries.clone(), FIRST);
    assert_eq!(to_owner.len(), 2);
    assert!(matches!(&to_owner[0], OutgoingMessage::BuffAdded(BuffView::Visible(message)) if message.class == classes::STRENGTH));
    assert!(matches!(&to_owner[1], OutgoingMessage::CardStatsChanged { stats, .. } if stats.max_power == 6));

    let to_opponent = messages_to(deliveries, SECOND);
    assert_eq!(to_opponent.len(), 2);
    assert_eq!(
        to_opponent[0],
        OutgoingMessage::BuffAdded(BuffView::Hidden(HiddenBuffMessage {
            id: buff,
            card,
            source: None,
        }))
    );
    assert!(matches!(&to_opponent[1], OutgoingMessage::HiddenCardChanged(hidden) if hidden.id == card));

    let json = serde_json::to_value(&to_opponent[0]).unwrap();
    assert_eq!(json["type"], "card/buffAdded");
    assert!(json["data"].get("class").is_none());

    game.remove_buff(card, buff).unwrap();
    let to_opponent = messages_to(game.drain_messages(), SECOND);
    assert!(to_opponent.contains(&OutgoingMessage::BuffRemoved { card, buff }));
    assert!(to_opponent
        .iter()
        .all(|m| !matches!(m, OutgoingMessage::CardStatsChanged { .. })));
}

/// Snapshots show the viewer's hand and only card backs of the opponent's.
#[test]
fn test_snapshot_hides_opponent_hand() {
    let game = deploy_game(GameConfig::default(), 3);
    let snapshot = game.snapshot_for(FIRST).unwrap();

    assert_eq!(snapshot.viewer, FIRST);
    assert_eq!(snapshot.hand.len(), 3);
    assert_eq!(snapshot.opponent_hand.len(), 3);
    assert!(snapshot.opponent_hand.iter().all(|card| card.is_hidden()));
    assert_eq!(snapshot.rows.len(), 6);
    assert_eq!(snapshot.rows[2].owner, Some(SECOND));
    assert_eq!(snapshot.rows[3].owner, Some(FIRST));
    assert!(snapshot.pending_targets.is_none());

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["activePlayer"], 0);
}

// =============================================================================
// Bots
// =============================================================================

/// Two bots play a full match to completion.
#[test]
fn test_bot_match_finishes() {
    init_tracing();
    let deck = [
        classes::TESTING_UNIT,
        classes::TESTING_UNIT,
        classes::TESTING_UNIT,
        classes::TESTING_UNIT,
        classes::ELDER_HOUNDMASTER,
        classes::ELDER_HOUNDMASTER,
        classes::STUBBORN_KNIGHT,
        classes::STUBBORN_KNIGHT,
        classes::LOST_SHIELDBEARER,
        classes::ARCANE_SCHOLAR,
        classes::TRAVELING_ENCHANTRESS,
        classes::FAMINE_RIDER,
        classes::QUICK_STRIKE,
        classes::QUICK_STRIKE,
        classes::ARCANE_VOLLEY,
        classes::MENDING_TOUCH,
        classes::VEIL_OF_MIST,
        classes::CONJURE_ALLY,
    ];
    let mut game = game_with(GameConfig::default().with_rng_seed(7), &deck);
    game.start().unwrap();
    let bots = [BotPlayer::new(FIRST), BotPlayer::new(SECOND)];

    let mut passes = 0;
    while game.is_running() && passes < 1_000 {
        for bot in &bots {
            bot.act(&mut game, 100).unwrap();
        }
        passes += 1;
    }

    assert!(!game.is_running());
    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.reason, FinishReason::Morale);
    let losers = PlayerId::all().filter(|&p| game.player(p).morale() == 0).count();
    assert!(losers >= 1);
}
