//! Integration test: match start, connection loss and tick gating.
//!
//! Drives a [`Game`] through the platform queues the way a client binary
//! does, and checks what ends up in the command and render streams.

use rampart_core::{PlayerId, TickId};
use rampart_engine::{
    Game, GameConfig, GameState, NetEventKind, TickPolicy, UpdateInput, PLAYER_COLORS,
};
use rampart_test_utils::{
    drain_draw_squares, drain_net_commands, memory_for, order, push_event, push_order_list,
    push_start, NetCommand, PlatformQueues, Queues,
};

const T0: u64 = 5_000_000;
const TICK: u64 = 100_000;

/// Start a two-player match at `T0` and clear the queues.
fn start_match(game: &mut Game<'_>, q: &mut Queues<'_>) {
    push_start(&mut q.events, 2, 0);
    let report = q.update(game, UpdateInput::at(T0)).unwrap();
    assert!(report.running);
    assert_eq!(game.state(), GameState::Running);
    q.reset();
}

// ── Match start ──────────────────────────────────────────────────────

#[test]
fn start_creates_players_and_replies() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    push_event(&mut q.events, NetEventKind::ConnectionEstablished);
    push_start(&mut q.events, 2, 0);
    let report = q.update(&mut game, UpdateInput::at(T0)).unwrap();

    assert!(report.running);
    assert_eq!(report.events, 2);
    assert!(report.ticks.is_empty());
    assert_eq!(game.state(), GameState::Running);
    assert_eq!(game.simulation().player_count(), 2);
    assert_eq!(game.local_player(), PlayerId(0));
    assert_eq!(game.next_tick_time(), T0 + TICK);
    assert_eq!(game.simulation().tick_id(), TickId(0));
    assert_eq!(drain_net_commands(&mut q.commands), vec![NetCommand::reply()]);
}

#[test]
fn start_renders_every_unit_in_owner_color() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    push_start(&mut q.events, 2, 0);
    let report = q.update(&mut game, UpdateInput::at(T0)).unwrap();
    let squares = drain_draw_squares(&mut q.render);

    assert_eq!(report.render_commands, 8);
    assert_eq!(squares.len(), 8);
    for (square, unit) in squares.iter().zip(game.simulation().units()) {
        assert_eq!((square.x, square.y), (unit.position.x, unit.position.y));
        assert_eq!(square.color, PLAYER_COLORS[unit.player.index()]);
    }
    assert_eq!(squares[0].color, PLAYER_COLORS[0]);
    assert_eq!(squares[7].color, PLAYER_COLORS[1]);
}

#[test]
fn nothing_renders_before_start() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    push_event(&mut q.events, NetEventKind::ConnectionEstablished);
    let report = q.update(&mut game, UpdateInput::at(T0)).unwrap();

    assert!(report.running);
    assert_eq!(report.render_commands, 0);
    assert_eq!(q.output_bytes(), 0);
    assert_eq!(game.state(), GameState::WaitingForStart);
}

// ── Connection loss ──────────────────────────────────────────────────

#[test]
fn connection_lost_stops_without_further_mutation() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    push_event(&mut q.events, NetEventKind::ConnectionLost);
    push_order_list(&mut q.events, &[order(0, 0, 1, 0, 0)]);
    let report = q
        .update(
            &mut game,
            UpdateInput {
                time: T0 + 5 * TICK,
                termination_requested: true,
                ..UpdateInput::default()
            },
        )
        .unwrap();

    assert!(!report.running);
    assert_eq!(report.events, 1);
    assert!(report.ticks.is_empty());
    assert_eq!(report.render_commands, 0);
    assert_eq!(q.output_bytes(), 0);
    assert!(!q.events.is_empty(), "events after the loss stay unread");
    assert_eq!(game.pending_order_lists(), 0);
    assert_eq!(game.next_tick_time(), T0 + TICK);
    assert_eq!(game.state(), GameState::Terminating);
}

#[test]
fn connection_failed_before_start_stops() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    push_event(&mut q.events, NetEventKind::ConnectionFailed);
    let report = q.update(&mut game, UpdateInput::at(0)).unwrap();

    assert!(!report.running);
    assert!(!game.is_running());
    assert_eq!(q.output_bytes(), 0);
}

// ── Termination ──────────────────────────────────────────────────────

#[test]
fn termination_flushes_shutdown_then_goes_quiet() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    let report = q
        .update(
            &mut game,
            UpdateInput {
                time: T0 + TICK / 2,
                termination_requested: true,
                ..UpdateInput::default()
            },
        )
        .unwrap();
    assert!(!report.running);
    assert_eq!(report.render_commands, 8, "the final frame still renders");
    assert_eq!(drain_net_commands(&mut q.commands), vec![NetCommand::Shutdown]);
    assert_eq!(game.state(), GameState::Terminating);
    q.reset();

    push_order_list(&mut q.events, &[order(0, 0, 1, 0, 0)]);
    let report = q.update(&mut game, UpdateInput::at(T0 + 3 * TICK)).unwrap();
    assert!(!report.running);
    assert_eq!(report.events, 0);
    assert_eq!(q.output_bytes(), 0);
    assert_eq!(game.pending_order_lists(), 0);
}

#[test]
fn termination_before_start_sends_shutdown() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    let report = q
        .update(
            &mut game,
            UpdateInput {
                time: 0,
                termination_requested: true,
                ..UpdateInput::default()
            },
        )
        .unwrap();
    assert!(!report.running);
    assert_eq!(drain_net_commands(&mut q.commands), vec![NetCommand::Shutdown]);
}

// ── Tick gating ──────────────────────────────────────────────────────

#[test]
fn await_orders_stalls_on_empty_ring() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    let due = game.next_tick_time();
    let report = q.update(&mut game, UpdateInput::at(due)).unwrap();

    assert!(report.ticks.is_empty());
    assert_eq!(game.next_tick_time(), due);
    assert_eq!(game.simulation().tick_id(), TickId(0));
    assert_eq!(game.metrics().ticks, 0);
}

#[test]
fn fixed_rate_ticks_on_empty_ring() {
    let config = GameConfig {
        tick_policy: TickPolicy::FixedRate,
        ..GameConfig::default()
    };
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    let due = game.next_tick_time();
    let report = q.update(&mut game, UpdateInput::at(due)).unwrap();

    assert_eq!(report.ticks.as_slice(), &[TickId(1)]);
    assert_eq!(game.next_tick_time(), due + TICK);
    assert_eq!(game.simulation().tick_id(), TickId(1));
    assert_eq!(game.backlog().latest(), Some(0));
}

#[test]
fn no_tick_before_due_time() {
    let config = GameConfig {
        tick_policy: TickPolicy::FixedRate,
        ..GameConfig::default()
    };
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    let almost = game.next_tick_time() - 1;
    let report = q.update(&mut game, UpdateInput::at(almost)).unwrap();
    assert!(report.ticks.is_empty());
}
