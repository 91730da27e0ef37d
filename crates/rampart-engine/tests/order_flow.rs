//! Integration test: order lists from the network through the ring into
//! simulation ticks and back out as render commands.

use proptest::prelude::*;
use rampart_core::{PlayerId, TickId, UnitId};
use rampart_engine::wire::{Message, WireError};
use rampart_engine::{
    DrawSquare, Game, GameConfig, GameError, GameState, MessageKind, TickPolicy, UpdateInput,
};
use rampart_queue::QueueError;
use rampart_sim::{state_hash, SimulationError};
use rampart_test_utils::{
    drain_draw_squares, memory_for, order, push_message, push_order_list, push_raw_message,
    push_start, PlatformQueues, Queues,
};

const T0: u64 = 2_000_000;
const TICK: u64 = 100_000;

fn start_match(game: &mut Game<'_>, q: &mut Queues<'_>) {
    push_start(&mut q.events, 2, 0);
    q.update(game, UpdateInput::at(T0)).unwrap();
    q.reset();
}

fn first_square(q: &mut Queues<'_>) -> DrawSquare {
    drain_draw_squares(&mut q.render)[0]
}

// ── Happy path ───────────────────────────────────────────────────────

#[test]
fn order_list_is_ticked_and_interpolated() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    // Unit 0 spawns at (32, 32) and walks two cells left per tick.
    push_order_list(&mut q.events, &[order(0, 0, 1, 0, 32)]);
    let report = q.update(&mut game, UpdateInput::at(T0 + TICK / 2)).unwrap();
    assert!(report.ticks.is_empty());
    assert_eq!(game.pending_order_lists(), 1);
    q.reset();

    let report = q.update(&mut game, UpdateInput::at(T0 + TICK)).unwrap();
    assert_eq!(report.ticks.as_slice(), &[TickId(1)]);
    assert_eq!(game.pending_order_lists(), 0);
    assert_eq!(game.simulation().units()[0].position.x, 30);
    let square = first_square(&mut q);
    assert_eq!((square.x, square.y), (32, 32), "tick start renders pre-tick state");
    q.reset();

    q.update(&mut game, UpdateInput::at(T0 + TICK + TICK / 2))
        .unwrap();
    assert_eq!(first_square(&mut q).x, 31);
    q.reset();

    let report = q.update(&mut game, UpdateInput::at(T0 + 2 * TICK)).unwrap();
    assert!(report.ticks.is_empty());
    assert_eq!(first_square(&mut q).x, 30);

    let metrics = game.metrics();
    assert_eq!(metrics.ticks, 1);
    assert_eq!(metrics.order_lists_received, 1);
    assert_eq!(metrics.order_lists_drained, 1);
    assert_eq!(metrics.orders_applied, 1);
    assert_eq!(metrics.last_backlog, 0);
}

#[test]
fn one_tick_per_update_by_default() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    push_order_list(&mut q.events, &[]);
    push_order_list(&mut q.events, &[]);
    let report = q.update(&mut game, UpdateInput::at(T0 + 5 * TICK)).unwrap();

    assert_eq!(report.ticks.len(), 1);
    assert_eq!(game.pending_order_lists(), 1);
    assert_eq!(game.backlog().latest(), Some(1));
    assert_eq!(game.metrics().last_backlog, 1);
}

#[test]
fn catch_up_runs_up_to_max_ticks_per_update() {
    let config = GameConfig {
        max_ticks_per_update: 3,
        ..GameConfig::default()
    };
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    for _ in 0..5 {
        push_order_list(&mut q.events, &[]);
    }
    let now = T0 + 10 * TICK;
    let report = q.update(&mut game, UpdateInput::at(now)).unwrap();
    assert_eq!(report.ticks.as_slice(), &[TickId(1), TickId(2), TickId(3)]);
    assert_eq!(game.pending_order_lists(), 2);
    assert_eq!(game.next_tick_time(), T0 + 4 * TICK);
    assert_eq!(game.backlog().iter().collect::<Vec<_>>(), vec![4, 3, 2]);
    assert_eq!(game.metrics().backlog_max, 4);
    assert_eq!(game.metrics().backlog_mean, 3.0);
    q.reset();

    let report = q.update(&mut game, UpdateInput::at(now)).unwrap();
    assert_eq!(report.ticks.as_slice(), &[TickId(4), TickId(5)]);
    assert_eq!(game.pending_order_lists(), 0);
    assert_eq!(game.next_tick_time(), T0 + 6 * TICK);
}

#[test]
fn catch_up_renders_from_the_last_tick_only() {
    let config = GameConfig {
        max_ticks_per_update: 2,
        ..GameConfig::default()
    };
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    // Unit 0 walks left from x = 32: 30 after tick 1, 28 after tick 2.
    push_order_list(&mut q.events, &[order(0, 0, 1, 0, 32)]);
    push_order_list(&mut q.events, &[]);
    let report = q.update(&mut game, UpdateInput::at(T0 + 2 * TICK)).unwrap();
    assert_eq!(report.ticks.as_slice(), &[TickId(1), TickId(2)]);
    assert_eq!(game.tick_fraction(T0 + 2 * TICK), 0.0);
    assert_eq!(game.simulation().units()[0].position.x, 28);
    assert_eq!(game.interpolation().previous()[0].x, 30);
    assert_eq!(
        first_square(&mut q).x,
        30,
        "fraction 0 renders the state before the last tick"
    );
    q.reset();

    q.update(&mut game, UpdateInput::at(T0 + 2 * TICK + TICK / 2))
        .unwrap();
    assert_eq!(first_square(&mut q).x, 29);
    q.reset();

    let report = q.update(&mut game, UpdateInput::at(T0 + 3 * TICK)).unwrap();
    assert!(report.ticks.is_empty());
    assert_eq!(first_square(&mut q).x, 28, "fraction 1 renders the last tick");
}

#[test]
fn fixed_rate_consumes_pending_lists_first() {
    let config = GameConfig {
        tick_policy: TickPolicy::FixedRate,
        max_ticks_per_update: 4,
        ..GameConfig::default()
    };
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    push_order_list(&mut q.events, &[order(1, 4, 4, 0, 0)]);
    let report = q.update(&mut game, UpdateInput::at(T0 + 3 * TICK)).unwrap();

    assert_eq!(report.ticks.len(), 3);
    assert_eq!(game.metrics().order_lists_drained, 1);
    assert_eq!(game.metrics().orders_applied, 4);
    assert_eq!(game.simulation().units()[4].target.x, 0);
}

#[test]
fn lockstep_clients_agree() {
    let config = GameConfig::default();
    let mut memory_a = memory_for(&config);
    let mut memory_b = memory_for(&config);
    let mut a = Game::init(config.clone(), &mut memory_a).unwrap();
    let mut b = Game::init(config, &mut memory_b).unwrap();
    let mut platform_a = PlatformQueues::default();
    let mut platform_b = PlatformQueues::default();
    let mut qa = platform_a.queues();
    let mut qb = platform_b.queues();
    start_match(&mut a, &mut qa);
    start_match(&mut b, &mut qb);

    for turn in 0..20u16 {
        let player = (turn % 2) as u8;
        let orders = [order(player, player as u16 * 4, 4, turn * 37 % 500, turn * 53 % 500)];
        push_order_list(&mut qa.events, &orders);
        push_order_list(&mut qb.events, &orders);
        let now = T0 + (turn as u64 + 1) * TICK;
        qa.update(&mut a, UpdateInput::at(now)).unwrap();
        qb.update(&mut b, UpdateInput::at(now)).unwrap();
        assert_eq!(state_hash(a.simulation()), state_hash(b.simulation()));
        qa.reset();
        qb.reset();
    }
    assert_eq!(a.simulation().tick_id(), TickId(20));
    assert_eq!(a.simulation(), b.simulation());
}

// ── Rejected input ───────────────────────────────────────────────────

#[test]
fn order_list_before_start_is_unexpected() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    push_order_list(&mut q.events, &[]);
    assert_eq!(
        q.update(&mut game, UpdateInput::at(0)),
        Err(GameError::UnexpectedMessage {
            kind: MessageKind::OrderList,
            state: GameState::WaitingForStart,
        })
    );
}

#[test]
fn second_start_is_unexpected() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    push_start(&mut q.events, 3, 0);
    assert_eq!(
        q.update(&mut game, UpdateInput::at(T0)),
        Err(GameError::UnexpectedMessage {
            kind: MessageKind::Start,
            state: GameState::Running,
        })
    );
    assert_eq!(game.simulation().player_count(), 2);
}

#[test]
fn reply_is_unsupported() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    push_message(&mut q.events, &Message::Reply);
    assert_eq!(
        q.update(&mut game, UpdateInput::at(0)),
        Err(GameError::UnsupportedMessage {
            kind: MessageKind::Reply
        })
    );
}

#[test]
fn bad_start_parameters_are_rejected() {
    for (players, local) in [(0, 0), (9, 0), (2, 2)] {
        let config = GameConfig::default();
        let mut memory = memory_for(&config);
        let mut game = Game::init(config, &mut memory).unwrap();
        let mut platform = PlatformQueues::default();
        let mut q = platform.queues();

        push_start(&mut q.events, players, local);
        assert_eq!(
            q.update(&mut game, UpdateInput::at(0)),
            Err(GameError::InvalidStart {
                player_count: players,
                local_player_index: local,
            })
        );
        assert_eq!(game.state(), GameState::WaitingForStart);
        assert_eq!(q.output_bytes(), 0);
    }
}

#[test]
fn unknown_event_tag_fails() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();

    q.events.write(9, &[]).unwrap();
    assert_eq!(
        q.update(&mut game, UpdateInput::at(0)),
        Err(GameError::Wire(WireError::UnknownTag {
            stream: "network event",
            tag: 9,
        }))
    );
}

#[test]
fn malformed_order_list_fails() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    // Declares one order, carries none.
    push_raw_message(&mut q.events, &[MessageKind::OrderList.tag(), 1, 0]);
    assert_eq!(
        q.update(&mut game, UpdateInput::at(T0)),
        Err(GameError::Wire(WireError::LengthMismatch {
            expected: 12,
            actual: 2,
        }))
    );
    assert_eq!(game.pending_order_lists(), 0);
}

#[test]
fn oversized_order_list_fails() {
    let config = GameConfig {
        order_slot_bytes: 32,
        ..GameConfig::default()
    };
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    push_order_list(&mut q.events, &[order(0, 0, 1, 0, 0); 4]);
    assert_eq!(
        q.update(&mut game, UpdateInput::at(T0)),
        Err(GameError::Wire(WireError::TooManyOrders { count: 4, limit: 3 }))
    );
}

#[test]
fn full_ring_is_backpressure() {
    let config = GameConfig {
        order_ring_slots: 2,
        ..GameConfig::default()
    };
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    for _ in 0..3 {
        push_order_list(&mut q.events, &[]);
    }
    assert_eq!(
        q.update(&mut game, UpdateInput::at(T0)),
        Err(GameError::Queue(QueueError::SlotsExhausted { slot_count: 2 }))
    );
    assert_eq!(game.pending_order_lists(), 2);
}

#[test]
fn foreign_unit_order_fails_the_tick() {
    let config = GameConfig::default();
    let mut memory = memory_for(&config);
    let mut game = Game::init(config, &mut memory).unwrap();
    let mut platform = PlatformQueues::default();
    let mut q = platform.queues();
    start_match(&mut game, &mut q);

    push_order_list(&mut q.events, &[order(0, 4, 1, 0, 0)]);
    assert_eq!(
        q.update(&mut game, UpdateInput::at(T0 + TICK)),
        Err(GameError::Simulation(SimulationError::NotOwned {
            unit: UnitId(4),
            player: PlayerId(0),
        }))
    );
    assert_eq!(game.simulation().tick_id(), TickId(0));
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ticks_are_consecutive_and_bounded(
        max_ticks in 1u32..4,
        frames in prop::collection::vec((0usize..3, 0u64..250_000), 1..30),
    ) {
        let config = GameConfig {
            max_ticks_per_update: max_ticks,
            ..GameConfig::default()
        };
        let mut memory = memory_for(&config);
        let mut game = Game::init(config, &mut memory).unwrap();
        let mut platform = PlatformQueues::default();
        let mut q = platform.queues();
        start_match(&mut game, &mut q);

        let mut now = T0;
        let mut expected_tick = 1u64;
        let mut received = 0usize;
        for (lists, advance) in frames {
            for _ in 0..lists {
                push_order_list(&mut q.events, &[]);
            }
            received += lists;
            now += advance;
            let report = q.update(&mut game, UpdateInput::at(now)).unwrap();
            prop_assert!(report.ticks.len() <= max_ticks as usize);
            for tick in &report.ticks {
                prop_assert_eq!(*tick, TickId(expected_tick));
                expected_tick += 1;
            }
            let ticked = (expected_tick - 1) as usize;
            prop_assert_eq!(game.pending_order_lists(), received - ticked);
            q.reset();
        }
    }
}
