//! Rampart headless client: drives a two-player match without a window.
//!
//! Demonstrates:
//!   1. Sizing a memory block from a GameConfig and initializing a Game
//!   2. Feeding network events (start, order lists) through an AppendQueue
//!   3. Running the game loop at 60 frames per second of simulated time
//!   4. Reading back network and render commands
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example headless

use rampart_core::{Coord, PlayerId, UnitId};
use rampart_engine::wire::{self, Message};
use rampart_engine::{
    DrawSquare, Game, GameConfig, NetCommandKind, NetEventKind, StartMessage, UpdateInput,
};
use rampart_queue::AppendQueue;
use rampart_sim::{state_hash, Order};
use tracing_subscriber::EnvFilter;

// ─── Timing ─────────────────────────────────────────────────────

const FRAME_US: u64 = 16_667;
const FRAMES: u64 = 180;
const QUEUE_BYTES: usize = 8 * 1024;

fn push_message(
    events: &mut AppendQueue<'_>,
    message: &Message<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let region = events.allocate(NetEventKind::Message.tag(), message.encoded_len())?;
    wire::encode_message(message, region)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GameConfig::default();
    let mut memory = vec![0u8; config.required_memory()?];
    let mut game = Game::init(config.clone(), &mut memory)?;

    let mut event_buf = vec![0u8; QUEUE_BYTES];
    let mut command_buf = vec![0u8; QUEUE_BYTES];
    let mut render_buf = vec![0u8; QUEUE_BYTES];
    let mut events = AppendQueue::new(&mut event_buf);
    let mut commands = AppendQueue::new(&mut command_buf);
    let mut render = AppendQueue::new(&mut render_buf);

    // The "server" starts the match on the first frame.
    events.write(NetEventKind::ConnectionEstablished.tag(), &[])?;
    push_message(
        &mut events,
        &Message::Start(StartMessage {
            player_count: 2,
            local_player_index: 0,
        }),
    )?;

    let mut body = vec![0u8; wire::order_list_encoded_len(2)];
    let mut next_turn = 0u64;
    let mut total_squares = 0usize;

    for frame in 0..FRAMES {
        let now = frame * FRAME_US;

        // One order list per tick interval: both players march their
        // formations toward the map centre, then back.
        if game.is_running() && now >= next_turn && frame > 0 {
            let turn = next_turn / config.tick_duration_us;
            let target = if turn < 8 {
                Coord::new(200, 100)
            } else {
                Coord::new(32, 32)
            };
            let orders = [
                Order::new(PlayerId(0), UnitId(0), 4, target),
                Order::new(PlayerId(1), UnitId(4), 4, target),
            ];
            let len = wire::encode_order_list(&orders, &mut body)?;
            push_message(&mut events, &Message::OrderList(&body[..len]))?;
            next_turn += config.tick_duration_us;
        }

        let report = game.update(
            UpdateInput {
                time: now,
                termination_requested: frame == FRAMES - 1,
                ..UpdateInput::default()
            },
            &mut events,
            &mut commands,
            &mut render,
        )?;

        while let Some(cmd) = commands.read() {
            match NetCommandKind::try_from(cmd.tag)? {
                NetCommandKind::Send => tracing::info!(bytes = cmd.len(), "send message"),
                NetCommandKind::Shutdown => tracing::info!("shutdown connection"),
            }
        }
        while let Some(cmd) = render.read() {
            let square: DrawSquare = wire::decode_pod(cmd.payload)?;
            if frame % 30 == 0 && total_squares % 8 == 0 {
                tracing::debug!(
                    x = square.x,
                    y = square.y,
                    color = format_args!("{:#010x}", square.color),
                    "draw"
                );
            }
            total_squares += 1;
        }

        events.reset();
        commands.reset();
        render.reset();

        if !report.running {
            break;
        }
    }

    let metrics = game.metrics();
    println!("ticks:            {}", metrics.ticks);
    println!("orders applied:   {}", metrics.orders_applied);
    println!("squares drawn:    {total_squares}");
    println!(
        "backlog max/mean: {}/{:.2}",
        metrics.backlog_max, metrics.backlog_mean
    );
    println!("state hash:       {:#018x}", state_hash(game.simulation()));
    Ok(())
}
