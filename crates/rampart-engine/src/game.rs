//! The client game loop.
//!
//! [`Game`] is driven by the platform layer once per frame. Each
//! [`update`](Game::update) drains the network events written since the
//! last call, runs the simulation ticks that are due, and writes one
//! render command per unit.
//!
//! # Lifecycle
//!
//! ```text
//! WaitingForStart ──start──▶ Running ──terminate / connection lost──▶ Terminating
//!        └───────────────terminate / connection lost──────────────────────┘
//! ```
//!
//! # Memory
//!
//! The simulation's units, the interpolation's positions, and every queue
//! and scratch buffer the loop needs are carved from the caller's memory
//! block in [`Game::init`]; `update` never allocates. The
//! three append queues belong to the caller, who resets them between
//! frames once their contents have been consumed.

use std::fmt;

use rampart_arena::{Arena, ArenaError};
use rampart_core::{Coord, Micros, PlayerId, TickId, PLAYER_MAX};
use rampart_queue::{AppendQueue, QueueError, SampleWindow, SlotRing};
use rampart_sim::{
    Interpolation, InterpolationError, Order, Simulation, SimulationError, Unit,
};
use smallvec::SmallVec;
use thiserror::Error;

use crate::config::{ConfigError, GameConfig, TickPolicy};
use crate::metrics::GameMetrics;
use crate::wire::{
    self, DrawSquare, Message, MessageKind, NetCommandKind, NetEventKind, RenderCommandKind,
    StartMessage, WireError,
};

// ── Palette ────────────────────────────────────────────────────────

/// Unit colors by owning player, `0xAARRGGBB`.
pub const PLAYER_COLORS: [u32; PLAYER_MAX] = [
    0xFFE6194B, 0xFF3CB44B, 0xFF4363D8, 0xFFFFE119, 0xFFF58231, 0xFF911EB4, 0xFF42D4F4,
    0xFFF032E6,
];

/// Color for a unit with no valid owner.
pub const UNOWNED_COLOR: u32 = 0xFF808080;

/// Render color of `player`'s units.
pub fn player_color(player: PlayerId) -> u32 {
    PLAYER_COLORS
        .get(player.index())
        .copied()
        .unwrap_or(UNOWNED_COLOR)
}

// ── GameState ──────────────────────────────────────────────────────

/// Game loop lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Connected or connecting; no match yet.
    WaitingForStart,
    /// A match is being simulated.
    Running,
    /// Shut down. Every further `update` returns `running = false`.
    Terminating,
}

// ── GameError ──────────────────────────────────────────────────────

/// Fatal errors from [`Game::init`] and [`Game::update`].
///
/// None of these are recovered locally; the platform is expected to stop
/// the game.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// The configuration is invalid.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    /// The memory block is too small for the configuration.
    #[error("arena: {0}")]
    Arena(#[from] ArenaError),
    /// A queue ran out of capacity.
    #[error("queue: {0}")]
    Queue(#[from] QueueError),
    /// A frame or message was malformed.
    #[error("wire: {0}")]
    Wire(#[from] WireError),
    /// The simulation rejected an operation.
    #[error("simulation: {0}")]
    Simulation(#[from] SimulationError),
    /// Interpolation lost track of the unit set.
    #[error("interpolation: {0}")]
    Interpolation(#[from] InterpolationError),
    /// A well-formed message the client has no use for.
    #[error("unsupported {kind:?} message")]
    UnsupportedMessage {
        /// The message kind.
        kind: MessageKind,
    },
    /// A message that is only valid in another state.
    #[error("{kind:?} message is not valid in state {state:?}")]
    UnexpectedMessage {
        /// The message kind.
        kind: MessageKind,
        /// State the game was in.
        state: GameState,
    },
    /// A start message with no players, too many players, or a local
    /// index outside the match.
    #[error("invalid start: {player_count} players, local index {local_player_index}")]
    InvalidStart {
        /// Declared player count.
        player_count: u8,
        /// Declared local player index.
        local_player_index: u8,
    },
}

// ── Update input and report ────────────────────────────────────────

/// Pointer state sampled by the platform. Only logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Pointer column in window coordinates.
    pub mouse_x: i32,
    /// Pointer row in window coordinates.
    pub mouse_y: i32,
    /// Pressed buttons, one bit per button.
    pub buttons: u8,
}

/// Per-call input to [`Game::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateInput {
    /// Current time in microseconds, from the platform clock.
    pub time: Micros,
    /// Shut down at the end of this call.
    pub termination_requested: bool,
    /// Pointer state.
    pub input: InputState,
}

impl UpdateInput {
    /// Input at `time` with no termination request and idle pointer.
    pub fn at(time: Micros) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }
}

/// Outcome of one [`Game::update`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Whether the platform should keep calling `update`.
    pub running: bool,
    /// Ticks executed during this call, in order.
    pub ticks: SmallVec<[TickId; 4]>,
    /// Network event frames consumed.
    pub events: usize,
    /// Render command frames written.
    pub render_commands: usize,
}

// ── Game ───────────────────────────────────────────────────────────

/// The client runtime: simulation, interpolation and the order ring,
/// over memory borrowed from the caller.
pub struct Game<'m> {
    config: GameConfig,
    state: GameState,
    sim: Simulation<'m>,
    interpolation: Interpolation<'m>,
    local_player: PlayerId,
    next_tick_time: Micros,
    order_ring: SlotRing<'m>,
    backlog: SampleWindow<'m>,
    /// Receives one ring slot before decoding.
    slot_buffer: &'m mut [u8],
    /// Decoded orders of the tick being run.
    order_scratch: &'m mut [Order],
    /// Outgoing message encoding.
    command_buffer: &'m mut [u8],
    metrics: GameMetrics,
    memory_used: usize,
}

impl<'m> Game<'m> {
    /// Validate `config` and carve every buffer from `memory`.
    ///
    /// `memory` must be at least
    /// [`config.required_memory()`](GameConfig::required_memory) bytes.
    pub fn init(config: GameConfig, memory: &'m mut [u8]) -> Result<Self, GameError> {
        config.validate()?;
        let mut arena = Arena::new(memory);

        let units = arena.allocate_slice::<Unit>(config.unit_capacity())?;
        let positions = arena.allocate_slice::<Coord>(3 * config.unit_capacity())?;
        let slots = config.order_ring_slots;
        let ring_storage = arena.allocate(slots.saturating_mul(config.order_slot_bytes))?;
        let offsets = arena.allocate_slice::<usize>(slots)?;
        let sizes = arena.allocate_slice::<usize>(slots)?;
        let slot_buffer = arena.allocate(config.order_slot_bytes)?;
        let order_scratch = arena.allocate_slice::<Order>(config.max_orders_per_tick())?;
        let samples = arena.allocate_slice::<u64>(config.sample_window_len())?;
        let command_buffer = arena.allocate(config.command_buffer_bytes)?;

        tracing::info!(
            memory_used = arena.used(),
            memory_capacity = arena.capacity(),
            tick_policy = ?config.tick_policy,
            "game initialized"
        );

        Ok(Self {
            sim: Simulation::new(config.units_per_player, units),
            interpolation: Interpolation::new(positions),
            state: GameState::WaitingForStart,
            local_player: PlayerId::UNDEFINED,
            next_tick_time: 0,
            order_ring: SlotRing::new(ring_storage, offsets, sizes),
            backlog: SampleWindow::new(samples),
            slot_buffer,
            order_scratch,
            command_buffer,
            metrics: GameMetrics::default(),
            memory_used: arena.used(),
            config,
        })
    }

    /// Run one pass of the game loop.
    ///
    /// 1. Drain `net_events`, handling each frame in order. A lost or
    ///    failed connection ends the call at once, with nothing further
    ///    written.
    /// 2. While a tick is due, run it (subject to the
    ///    [`TickPolicy`] and `max_ticks_per_update`).
    /// 3. Interpolate and write one `DrawSquare` per unit to
    ///    `render_commands`.
    /// 4. If termination was requested, write `Shutdown` to
    ///    `net_commands` and stop.
    pub fn update(
        &mut self,
        input: UpdateInput,
        net_events: &mut AppendQueue<'_>,
        net_commands: &mut AppendQueue<'_>,
        render_commands: &mut AppendQueue<'_>,
    ) -> Result<UpdateReport, GameError> {
        let mut report = UpdateReport {
            running: self.is_running(),
            ..UpdateReport::default()
        };
        if self.state == GameState::Terminating {
            return Ok(report);
        }

        let now = input.time;
        tracing::trace!(
            time = now,
            mouse_x = input.input.mouse_x,
            mouse_y = input.input.mouse_y,
            buttons = input.input.buttons,
            "update"
        );

        while let Some(frame) = net_events.read() {
            report.events += 1;
            self.metrics.events_processed += 1;
            let kind = NetEventKind::try_from(frame.tag)?;
            tracing::trace!(event = ?kind, len = frame.len(), "network event");
            match kind {
                NetEventKind::ConnectionEstablished => {
                    tracing::info!("connection established");
                }
                NetEventKind::ConnectionLost | NetEventKind::ConnectionFailed => {
                    tracing::warn!(event = ?kind, "connection closed, stopping");
                    self.state = GameState::Terminating;
                    report.running = false;
                    return Ok(report);
                }
                NetEventKind::Message => {
                    self.handle_message(frame.payload, now, net_commands)?;
                }
            }
        }

        if self.state == GameState::Running {
            self.run_due_ticks(now, &mut report)?;
            self.render(now, render_commands, &mut report)?;
        }

        if input.termination_requested {
            net_commands.write(NetCommandKind::Shutdown.tag(), &[])?;
            self.state = GameState::Terminating;
            report.running = false;
            tracing::info!(ticks = self.metrics.ticks, "termination requested, shutting down");
        }
        Ok(report)
    }

    fn handle_message(
        &mut self,
        bytes: &[u8],
        now: Micros,
        net_commands: &mut AppendQueue<'_>,
    ) -> Result<(), GameError> {
        let message = wire::decode_message(bytes)?;
        let kind = message.kind();
        match (message, self.state) {
            (Message::Start(start), GameState::WaitingForStart) => {
                self.start_match(start, now, net_commands)
            }
            (Message::OrderList(body), GameState::Running) => self.queue_order_list(body),
            (Message::Reply, _) => Err(GameError::UnsupportedMessage { kind }),
            (_, state) => Err(GameError::UnexpectedMessage { kind, state }),
        }
    }

    fn start_match(
        &mut self,
        start: StartMessage,
        now: Micros,
        net_commands: &mut AppendQueue<'_>,
    ) -> Result<(), GameError> {
        let StartMessage {
            player_count,
            local_player_index,
        } = start;
        if player_count == 0
            || player_count as usize > PLAYER_MAX
            || local_player_index >= player_count
        {
            return Err(GameError::InvalidStart {
                player_count,
                local_player_index,
            });
        }

        self.sim.init();
        let mut local = PlayerId::UNDEFINED;
        for _ in 0..player_count {
            let id = self.sim.create_player()?;
            if !local.is_defined() {
                local = id;
            }
        }
        self.local_player = local;
        self.interpolation.init(&self.sim)?;
        self.next_tick_time = now.saturating_add(self.config.tick_duration_us);

        let len = wire::encode_message(&Message::Reply, &mut self.command_buffer[..])?;
        net_commands.write(NetCommandKind::Send.tag(), &self.command_buffer[..len])?;
        self.state = GameState::Running;

        tracing::info!(
            players = player_count,
            local_player = %local,
            units = self.sim.unit_count(),
            next_tick_time = self.next_tick_time,
            "match started"
        );
        Ok(())
    }

    fn queue_order_list(&mut self, body: &[u8]) -> Result<(), GameError> {
        let orders = wire::order_list_len(body, self.order_scratch.len())?;
        self.order_ring.write(body)?;
        self.metrics.order_lists_received += 1;
        tracing::trace!(
            orders,
            pending = self.order_ring.pending_count(),
            "order list queued"
        );
        Ok(())
    }

    fn run_due_ticks(&mut self, now: Micros, report: &mut UpdateReport) -> Result<(), GameError> {
        let mut ran = 0;
        while now >= self.next_tick_time && ran < self.config.max_ticks_per_update {
            let order_count = if self.order_ring.is_empty() {
                match self.config.tick_policy {
                    TickPolicy::AwaitOrders => {
                        tracing::trace!(
                            next_tick_time = self.next_tick_time,
                            "tick due, awaiting orders"
                        );
                        break;
                    }
                    TickPolicy::FixedRate => 0,
                }
            } else {
                let len = self
                    .order_ring
                    .read(&mut self.slot_buffer[..])?
                    .unwrap_or(0);
                self.metrics.order_lists_drained += 1;
                wire::decode_order_list(&self.slot_buffer[..len], &mut self.order_scratch[..])?
                    .len()
            };

            let tick = self.sim.tick(&self.order_scratch[..order_count])?;
            self.interpolation.observe(&self.sim)?;
            self.next_tick_time = self
                .next_tick_time
                .saturating_add(self.config.tick_duration_us);

            let backlog = self.order_ring.pending_count() as u64;
            self.backlog.push(backlog);
            self.metrics.ticks += 1;
            self.metrics.orders_applied += order_count as u64;
            self.metrics.last_backlog = backlog;
            self.metrics.backlog_max = self.backlog.max().unwrap_or(0);
            self.metrics.backlog_mean = self.backlog.mean().unwrap_or(0.0);

            tracing::debug!(tick = %tick, orders = order_count, backlog, "tick");
            report.ticks.push(tick);
            ran += 1;
        }
        Ok(())
    }

    fn render(
        &mut self,
        now: Micros,
        render_commands: &mut AppendQueue<'_>,
        report: &mut UpdateReport,
    ) -> Result<(), GameError> {
        let fraction = self.tick_fraction(now);
        self.interpolation.update(&self.sim, fraction)?;
        for (unit, position) in self.sim.units().iter().zip(self.interpolation.positions()) {
            let square = DrawSquare {
                x: position.x,
                y: position.y,
                color: player_color(unit.player),
            };
            render_commands.write(
                RenderCommandKind::DrawSquare.tag(),
                bytemuck::bytes_of(&square),
            )?;
            report.render_commands += 1;
        }
        self.metrics.render_commands += report.render_commands as u64;
        Ok(())
    }

    /// Fraction of the current tick interval elapsed at `now`, unclamped.
    ///
    /// The current interval is `[next_tick_time - tick_duration,
    /// next_tick_time)`.
    pub fn tick_fraction(&self, now: Micros) -> f32 {
        let duration = self.config.tick_duration_us;
        let start = self.next_tick_time.saturating_sub(duration);
        (now.saturating_sub(start) as f64 / duration as f64) as f32
    }

    /// Lifecycle state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Whether the platform should keep calling `update`.
    pub fn is_running(&self) -> bool {
        self.state != GameState::Terminating
    }

    /// The configuration the game was built with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The simulation.
    pub fn simulation(&self) -> &Simulation<'m> {
        &self.sim
    }

    /// Render-time unit positions.
    pub fn interpolation(&self) -> &Interpolation<'m> {
        &self.interpolation
    }

    /// This client's player, or [`PlayerId::UNDEFINED`] before the match
    /// starts.
    pub fn local_player(&self) -> PlayerId {
        self.local_player
    }

    /// Time at which the next tick becomes due.
    pub fn next_tick_time(&self) -> Micros {
        self.next_tick_time
    }

    /// Order lists received but not yet ticked.
    pub fn pending_order_lists(&self) -> usize {
        self.order_ring.pending_count()
    }

    /// Backlog recorded at each recent tick.
    pub fn backlog(&self) -> &SampleWindow<'m> {
        &self.backlog
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    /// Bytes of the memory block in use.
    pub fn memory_used(&self) -> usize {
        self.memory_used
    }
}

impl fmt::Debug for Game<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("tick", &self.sim.tick_id())
            .field("local_player", &self.local_player)
            .field("next_tick_time", &self.next_tick_time)
            .field("pending_order_lists", &self.order_ring.pending_count())
            .field("memory_used", &self.memory_used)
            .finish()
    }
}
