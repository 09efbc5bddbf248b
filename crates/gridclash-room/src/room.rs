//! Room actor: a single Tokio task that owns the match and both seats.
//!
//! Everything that touches the match arrives as a [`RoomCommand`] on one
//! queue, and each command is handled to completion (fan-out included)
//! before the next is read. That queue is the only synchronization the
//! match needs.

use gridclash_engine::Match;
use gridclash_protocol::{ClientMessage, GameState, ServerMessage, Side};
use tokio::sync::{mpsc, oneshot};

use crate::{RoomConfig, RoomError, RoomState};

/// Channel sender for delivering outbound messages to one connection.
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Seat a new connection.
    Connect {
        sender: ClientSender,
        reply: oneshot::Sender<Result<Side, RoomError>>,
    },

    /// Free a seat.
    Disconnect { side: Side },

    /// An intent from a seated connection.
    Intent { side: Side, msg: ClientMessage },

    /// Send an error to one seat, in queue order.
    Reject { side: Side, message: String },

    /// Request a summary of the room.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Stop the actor.
    Shutdown,
}

/// A snapshot of room metadata and the current board.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub state: RoomState,
    /// Seated sides with their display names, in seat order.
    pub occupants: Vec<(Side, Option<String>)>,
    pub game: GameState,
    pub game_over: bool,
}

/// Handle to the running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Asks for a seat. The seat assignment (`init` with `player`) is
    /// queued on `sender` before this returns.
    ///
    /// # Errors
    /// [`RoomError::RoomFull`] if both seats are taken.
    pub async fn connect(
        &self,
        sender: ClientSender,
    ) -> Result<Side, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Connect {
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Frees `side`'s seat.
    pub async fn disconnect(&self, side: Side) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { side })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Queues an intent from `side` (fire-and-forget). Results come back
    /// on the seat's [`ClientSender`].
    pub async fn send_intent(
        &self,
        side: Side,
        msg: ClientMessage,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Intent { side, msg })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Queues an `error` for `side` behind everything already queued, so
    /// it reaches the client after replies to its earlier intents.
    pub async fn reject(
        &self,
        side: Side,
        message: impl Into<String>,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Reject {
                side,
                message: message.into(),
            })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

struct Seat {
    sender: ClientSender,
    name: Option<String>,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    config: RoomConfig,
    /// Indexed by [`Side::index`].
    seats: [Option<Seat>; 2],
    game: Match,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(board_size = self.config.board_size, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Connect { sender, reply } => {
                    let result = self.handle_connect(sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Disconnect { side } => {
                    self.handle_disconnect(side);
                }
                RoomCommand::Intent { side, msg } => {
                    let kind = msg.kind();
                    if let Err(e) = self.handle_intent(side, msg) {
                        tracing::debug!(%side, intent = kind, error = ?e, "intent rejected");
                        self.send_to(side, ServerMessage::error(e.to_string()));
                    }
                }
                RoomCommand::Reject { side, message } => {
                    self.send_to(side, ServerMessage::error(message));
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!("room shutting down");
                    break;
                }
            }
        }

        tracing::info!("room actor stopped");
    }

    fn state(&self) -> RoomState {
        RoomState::from_occupants(self.seats.iter().flatten().count())
    }

    fn handle_connect(
        &mut self,
        sender: ClientSender,
    ) -> Result<Side, RoomError> {
        let side = Side::ALL
            .into_iter()
            .find(|side| self.seats[side.index()].is_none())
            .ok_or(RoomError::RoomFull)?;

        if self.state() == RoomState::Empty {
            self.game = Match::new(self.config.board_size);
        }

        self.seats[side.index()] = Some(Seat { sender, name: None });
        tracing::info!(%side, room_state = %self.state(), "player seated");

        self.send_to(side, ServerMessage::seat(side));
        Ok(side)
    }

    fn handle_disconnect(&mut self, side: Side) {
        if self.seats[side.index()].take().is_none() {
            tracing::debug!(%side, "disconnect for empty seat, ignoring");
            return;
        }

        let state = self.state();
        tracing::info!(%side, room_state = %state, "player left");

        if state == RoomState::Empty {
            self.game = Match::new(self.config.board_size);
            tracing::info!("room empty, match discarded");
        }
    }

    fn handle_intent(
        &mut self,
        side: Side,
        msg: ClientMessage,
    ) -> Result<(), RoomError> {
        if self.seats[side.index()].is_none() {
            tracing::warn!(%side, "intent from unseated side, ignoring");
            return Ok(());
        }

        match msg {
            ClientMessage::Join { player_name } => {
                tracing::info!(%side, %player_name, "player joined");
                if let Some(seat) = self.seats[side.index()].as_mut() {
                    seat.name = Some(player_name);
                }
                self.send_to(side, ServerMessage::snapshot(self.game.snapshot()));
            }

            ClientMessage::Start {
                player_a_characters,
                player_b_characters,
            } => {
                let roster_a = player_a_characters
                    .unwrap_or_else(|| self.config.default_roster.clone());
                let roster_b = player_b_characters
                    .unwrap_or_else(|| self.config.default_roster.clone());
                self.game = Match::initialize(
                    self.config.board_size,
                    roster_a.as_slice(),
                    roster_b.as_slice(),
                )?;
                tracing::info!(
                    %side,
                    units_a = roster_a.len(),
                    units_b = roster_b.len(),
                    "match started"
                );
                self.broadcast(ServerMessage::Update {
                    state: self.game.snapshot(),
                });
            }

            ClientMessage::Move {
                player,
                char_name,
                direction,
            } => {
                if let Some(claimed) = player.filter(|claimed| *claimed != side) {
                    return Err(RoomError::SideMismatch {
                        claimed,
                        actual: side,
                    });
                }

                let outcome =
                    self.game.apply_move(side, &char_name, &direction)?;
                tracing::debug!(
                    %side,
                    unit = %outcome.unit,
                    from = %outcome.from,
                    to = %outcome.to,
                    captured = ?outcome.captured,
                    "move applied"
                );

                self.broadcast(ServerMessage::Update {
                    state: self.game.snapshot(),
                });
                self.broadcast(ServerMessage::Move {
                    player: side,
                    char_name: outcome.unit,
                    direction: outcome.direction,
                });
                if let Some(winner) = outcome.winner.filter(|_| outcome.game_over) {
                    tracing::info!(%winner, "game over");
                    self.broadcast(ServerMessage::GameOver { winner });
                }
            }

            ClientMessage::NewGame => {
                let roster = self.config.default_roster.as_slice();
                self.game =
                    Match::initialize(self.config.board_size, roster, roster)?;
                tracing::info!(%side, "match reset");
                self.broadcast(ServerMessage::Update {
                    state: self.game.snapshot(),
                });
            }
        }

        Ok(())
    }

    /// Sends to every seated connection.
    fn broadcast(&self, msg: ServerMessage) {
        for seat in self.seats.iter().flatten() {
            let _ = seat.sender.send(msg.clone());
        }
    }

    /// Sends to one seat. Silently drops if the receiver is gone.
    fn send_to(&self, side: Side, msg: ServerMessage) {
        if let Some(seat) = &self.seats[side.index()] {
            let _ = seat.sender.send(msg);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            state: self.state(),
            occupants: Side::ALL
                .into_iter()
                .filter_map(|side| {
                    self.seats[side.index()]
                        .as_ref()
                        .map(|seat| (side, seat.name.clone()))
                })
                .collect(),
            game: self.game.snapshot(),
            game_over: self.game.winner().is_some(),
        }
    }
}

/// Spawns the room actor and returns a handle to it.
///
/// # Errors
/// [`RoomError::InvalidConfig`] if `config` fails validation.
pub fn spawn_room(config: RoomConfig) -> Result<RoomHandle, RoomError> {
    config.validate()?;
    let (tx, rx) = mpsc::channel(config.command_buffer);

    let actor = RoomActor {
        game: Match::new(config.board_size),
        config,
        seats: [None, None],
        receiver: rx,
    };

    tokio::spawn(actor.run());

    Ok(RoomHandle { sender: tx })
}
