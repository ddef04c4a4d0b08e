//! Per-connection handler: the bridge between socket events and the
//! action router.
//!
//! Each accepted socket gets one task running [`handle_connection`]. The
//! flow per connection:
//!
//!   1. Resolve the session id (reused from the URL or freshly minted).
//!   2. Register an outbound channel with the hub and spawn the pump
//!      that drains it into the socket.
//!   3. Greet with `serverStats`.
//!   4. Loop: decode client events, translate each into a router call.
//!      The enqueued closure mutates the room, computes the snapshot
//!      while still on the actor, encodes it, and hands the bytes to the
//!      hub — never blocking the actor on I/O.
//!   5. On disconnect, best-effort leave of whatever room the player was
//!      in, then tear the connection down.
//!
//! Events that cannot be routed (the player is in no room) answer with
//! `reset` so the client resynchronizes from the lobby.

use tokio::sync::mpsc;

use wordspy_protocol::{ClientEvent, Codec, JsonCodec, ServerEvent};
use wordspy_room::{ActionRouter, Room, RoomError};
use wordspy_transport::{Connection, Hub, WebSocketConnection};

use crate::session;
use crate::WordspyError;

pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    router: ActionRouter,
    hub: Hub,
    codec: JsonCodec,
) -> Result<(), WordspyError> {
    let session_id = session::resolve_session_id(conn.query());
    let conn_id = conn.id();
    tracing::info!(%conn_id, session_id, "client connected");

    // Outbound pump: everything the hub accepts for this session flows
    // through one channel, which keeps per-connection send order intact.
    let (outbound, mut outbox) = mpsc::unbounded_channel::<Vec<u8>>();
    hub.register(&session_id, outbound);
    let pump_conn = conn.clone();
    let pump = tokio::spawn(async move {
        while let Some(frame) = outbox.recv().await {
            if pump_conn.send(&frame).await.is_err() {
                break;
            }
        }
    });

    send_server_stats(&router, &hub, codec, &session_id);

    loop {
        match conn.recv().await {
            Ok(Some(data)) => match codec.decode::<ClientEvent>(&data) {
                Ok(event) => dispatch(&router, &hub, codec, &session_id, event),
                Err(e) => {
                    tracing::debug!(session_id, error = %e, "dropping undecodable frame");
                }
            },
            Ok(None) => {
                tracing::info!(session_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(session_id, error = %e, "connection error");
                break;
            }
        }
    }

    disconnect_cleanup(&router, &hub, codec, &session_id);
    hub.unregister(&session_id);
    // The hub held the only sender; unregistering ends the pump after it
    // flushes whatever was already queued.
    let _ = pump.await;
    Ok(())
}

/// Answers the connect-time `serverStats` question: live counts, the
/// session id in force, and — for a returning player — their room's
/// current state.
fn send_server_stats(router: &ActionRouter, hub: &Hub, codec: JsonCodec, session_id: &str) {
    let hub = hub.clone();
    router.check_player(
        session_id,
        Box::new(move |players, rooms, session_id, exists, game_state| {
            let event = ServerEvent::ServerStats {
                players,
                rooms,
                session_id: session_id.clone(),
                is_existing_player: exists,
                game_state,
            };
            send_event(&hub, codec, &session_id, &event);
        }),
    );
}

/// Translates one client event into router calls.
fn dispatch(
    router: &ActionRouter,
    hub: &Hub,
    codec: JsonCodec,
    session_id: &str,
    event: ClientEvent,
) {
    match event {
        ClientEvent::CreateRoom {
            room,
            nickname,
            password,
        } => {
            let created = router.create_room(
                session_id,
                &nickname,
                &room,
                &password,
                |message, success| {
                    send_event(
                        hub,
                        codec,
                        session_id,
                        &ServerEvent::CreateResponse { message, success },
                    );
                },
            );
            if created {
                hub.join(&room, session_id);
                route_and_broadcast(router, hub, codec, session_id, |_, _| {});
            }
        }

        ClientEvent::JoinRoom {
            room,
            nickname,
            password,
        } => {
            if nickname.is_empty() {
                let message = RoomError::EmptyNickname.to_string();
                send_event(
                    hub,
                    codec,
                    session_id,
                    &ServerEvent::JoinResponse {
                        message,
                        success: false,
                    },
                );
                return;
            }
            if password.is_empty() {
                let message = RoomError::EmptyPassword.to_string();
                send_event(
                    hub,
                    codec,
                    session_id,
                    &ServerEvent::JoinResponse {
                        message,
                        success: false,
                    },
                );
                return;
            }

            let hub2 = hub.clone();
            let sid = session_id.to_string();
            let routed = router.join_room(
                session_id,
                &nickname,
                &room,
                &password,
                Box::new(move |joined| match joined {
                    None => {
                        send_event(
                            &hub2,
                            codec,
                            &sid,
                            &ServerEvent::JoinResponse {
                                message: RoomError::WrongPassword.to_string(),
                                success: false,
                            },
                        );
                    }
                    Some(room) => {
                        send_event(
                            &hub2,
                            codec,
                            &sid,
                            &ServerEvent::JoinResponse {
                                message: "joined the room".to_string(),
                                success: true,
                            },
                        );
                        hub2.join(room.name(), &sid);
                        broadcast_state(&hub2, codec, room, Some(&sid));
                    }
                }),
            );
            if !routed {
                send_event(
                    hub,
                    codec,
                    session_id,
                    &ServerEvent::JoinResponse {
                        message: RoomError::RoomNotFound(room).to_string(),
                        success: false,
                    },
                );
            }
        }

        ClientEvent::LeaveRoom => {
            let Some(room_name) = router.player_room_name(session_id) else {
                send_reset(hub, codec, session_id);
                return;
            };

            let hub2 = hub.clone();
            let sid = session_id.to_string();
            let group = room_name.clone();
            router.leave_room(
                session_id,
                Box::new(move |_room| {
                    send_event(
                        &hub2,
                        codec,
                        &sid,
                        &ServerEvent::LeaveResponse {
                            message: "left the room".to_string(),
                            success: true,
                        },
                    );
                    hub2.leave(&group, &sid);
                }),
            );

            // Queued behind the leave cleanup: whoever remains sees the
            // shrunken room. A now-empty room has nobody to tell.
            let hub3 = hub.clone();
            router.room_by_name(
                &room_name,
                Box::new(move |room| broadcast_state(&hub3, codec, room, None)),
            );
        }

        ClientEvent::NewGame => {
            route_and_broadcast(router, hub, codec, session_id, |room, _| {
                room.new_game();
            });
        }

        ClientEvent::RandomizeTeams => {
            route_and_broadcast(router, hub, codec, session_id, |room, sid| {
                room.randomize_teams(sid);
            });
        }

        ClientEvent::EndTurn => {
            route_and_broadcast(router, hub, codec, session_id, |room, sid| {
                room.end_turn(sid);
            });
        }

        ClientEvent::JoinTeam { team } => {
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.change_team(sid, team);
            });
        }

        ClientEvent::SwitchRole { role } => {
            let hub2 = hub.clone();
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                let applied = room.switch_role(sid, role);
                let response = match applied {
                    Some(role) => ServerEvent::SwitchRoleResponse {
                        message: role.to_string(),
                        success: true,
                        role: Some(role),
                    },
                    None => ServerEvent::SwitchRoleResponse {
                        message: "player not a member of the room".to_string(),
                        success: false,
                        role: None,
                    },
                };
                send_event(&hub2, codec, sid, &response);
            });
        }

        ClientEvent::SwitchDifficulty { difficulty } => {
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.change_difficulty(sid, difficulty);
            });
        }

        ClientEvent::SwitchMode {
            room: _,
            mode,
            timer_amount,
        } => {
            let minutes = parse_minutes(timer_amount.as_deref());
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.switch_mode(sid, mode, minutes);
            });
        }

        ClientEvent::SwitchConsensus { room: _, consensus } => {
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.switch_consensus(sid, consensus);
            });
        }

        ClientEvent::ClickTile { i, j } => {
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.select_tile(sid, i, j);
            });
        }

        ClientEvent::DeclareClue { word, count } => {
            let count = count.trim().parse::<u32>().unwrap_or(1);
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.declare_clue(sid, &word, count);
            });
        }

        ClientEvent::ChangeCards { pack } => {
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.change_cards(sid, &pack);
            });
        }

        ClientEvent::TimerSlider { value } => {
            let minutes = parse_minutes(Some(&value));
            route_and_broadcast(router, hub, codec, session_id, move |room, sid| {
                room.change_timer(sid, minutes);
            });
        }
    }
}

/// Routes a mutation to the caller's room and broadcasts the resulting
/// snapshot to everyone in it. Falls back to `reset` when the caller is
/// in no room.
fn route_and_broadcast(
    router: &ActionRouter,
    hub: &Hub,
    codec: JsonCodec,
    session_id: &str,
    mutate: impl FnOnce(&mut Room, &str) + Send + 'static,
) {
    let hub2 = hub.clone();
    let sid = session_id.to_string();
    let routed = router.room_for_player(
        session_id,
        Box::new(move |room| {
            mutate(room, &sid);
            broadcast_state(&hub2, codec, room, Some(&sid));
        }),
    );
    if !routed {
        send_reset(hub, codec, session_id);
    }
}

/// Computes the snapshot (scoped to `scope` when given) and hands the
/// encoded frame to the hub. Runs on the room's actor; must not block.
fn broadcast_state(hub: &Hub, codec: JsonCodec, room: &Room, scope: Option<&str>) {
    let state = match scope {
        Some(player_id) => room.player_game_state(player_id),
        None => room.game_state(),
    };
    match codec.encode(&ServerEvent::GameState(state)) {
        Ok(frame) => hub.broadcast(room.name(), &frame),
        Err(e) => tracing::error!(room = %room.name(), error = %e, "failed to encode snapshot"),
    }
}

/// Best-effort leave when a socket goes away.
fn disconnect_cleanup(router: &ActionRouter, hub: &Hub, codec: JsonCodec, session_id: &str) {
    let Some(room_name) = router.player_room_name(session_id) else {
        return;
    };
    hub.leave(&room_name, session_id);
    router.leave_room(session_id, Box::new(|_| {}));
    let hub2 = hub.clone();
    router.room_by_name(
        &room_name,
        Box::new(move |room| broadcast_state(&hub2, codec, room, None)),
    );
    tracing::info!(session_id, room = %room_name, "player left on disconnect");
}

fn send_event(hub: &Hub, codec: JsonCodec, session_id: &str, event: &ServerEvent) {
    match codec.encode(event) {
        Ok(frame) => hub.send_to(session_id, frame),
        Err(e) => tracing::error!(session_id, error = %e, "failed to encode event"),
    }
}

fn send_reset(hub: &Hub, codec: JsonCodec, session_id: &str) {
    send_event(hub, codec, session_id, &ServerEvent::Reset);
}

/// Minutes as typed by the client; anything unparsable or unreasonable
/// falls back to five minutes.
fn parse_minutes(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(5.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordspy_protocol::Role;

    #[test]
    fn test_parse_minutes_falls_back_to_five() {
        assert_eq!(parse_minutes(Some("3")), 3.0);
        assert_eq!(parse_minutes(Some("2.5")), 2.5);
        assert_eq!(parse_minutes(Some(" 4 ")), 4.0);
        assert_eq!(parse_minutes(Some("soon")), 5.0);
        assert_eq!(parse_minutes(Some("-1")), 5.0);
        assert_eq!(parse_minutes(Some("inf")), 5.0);
        assert_eq!(parse_minutes(None), 5.0);
    }

    #[test]
    fn test_switch_role_response_shapes() {
        // The response mirrors the applied role on success.
        let ok = ServerEvent::SwitchRoleResponse {
            message: Role::Spymaster.to_string(),
            success: true,
            role: Some(Role::Spymaster),
        };
        let json: serde_json::Value = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["data"]["message"], "spymaster");
        assert_eq!(json["data"]["role"], "spymaster");
    }
}
