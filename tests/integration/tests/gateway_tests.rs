//! End-to-end gateway tests
//!
//! Each test spawns a real gateway on an ephemeral port and drives it with
//! WebSocket clients.

use anyhow::Result;
use integration_tests::{TestServer, WsClient};
use parley_common::{AppConfig, LimitsConfig};
use parley_core::ReactionKind;
use parley_gateway::protocol::{ClientCommand, ServerEvent};

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let server = TestServer::start().await?;

    let response = reqwest::get(format!("{}/health", server.base_url())).await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_join_updates_everyone() -> Result<()> {
    let server = TestServer::start().await?;

    let mut alice = WsClient::connect(&server).await?;
    alice
        .send(&ClientCommand::SetUsername("alice".into()))
        .await?;
    assert_eq!(
        alice.recv().await?,
        ServerEvent::UserListUpdate(vec!["alice".into()])
    );

    let mut bob = WsClient::connect(&server).await?;
    bob.send(&ClientCommand::SetUsername("bob".into())).await?;

    // Alice sees the join notice then the refreshed list; bob only the list
    assert_eq!(alice.recv().await?, ServerEvent::UserJoined("bob".into()));
    assert_eq!(
        alice.recv().await?,
        ServerEvent::UserListUpdate(vec!["alice".into(), "bob".into()])
    );
    assert_eq!(
        bob.recv().await?,
        ServerEvent::UserListUpdate(vec!["alice".into(), "bob".into()])
    );

    Ok(())
}

#[tokio::test]
async fn test_chat_message_reaches_all_clients() -> Result<()> {
    let server = TestServer::start().await?;
    let mut alice = WsClient::join(&server, "alice").await?;
    let mut bob = WsClient::join(&server, "bob").await?;

    alice.send(&ClientCommand::ChatMessage("hi".into())).await?;

    for client in [&mut alice, &mut bob] {
        match client.recv_named("newMessage").await? {
            ServerEvent::NewMessage(msg) => {
                assert_eq!(msg.author, "alice");
                assert!(msg.reactions.is_empty());
            }
            other => panic!("expected newMessage, got {other}"),
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_reaction_lifecycle_over_the_wire() -> Result<()> {
    let server = TestServer::start().await?;
    let mut alice = WsClient::join(&server, "alice").await?;
    let mut bob = WsClient::join(&server, "bob").await?;

    alice.send(&ClientCommand::ChatMessage("hi".into())).await?;
    let message_id = match alice.recv_named("newMessage").await? {
        ServerEvent::NewMessage(msg) => msg.id,
        other => panic!("expected newMessage, got {other}"),
    };
    bob.recv_named("newMessage").await?;

    let thumbs = "\u{1F44D}".to_string();
    bob.send(&ClientCommand::AddReaction {
        message_id,
        reaction: thumbs.clone(),
    })
    .await?;

    for client in [&mut alice, &mut bob] {
        match client.recv_named("reactionUpdate").await? {
            ServerEvent::ReactionUpdate {
                message_id: id,
                reactions,
            } => {
                assert_eq!(id, message_id);
                assert!(reactions.contains(ReactionKind::ThumbsUp, "bob"));
            }
            other => panic!("expected reactionUpdate, got {other}"),
        }
    }

    // A duplicate add changes nothing and emits nothing
    bob.send(&ClientCommand::AddReaction {
        message_id,
        reaction: thumbs.clone(),
    })
    .await?;
    alice.assert_silent().await?;

    bob.send(&ClientCommand::RemoveReaction {
        message_id,
        reaction: thumbs,
    })
    .await?;
    match alice.recv_named("reactionUpdate").await? {
        ServerEvent::ReactionUpdate { reactions, .. } => assert!(reactions.is_empty()),
        other => panic!("expected reactionUpdate, got {other}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_private_message_routing() -> Result<()> {
    let server = TestServer::start().await?;
    let mut alice = WsClient::join(&server, "alice").await?;
    let mut bob = WsClient::join(&server, "bob").await?;
    let mut carol = WsClient::join(&server, "carol").await?;

    alice
        .send(&ClientCommand::PrivateMessage {
            to: "bob".into(),
            text: "psst".into(),
        })
        .await?;

    for client in [&mut bob, &mut alice] {
        match client.recv_named("privateMessage").await? {
            ServerEvent::PrivateMessage(note) => {
                assert_eq!(note.from, "alice");
                assert_eq!(note.to, "bob");
                assert_eq!(note.text, "psst");
            }
            other => panic!("expected privateMessage, got {other}"),
        }
    }
    carol.assert_silent().await?;

    // Offline recipient: the sender still gets the echo, no one else hears
    alice
        .send(&ClientCommand::PrivateMessage {
            to: "dave".into(),
            text: "anyone there?".into(),
        })
        .await?;
    assert!(matches!(
        alice.recv_named("privateMessage").await?,
        ServerEvent::PrivateMessage(_)
    ));
    bob.assert_silent().await?;

    Ok(())
}

#[tokio::test]
async fn test_typing_snapshot_excludes_sender() -> Result<()> {
    let server = TestServer::start().await?;
    let mut alice = WsClient::join(&server, "alice").await?;
    let mut bob = WsClient::join(&server, "bob").await?;
    alice.recv_named("userListUpdate").await?;

    alice.send(&ClientCommand::Typing(true)).await?;
    assert_eq!(
        bob.recv_named("typingUpdate").await?,
        ServerEvent::TypingUpdate(vec!["alice".into()])
    );
    alice.assert_silent().await?;

    alice.send(&ClientCommand::Typing(false)).await?;
    assert_eq!(
        bob.recv_named("typingUpdate").await?,
        ServerEvent::TypingUpdate(vec![])
    );

    Ok(())
}

#[tokio::test]
async fn test_disconnect_broadcasts_departure() -> Result<()> {
    let server = TestServer::start().await?;
    let mut alice = WsClient::join(&server, "alice").await?;
    let bob = WsClient::join(&server, "bob").await?;
    alice.recv_named("userListUpdate").await?;

    bob.close().await?;

    assert_eq!(
        alice.recv_named("userLeft").await?,
        ServerEvent::UserLeft("bob".into())
    );
    assert_eq!(
        alice.recv_named("userListUpdate").await?,
        ServerEvent::UserListUpdate(vec!["alice".into()])
    );
    assert_eq!(
        alice.recv_named("typingUpdate").await?,
        ServerEvent::TypingUpdate(vec![])
    );

    Ok(())
}

#[tokio::test]
async fn test_unnamed_disconnect_is_silent() -> Result<()> {
    let server = TestServer::start().await?;
    let mut alice = WsClient::join(&server, "alice").await?;

    let ghost = WsClient::connect(&server).await?;
    ghost.close().await?;

    alice.assert_silent().await?;

    Ok(())
}

#[tokio::test]
async fn test_unauthenticated_command_gets_error() -> Result<()> {
    let server = TestServer::start().await?;
    let mut ghost = WsClient::connect(&server).await?;

    ghost.send(&ClientCommand::ChatMessage("hi".into())).await?;
    match ghost.recv_named("error").await? {
        ServerEvent::Error(response) => assert_eq!(response.code, "UNAUTHENTICATED"),
        other => panic!("expected error, got {other}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_oversized_file_rejected() -> Result<()> {
    let config = AppConfig {
        limits: LimitsConfig {
            max_payload_bytes: 16,
            ..LimitsConfig::default()
        },
        ..AppConfig::default()
    };
    let server = TestServer::start_with_config(config).await?;
    let mut alice = WsClient::join(&server, "alice").await?;
    let mut bob = WsClient::join(&server, "bob").await?;

    alice
        .send(&ClientCommand::FileMessage {
            data: "data:text/plain;base64,aGVsbG8gd29ybGQ=".into(),
            mime_type: "text/plain".into(),
            file_name: "hello.txt".into(),
        })
        .await?;

    match alice.recv_named("error").await? {
        ServerEvent::Error(response) => assert_eq!(response.code, "PAYLOAD_TOO_LARGE"),
        other => panic!("expected error, got {other}"),
    }
    bob.assert_silent().await?;

    Ok(())
}

#[tokio::test]
async fn test_malformed_frame_does_not_kill_session() -> Result<()> {
    let server = TestServer::start().await?;
    let mut alice = WsClient::join(&server, "alice").await?;
    let mut bob = WsClient::join(&server, "bob").await?;

    alice.send_raw("definitely not json").await?;
    alice.send_raw(r#"{"type":"shutdown","data":null}"#).await?;

    // The session survives and keeps working
    alice
        .send(&ClientCommand::ChatMessage("still here".into()))
        .await?;
    match bob.recv_named("newMessage").await? {
        ServerEvent::NewMessage(msg) => assert_eq!(msg.author, "alice"),
        other => panic!("expected newMessage, got {other}"),
    }

    Ok(())
}
