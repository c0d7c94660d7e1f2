//! End-to-end runs of the bot over the loopback transport

use std::sync::Arc;

use cheevobot::domain::entities::Relationship;
use cheevobot::domain::traits::Store;
use cheevobot::infrastructure::adapters::loopback::{Call, LoopbackTransport};
use cheevobot::infrastructure::storage::{JsonStore, MemoryStore};
use cheevobot::plugins;
use cheevobot::{BotState, EResult, Event, ListName, SteamBot};
use tokio::sync::mpsc;

const ADMIN: &str = "76561197960287930";
const FRIEND: &str = "76561197962144253";
const ROOM: &str = "103582791429521412";

fn message(sender: &str, text: &str) -> Event {
    Event::message(sender, text, ROOM)
}

#[tokio::test]
async fn test_session_runs_commands_until_killed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cheevobot.json");
    std::fs::write(&path, format!(r#"{{"whitelist": [{}], "login": {{"user": "bot"}}}}"#, ADMIN)).unwrap();

    let transport = Arc::new(LoopbackTransport::new());
    let bot = SteamBot::new(transport.clone(), Arc::new(JsonStore::new(&path)), plugins::registry().unwrap());
    bot.start().await.unwrap();
    assert_eq!(bot.state(), BotState::Ready);
    let root = bot.config().cmd;

    let (tx, rx) = mpsc::channel(16);
    for event in [
        message(FRIEND, "good morning"),
        message(FRIEND, &format!("{} kill", root)),
        message(ADMIN, &format!("{} whitelist {}", root, FRIEND)),
        message(FRIEND, &format!("{} dice 2d6", root)),
        message(FRIEND, &format!("{} frobnicate", root)),
        message(ADMIN, &format!("{} mute {}", root, ROOM)),
        message(FRIEND, &format!("{} uptime", root)),
        message(ADMIN, &format!("{} kill", root)),
        Event::FriendRelationship {
            user_id: "1".to_string(),
            relationship: Relationship::RequestRecipient,
        },
    ] {
        tx.send(event).await.unwrap();
    }
    bot.run(rx).await;

    assert_eq!(bot.state(), BotState::Stopped);

    let replies: Vec<String> = transport.messages().into_iter().map(|(_, text)| text).collect();
    assert_eq!(replies.len(), 4, "{:?}", replies);
    assert_eq!(replies[0], "Permission denied");
    assert_eq!(replies[1], "Permissions updated");
    assert_eq!(replies[2].split(' ').count(), 2);
    assert_eq!(replies[3], "Unknown command: frobnicate");
    assert_eq!(transport.calls().last(), Some(&Call::LogOff));

    let reloaded = JsonStore::new(&path).load().await.unwrap();
    assert!(reloaded.whitelist.contains(&FRIEND.to_string()));
    assert!(reloaded.whitelist.contains(&ADMIN.to_string()));
    assert_eq!(reloaded.mute, vec![ROOM.to_string()]);
    assert_eq!(reloaded.login, serde_json::json!({"user": "bot"}));
}

#[tokio::test]
async fn test_run_returns_when_channel_closes() {
    let transport = Arc::new(LoopbackTransport::new());
    let bot = SteamBot::new(transport.clone(), Arc::new(MemoryStore::new()), plugins::registry().unwrap());
    bot.start().await.unwrap();

    let (tx, rx) = mpsc::channel(4);
    tx.send(Event::FriendRelationship {
        user_id: FRIEND.to_string(),
        relationship: Relationship::RequestRecipient,
    })
    .await
    .unwrap();
    tx.send(Event::LoggedOn { result: EResult::OK }).await.unwrap();
    drop(tx);

    bot.run(rx).await;

    assert_eq!(bot.state(), BotState::Ready);
    assert!(transport.calls().contains(&Call::AddFriend(FRIEND.to_string())));
}

#[tokio::test]
async fn test_rejected_permission_change_leaves_lists_alone() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(LoopbackTransport::new());
    let bot = SteamBot::new(transport.clone(), store.clone(), plugins::registry().unwrap());
    bot.start().await.unwrap();

    bot.handle_event(message(FRIEND, &format!("cheevo blacklist {}", ADMIN))).await;

    assert!(!bot.lists().blacklisted(ADMIN));
    assert_eq!(store.save_count(), 0);
    assert_eq!(
        transport.messages(),
        vec![(ROOM.to_string(), "Permission denied".to_string())]
    );
}

#[tokio::test]
async fn test_custom_root_keyword() {
    let mut contents = serde_json::Map::new();
    contents.insert("cmd".to_string(), serde_json::json!("!bot"));
    let store = Arc::new(MemoryStore::with_contents(contents));
    let transport = Arc::new(LoopbackTransport::new());
    let bot = SteamBot::new(transport.clone(), store, plugins::registry().unwrap());
    bot.start().await.unwrap();

    assert!(bot.exec("cheevo uptime", FRIEND, ROOM).await.is_none());
    let outcome = bot.exec("!bot uptime", FRIEND, ROOM).await.unwrap();
    assert!(!outcome.is_error());
    assert_eq!(transport.messages().len(), 1);

    bot.lists().add(ListName::Blacklist, FRIEND).await.unwrap();
    let outcome = bot.exec("!bot dice", FRIEND, ROOM).await.unwrap();
    assert!(outcome.is_error());
}
