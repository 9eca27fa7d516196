mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::*;
use hockey_connect_messaging::models::{NewMessage, ParticipantRef};
use hockey_connect_messaging::repository::{InMemoryStore, MessagingRepository};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_messages_share_one_conversation() {
    let app = app();
    let player = create_player(&app, "Cas").await;
    let club = create_club(&app, "Oranje Rood").await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = app.clone();
        let player = player.clone();
        let club = club.clone();
        handles.push(tokio::spawn(async move {
            let (from, to) = if i % 2 == 0 {
                ((player.as_str(), "player"), (club.as_str(), "club"))
            } else {
                ((club.as_str(), "club"), (player.as_str(), "player"))
            };
            let res = send_message(&app, from, to, &format!("msg {i}")).await;
            assert_eq!(res.status, StatusCode::OK);
            res.body["conversation_id"].as_str().unwrap().to_string()
        }));
    }

    let mut ids = Vec::new();
    for h in handles {
        ids.push(h.await.unwrap());
    }
    ids.dedup();
    assert_eq!(ids.len(), 1, "all sends must land in one conversation");

    assert_eq!(conversations(&app, (player.as_str(), "player")).await.len(), 1);
    assert_eq!(conversations(&app, (club.as_str(), "club")).await.len(), 1);
    assert_eq!(unread(&app, (player.as_str(), "player")).await, 10);
    assert_eq!(unread(&app, (club.as_str(), "club")).await, 10);
}

#[tokio::test]
async fn messages_are_ascending_and_round_trip_byte_for_byte() {
    let app = app();
    let player = create_player(&app, "Daan").await;
    let club = create_club(&app, "Amsterdam HC").await;
    let a = (player.as_str(), "player");
    let b = (club.as_str(), "club");

    let contents = ["first", "  padded  ", "emoji \u{1F3D1}\u{FE0F}", "line\nbreak", "last"];
    let mut conversation_id = String::new();
    for (i, content) in contents.iter().enumerate() {
        let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
        let res = send_message(&app, from, to, content).await;
        assert_eq!(res.status, StatusCode::OK);
        conversation_id = res.body["conversation_id"].as_str().unwrap().to_string();
    }

    let res = get(
        &app,
        &format!("/api/conversations/{conversation_id}/messages?user_id={player}&user_type=player"),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let messages = res.body.as_array().unwrap();
    let got: Vec<&str> = messages.iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(got, contents);

    let stamps: Vec<DateTime<Utc>> = messages
        .iter()
        .map(|m| m["created_at"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] < w[1]), "created_at must strictly increase");

    // Page 1 holds the newest two, page 2 the two before them.
    let page = |n: u32| {
        format!(
            "/api/conversations/{conversation_id}/messages?user_id={player}&user_type=player&page={n}&page_size=2"
        )
    };
    let res = get(&app, &page(1)).await;
    let got: Vec<&str> = res.body.as_array().unwrap().iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(got, ["line\nbreak", "last"]);
    let res = get(&app, &page(3)).await;
    let got: Vec<&str> = res.body.as_array().unwrap().iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(got, ["first"]);

    let res = get(
        &app,
        &format!("/api/conversations/{conversation_id}/messages?user_id={player}&user_type=player&page=0"),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mark_read_only_affects_the_reader() {
    let app = app();
    let player = create_player(&app, "Eva").await;
    let club = create_club(&app, "SCHC").await;
    let a = (player.as_str(), "player");
    let b = (club.as_str(), "club");

    let mut conversation_id = String::new();
    for i in 0..3 {
        let res = send_message(&app, a, b, &format!("ping {i}")).await;
        conversation_id = res.body["conversation_id"].as_str().unwrap().to_string();
    }
    send_message(&app, b, a, "pong").await;
    assert_eq!(unread(&app, b).await, 3);
    assert_eq!(unread(&app, a).await, 1);

    let res = put(
        &app,
        &format!("/api/conversations/{conversation_id}/mark-read?user_id={club}&user_type=club"),
    )
    .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(unread(&app, b).await, 0);
    assert_eq!(unread(&app, a).await, 1);

    // Nothing to mark on a conversation that does not exist.
    let res = put(
        &app,
        &format!("/api/conversations/{}/mark-read?user_id={club}&user_type=club", Uuid::new_v4()),
    )
    .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn message_sent_after_the_snapshot_stays_unread() {
    let store = Arc::new(InMemoryStore::new());
    let a = ParticipantRef::player(Uuid::new_v4());
    let b = ParticipantRef::club(Uuid::new_v4());
    let draft = |content: &str| NewMessage {
        id: Uuid::new_v4(),
        sender: a,
        receiver: b,
        subject: None,
        content: content.into(),
        reply_to_message_id: None,
    };

    let (_, conversation) = store
        .append_message(&draft("early"), hockey_connect_messaging::models::now_micros())
        .await
        .unwrap();

    // The mark-read call begins here, then a message lands before it writes.
    let snapshot = hockey_connect_messaging::models::now_micros();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store
        .append_message(&draft("late"), hockey_connect_messaging::models::now_micros())
        .await
        .unwrap();

    store.mark_read(conversation.id, b, snapshot).await.unwrap();
    assert_eq!(store.unread_total(b).await.unwrap(), 1);
}

#[tokio::test]
async fn hidden_conversation_resurfaces_on_new_message() {
    let app = app();
    let player = create_player(&app, "Finn").await;
    let club = create_club(&app, "HDM").await;
    let a = (player.as_str(), "player");
    let b = (club.as_str(), "club");

    let res = send_message(&app, b, a, "Trial on Saturday?").await;
    let conversation_id = res.body["conversation_id"].as_str().unwrap().to_string();

    let res = delete(
        &app,
        &format!("/api/conversations/{conversation_id}?user_id={player}&user_type=player"),
    )
    .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(conversations(&app, a).await.is_empty());
    assert_eq!(unread(&app, a).await, 0);
    assert_eq!(conversations(&app, b).await.len(), 1);

    send_message(&app, b, a, "Still interested?").await;
    let list = conversations(&app, a).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["conversation"]["id"], conversation_id.as_str());
    assert_eq!(list[0]["unread_count"], 2);

    let res = delete(
        &app,
        &format!("/api/conversations/{}?user_id={player}&user_type=player", Uuid::new_v4()),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], "CONVERSATION_NOT_FOUND");
}

#[tokio::test]
async fn outsiders_are_forbidden_without_data() {
    let app = app();
    let player = create_player(&app, "Gijs").await;
    let club = create_club(&app, "Bloemendaal").await;
    let outsider = create_player(&app, "Hidde").await;

    let res = send_message(&app, (player.as_str(), "player"), (club.as_str(), "club"), "secret").await;
    let conversation_id = res.body["conversation_id"].as_str().unwrap().to_string();

    let res = get(
        &app,
        &format!("/api/conversations/{conversation_id}/messages?user_id={outsider}&user_type=player"),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert!(!res.body.to_string().contains("secret"));

    let res = put(
        &app,
        &format!("/api/conversations/{conversation_id}/mark-read?user_id={outsider}&user_type=player"),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = delete(
        &app,
        &format!("/api/conversations/{conversation_id}?user_id={outsider}&user_type=player"),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(unread(&app, (club.as_str(), "club")).await, 1);

    // Same id, wrong participant type, is not a participant either.
    let res = get(
        &app,
        &format!("/api/conversations/{conversation_id}/messages?user_id={player}&user_type=club"),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn conversations_follow_latest_activity_and_unread_adds_up() {
    let app = app();
    let player = create_player(&app, "Jip").await;
    let one = create_club(&app, "Club One").await;
    let two = create_club(&app, "Club Two").await;
    let me = (player.as_str(), "player");

    fn contents(list: &[serde_json::Value]) -> Vec<String> {
        list.iter()
            .map(|c| c["conversation"]["last_message_content"].as_str().unwrap().to_string())
            .collect()
    }
    // Keeps activity timestamps of different conversations apart.
    let tick = || tokio::time::sleep(std::time::Duration::from_millis(2));

    for (from, content) in [(&one, "from one"), (&two, "from two"), (&two, "two again")] {
        let res = send_message(&app, (from.as_str(), "club"), me, content).await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        tick().await;
    }
    assert_eq!(contents(&conversations(&app, me).await), ["two again", "from one"]);
    assert_eq!(unread(&app, me).await, 3);

    let res = send_message(&app, (one.as_str(), "club"), me, "one again").await;
    assert_eq!(res.status, StatusCode::OK);
    tick().await;
    let list = conversations(&app, me).await;
    assert_eq!(contents(&list), ["one again", "two again"]);
    let per_conversation: Vec<i64> = list.iter().map(|c| c["unread_count"].as_i64().unwrap()).collect();
    assert_eq!(per_conversation, [2, 2]);
    assert_eq!(unread(&app, me).await, 4);

    // Replying does not add to the sender's own unread total.
    let res = send_message(&app, me, (two.as_str(), "club"), "thanks").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(contents(&conversations(&app, me).await), ["thanks", "one again"]);
    assert_eq!(unread(&app, me).await, 4);
}
