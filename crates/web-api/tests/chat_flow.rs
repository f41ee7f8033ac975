mod support;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use support::TestServer;

async fn register(client: &Client, base: &str, name: &str) -> StatusCode {
    client
        .post(format!("{base}/participants"))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("register")
        .status()
}

async fn post_message(
    client: &Client,
    base: &str,
    from: &str,
    to: &str,
    text: &str,
    kind: &str,
) -> StatusCode {
    client
        .post(format!("{base}/messages"))
        .header("user", from)
        .json(&json!({ "to": to, "text": text, "type": kind }))
        .send()
        .await
        .expect("post message")
        .status()
}

async fn read_messages(client: &Client, base: &str, viewer: &str, query: &str) -> Vec<Value> {
    client
        .get(format!("{base}/messages{query}"))
        .header("user", viewer)
        .send()
        .await
        .expect("get messages")
        .json::<Vec<Value>>()
        .await
        .expect("messages json")
}

fn texts(messages: &[Value]) -> Vec<&str> {
    messages
        .iter()
        .map(|m| m["text"].as_str().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn register_post_and_read_flow() {
    let server = TestServer::start().await;
    let client = Client::new();

    assert_eq!(register(&client, &server.base, "Ana").await, StatusCode::CREATED);
    assert_eq!(register(&client, &server.base, "Ana").await, StatusCode::CONFLICT);
    assert_eq!(
        register(&client, &server.base, "").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );

    assert_eq!(
        post_message(&client, &server.base, "Ana", "Todos", "hi", "message").await,
        StatusCode::CREATED
    );

    // another viewer sees Ana's join announcement and the public message
    let seen = read_messages(&client, &server.base, "Bruno", "").await;
    assert_eq!(texts(&seen), ["joined", "hi"]);
    assert_eq!(seen[0]["from"], "Ana");
    assert_eq!(seen[0]["type"], "status");
    assert_eq!(seen[0]["to"], "Todos");
    assert_eq!(seen[1]["type"], "message");

    let participants = client
        .get(format!("{}/participants", server.base))
        .send()
        .await
        .expect("get participants")
        .json::<Vec<Value>>()
        .await
        .expect("participants json");
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["name"], "Ana");
    assert!(participants[0]["lastStatus"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn private_messages_stay_between_sender_and_recipient() {
    let server = TestServer::start().await;
    let client = Client::new();

    for name in ["Ana", "Bruno", "Carla"] {
        assert_eq!(register(&client, &server.base, name).await, StatusCode::CREATED);
    }
    assert_eq!(
        post_message(&client, &server.base, "Ana", "Bruno", "secret", "private_message").await,
        StatusCode::CREATED
    );

    for viewer in ["Ana", "Bruno"] {
        let seen = read_messages(&client, &server.base, viewer, "").await;
        assert!(texts(&seen).contains(&"secret"), "{viewer} should see it");
    }
    let seen = read_messages(&client, &server.base, "Carla", "").await;
    assert!(!texts(&seen).contains(&"secret"));
    // but Carla still sees every join announcement
    assert_eq!(seen.len(), 3);
}

#[tokio::test]
async fn message_posting_is_validated() {
    let server = TestServer::start().await;
    let client = Client::new();
    register(&client, &server.base, "Ana").await;

    // unknown sender
    assert_eq!(
        post_message(&client, &server.base, "ghost", "Todos", "hi", "message").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    // empty text
    assert_eq!(
        post_message(&client, &server.base, "Ana", "Todos", "", "message").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    // status is reserved for the system
    assert_eq!(
        post_message(&client, &server.base, "Ana", "Todos", "hi", "status").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    // missing user header
    let status = client
        .post(format!("{}/messages", server.base))
        .json(&json!({ "to": "Todos", "text": "hi", "type": "message" }))
        .send()
        .await
        .expect("post")
        .status();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn limit_truncates_the_filtered_list() {
    let server = TestServer::start().await;
    let client = Client::new();
    register(&client, &server.base, "Ana").await;

    for i in 0..5 {
        post_message(&client, &server.base, "Ana", "Todos", &format!("m{i}"), "message").await;
    }

    let limited = read_messages(&client, &server.base, "Bruno", "?limit=2").await;
    assert_eq!(texts(&limited), ["joined", "m0"]);

    // an unparseable limit is ignored
    let all = read_messages(&client, &server.base, "Bruno", "?limit=abc").await;
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn heartbeat_endpoint_tracks_known_participants() {
    let server = TestServer::start().await;
    let client = Client::new();
    register(&client, &server.base, "Ana").await;

    let ok = client
        .post(format!("{}/status", server.base))
        .header("user", "Ana")
        .send()
        .await
        .expect("status")
        .status();
    assert_eq!(ok, StatusCode::OK);

    let missing = client
        .post(format!("{}/status", server.base))
        .header("user", "ghost")
        .send()
        .await
        .expect("status")
        .status();
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_may_delete_a_message() {
    let server = TestServer::start().await;
    let client = Client::new();
    register(&client, &server.base, "Ana").await;
    post_message(&client, &server.base, "Ana", "Todos", "hi", "message").await;

    let seen = read_messages(&client, &server.base, "Ana", "").await;
    let id = seen
        .iter()
        .find(|m| m["text"] == "hi")
        .and_then(|m| m["id"].as_str())
        .expect("message id")
        .to_string();

    let forbidden = client
        .delete(format!("{}/messages/{id}", server.base))
        .header("user", "Bruno")
        .send()
        .await
        .expect("delete")
        .status();
    assert_eq!(forbidden, StatusCode::UNAUTHORIZED);

    let missing = client
        .delete(format!("{}/messages/{}", server.base, Uuid::new_v4()))
        .header("user", "Ana")
        .send()
        .await
        .expect("delete")
        .status();
    assert_eq!(missing, StatusCode::NOT_FOUND);

    let deleted = client
        .delete(format!("{}/messages/{id}", server.base))
        .header("user", "Ana")
        .send()
        .await
        .expect("delete")
        .status();
    assert_eq!(deleted, StatusCode::OK);

    let seen = read_messages(&client, &server.base, "Ana", "").await;
    assert!(!texts(&seen).contains(&"hi"));
}
