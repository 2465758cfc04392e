//! Integration tests for LIST and LSUB

mod common;

use common::{setup_test_server, TestClient};
use postimap::Storage;

#[tokio::test]
async fn test_list_all_and_lsub() {
    let (storage, addr) = setup_test_server().await;
    storage.new_mailbox("Archive").await.unwrap();
    storage.new_mailbox("Work/Projects").await.unwrap();
    let mut client = TestClient::logged_in(&addr).await;

    assert_eq!(
        client.command("A1", "LIST \"\" *").await,
        vec![
            "* LIST () \"/\" INBOX",
            "* LIST () \"/\" Archive",
            "* LIST () \"/\" \"Work/Projects\"",
            "A1 OK LIST",
        ]
    );
    assert_eq!(
        client.command("A2", "LSUB \"\" *").await,
        vec![
            "* LSUB () \"/\" INBOX",
            "* LSUB () \"/\" Archive",
            "* LSUB () \"/\" \"Work/Projects\"",
            "A2 OK LSUB",
        ]
    );
}

#[tokio::test]
async fn test_list_single_mailbox() {
    let (storage, addr) = setup_test_server().await;
    storage.new_mailbox("Archive").await.unwrap();
    let mut client = TestClient::logged_in(&addr).await;

    assert_eq!(
        client.command("A1", "LIST \"\" inbox").await,
        vec!["* LIST () \"/\" INBOX", "A1 OK LIST"]
    );
    assert_eq!(
        client.command("A2", "LIST \"\" \"Archive\"").await,
        vec!["* LIST () \"/\" Archive", "A2 OK LIST"]
    );
    assert_eq!(
        client.command("A3", "LIST \"\" Nowhere").await,
        vec!["A3 NO Mailbox \"Nowhere\" not found"]
    );
}

#[tokio::test]
async fn test_list_patterns() {
    let (storage, addr) = setup_test_server().await;
    storage.new_mailbox("Work").await.unwrap();
    storage.new_mailbox("Work/Projects").await.unwrap();
    let mut client = TestClient::logged_in(&addr).await;

    assert_eq!(
        client.command("A1", "LIST \"\" \"\"").await,
        vec!["* LIST (\\Noselect) \"/\" \"\"", "A1 OK LIST"]
    );
    assert_eq!(
        client.command("A2", "LIST \"\" %").await,
        vec!["* LIST () \"/\" INBOX", "* LIST () \"/\" Work", "A2 OK LIST"]
    );
    assert_eq!(
        client.command("A3", "LIST \"\" Work/*").await,
        vec!["* LIST () \"/\" \"Work/Projects\"", "A3 OK LIST"]
    );
}

#[tokio::test]
async fn test_list_reference_rejected() {
    let (_storage, addr) = setup_test_server().await;
    let mut client = TestClient::logged_in(&addr).await;

    assert_eq!(
        client.command("A1", "LIST Work *").await,
        vec!["A1 BAD Reference names not allowed"]
    );
    let reply = client.command("A2", "LIST").await;
    assert!(reply[0].starts_with("A2 BAD "), "{:?}", reply);
    assert_eq!(client.command("A3", "NOOP").await, vec!["A3 OK NOOP"]);
}
