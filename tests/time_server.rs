//! Integration test: time server and client end to end
//!
//! Runs the time server on an ephemeral port and talks to it through the
//! socket client.

use servertime_ws::bin_common::ShutdownManager;
use servertime_ws::server::{ServerTimeReply, TimeServer};
use servertime_ws::socket_client::*;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn start_server() -> (String, ShutdownManager, tokio::task::JoinHandle<anyhow::Result<()>>) {
    let server = TimeServer::bind("127.0.0.1:0", "/ws_server").await.unwrap();
    let url = server.ws_url().unwrap();
    let shutdown = ShutdownManager::new();

    let task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { server.run(shutdown.wait()).await })
    };

    (url, shutdown, task)
}

async fn wait_for(sink: &MemorySink, needle: &str) -> bool {
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if sink.contains(needle) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_client_receives_server_time() {
    let (url, shutdown, server_task) = start_server().await;
    let sink = MemorySink::new();
    let mut client = SocketClient::connect_to(url.clone(), ServerTimeHandler::new(sink.clone()));

    assert!(wait_for(&sink, "receive: ").await);

    let handle = client.close_handle();
    shutdown.spawn_teardown_hook(handle);
    shutdown.trigger();
    tokio::time::timeout(TIMEOUT, client.wait()).await.unwrap().unwrap();

    let received = sink.lines_with_prefix("receive: ");
    assert_eq!(received.len(), 1);
    let payload = received[0].trim_start_matches("receive: ");
    let reply: ServerTimeReply = serde_json::from_str(payload).unwrap();
    assert!(!reply.server_time.is_empty());

    assert!(sink.contains(&format!("connection closed ({} : 1000,", url)));
    tokio::time::timeout(TIMEOUT, server_task).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn test_wrong_path_is_rejected() {
    let (url, shutdown, _server_task) = start_server().await;
    let wrong = url.replace("/ws_server", "/elsewhere");
    let sink = MemorySink::new();
    let mut client = SocketClient::connect_to(wrong, ServerTimeHandler::new(sink.clone()));

    tokio::time::timeout(TIMEOUT, client.wait()).await.unwrap().unwrap();

    assert!(sink.contains("kind=http"));
    assert!(sink.contains("status=404"));
    assert!(!sink.contains("connected to"));
    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_request_closes_connection() {
    struct SendGarbage;

    impl SocketHandler for SendGarbage {
        fn on_open(&mut self, _endpoint: &str, outbox: &mut Outbox) -> Result<()> {
            outbox.send(WsMessage::Text("not json".into()));
            Ok(())
        }
    }

    struct Observe<H> {
        inner: H,
        sink: MemorySink,
    }

    impl<H: SocketHandler> SocketHandler for Observe<H> {
        fn on_open(&mut self, endpoint: &str, outbox: &mut Outbox) -> Result<()> {
            self.inner.on_open(endpoint, outbox)
        }

        fn on_close(&mut self, event: &CloseEvent) {
            self.sink.line(&format!("close {}", event.code));
        }
    }

    let (url, shutdown, _server_task) = start_server().await;
    let sink = MemorySink::new();
    let mut client = SocketClient::connect_to(
        url,
        Observe {
            inner: SendGarbage,
            sink: sink.clone(),
        },
    );

    tokio::time::timeout(TIMEOUT, client.wait()).await.unwrap().unwrap();

    assert_eq!(sink.lines(), vec!["close 1005".to_string()]);
    shutdown.trigger();
}
