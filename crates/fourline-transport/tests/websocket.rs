//! Integration tests for the WebSocket client connection.
//!
//! These tests spin up a real `tokio-tungstenite` server on a random port
//! and drive a [`ConnectionManager`] against it.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use fourline_transport::{
        ConnectionManager, ConnectionState, TransportError,
    };
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on a random port and returns it with its ws:// URL.
    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}/ws"))
    }

    async fn accept(listener: &TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("should upgrade")
    }

    #[tokio::test]
    async fn test_connect_send_and_receive_text_frames() {
        let (listener, url) = listen().await;

        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            let msg = ws.next().await.unwrap().unwrap();
            assert!(msg.is_text(), "JSON should travel as a text frame");
            assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"leave"}"#);
            ws.send(Message::text(r#"{"type":"error"}"#)).await.unwrap();
            ws
        });

        let mut manager = ConnectionManager::connect(&url)
            .await
            .expect("client should connect");
        assert_eq!(manager.state(), ConnectionState::Open);
        assert!(manager.id().into_inner() > 0);

        manager.send(br#"{"type":"leave"}"#).await.unwrap();
        let frame = manager.recv().await.expect("should receive a frame");
        assert_eq!(frame, br#"{"type":"error"}"#);

        let _server_ws = server.await.expect("server task should complete");
        manager.close().await;
        assert_eq!(manager.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_server_close_is_terminal() {
        let (listener, url) = listen().await;

        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            ws.close(None).await.unwrap();
        });

        let mut manager = ConnectionManager::connect(&url).await.unwrap();
        server.await.unwrap();

        assert!(manager.recv().await.is_none());
        assert_eq!(manager.state(), ConnectionState::Closed);

        let err = manager.send(b"{}").await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected(_)));
    }

    #[tokio::test]
    async fn test_connect_to_nothing_fails() {
        // Bind then drop so the port is known to be free.
        let (listener, url) = listen().await;
        drop(listener);

        let result = ConnectionManager::connect(&url).await;
        match result {
            Err(TransportError::ConnectFailed { url: failed, .. }) => {
                assert_eq!(failed, url);
            }
            Err(other) => panic!("expected ConnectFailed, got {other:?}"),
            Ok(_) => panic!("connect should fail"),
        }
    }
}
