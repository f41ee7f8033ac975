use std::sync::Arc;

use tokio::{net::TcpListener, sync::oneshot};

use application::{
    repository::memory::{MemoryMessageRepository, MemoryParticipantRepository},
    MessageService, MessageServiceDependencies, PresenceService, PresenceServiceDependencies,
    SystemClock,
};
use web_api::{router, AppState};

pub fn build_state() -> AppState {
    let participants = Arc::new(MemoryParticipantRepository::new());
    let messages = Arc::new(MemoryMessageRepository::new());
    let clock = Arc::new(SystemClock);

    let presence_service = PresenceService::new(PresenceServiceDependencies {
        participants: participants.clone(),
        messages: messages.clone(),
        clock: clock.clone(),
    });
    let message_service = MessageService::new(MessageServiceDependencies {
        participants,
        messages,
        clock,
    });

    AppState::new(Arc::new(presence_service), Arc::new(message_service))
}

/// An in-process server over in-memory repositories, shut down on drop.
pub struct TestServer {
    pub base: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let app = router(build_state());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            base: format!("http://{addr}"),
            shutdown: Some(shutdown_tx),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
