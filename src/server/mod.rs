pub mod api;
pub mod page;

use log::info;
use std::error::Error;

use crate::chat::ChatService;

pub struct Server {
    addr: String,
    service: ChatService,
}

impl Server {
    pub fn new(addr: String, service: ChatService) -> Self {
        Self { addr, service }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = api::router(self.service.clone());
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("HTTP server listening on: http://{}", self.addr);
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}
