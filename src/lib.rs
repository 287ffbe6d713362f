pub mod chat;
pub mod cli;
pub mod completion;
pub mod models;
pub mod optimistic;
pub mod server;
pub mod storage;

use chat::ChatService;
use cli::Args;
use completion::CompletionConfig;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Storage Type: {}", args.storage_type);
    info!("Storage Key: {}", args.storage_key);
    info!("Completion Provider: {}", args.completion_type);
    if let Some(model) = &args.completion_model {
        info!("Completion Model: {}", model);
    }
    info!("-------------------------");

    let persistence = storage::initialize_persistence(&args)?;
    let completion_config = CompletionConfig::from_args(&args)?;
    let completion = completion::new_client(&completion_config)?;
    let service = ChatService::new(persistence, completion);

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, service);
    server.run().await?;

    Ok(())
}
