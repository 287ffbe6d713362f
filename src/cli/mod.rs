use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Storage Args ---
    /// Conversation store type (file, redis, memory)
    #[arg(long, env = "STORAGE_TYPE", default_value = "file")]
    pub storage_type: String,

    /// Directory for the file-backed conversation store.
    #[arg(long, env = "STORAGE_PATH", default_value = ".chat-storage")]
    pub storage_path: String,

    /// Key under which the conversation document is stored.
    #[arg(long, env = "STORAGE_KEY", default_value = "chatbot-client")]
    pub storage_key: String,

    /// Redis URL for the redis-backed conversation store (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "STORAGE_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub storage_redis_url: String,

    /// Prefix for Redis conversation keys.
    #[arg(long, env = "STORAGE_REDIS_PREFIX", default_value = "chat:")]
    pub storage_redis_prefix: String,

    // --- Completion Provider Args ---
    /// Completion provider used for bot replies (mistral, local)
    #[arg(long, env = "COMPLETION_TYPE", default_value = "mistral")]
    pub completion_type: String,

    /// Base URL for the completion provider API. Adapter default if not set.
    #[arg(long, env = "COMPLETION_BASE_URL")]
    pub completion_base_url: Option<String>,

    /// API key for the completion provider.
    #[arg(long, env = "MISTRAL_API_KEY", default_value = "")]
    pub completion_api_key: String,

    /// Model name for chat completion (e.g., mistral-small-latest)
    #[arg(long, env = "COMPLETION_MODEL")]
    pub completion_model: Option<String>,

    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,
}
