use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes dataset download requests; swapped out in tests and behind proxies.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
