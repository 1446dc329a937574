#[tokio::main]
async fn main() -> anyhow::Result<()> {
    facade_server::start().await
}
