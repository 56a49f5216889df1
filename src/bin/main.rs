#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tixchain_cli::run().await
}
