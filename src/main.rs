#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dashboard_api::run().await
}
