#[tokio::main]
async fn main() -> anyhow::Result<()> {
    habitgrid_backend::run().await
}
