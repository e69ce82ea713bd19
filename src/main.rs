use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    pinboard::init()?;
    pinboard::cli::run().await
}
