use smsfly::SmsFlyClientBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = SmsFlyClientBuilder::from_env()?.build()?;
    let balance = client.get_balance().await?;

    println!("balance: {balance:.2}");

    Ok(())
}
