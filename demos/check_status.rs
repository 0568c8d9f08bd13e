use std::io;

use smsfly::{CampaignId, RawPhoneNumber, SmsFlyClientBuilder};

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let campaign_id = CampaignId::new(required("SMSFLY_CAMPAIGN_ID")?)?;
    let recipient = RawPhoneNumber::new(required("SMSFLY_TO")?)?;

    let client = SmsFlyClientBuilder::from_env()?.build()?;
    let status = client.check_status(&campaign_id, &recipient).await?;

    println!(
        "status: {status}, final: {}, description: {}",
        status.is_terminal(),
        status.description()
    );

    Ok(())
}
