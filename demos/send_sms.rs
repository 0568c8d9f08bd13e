use std::io;

use smsfly::{MessageText, RawPhoneNumber, SendSms, SmsFlyClientBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let to = std::env::var("SMSFLY_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSFLY_TO environment variable is required",
        )
    })?;
    let text = std::env::var("SMSFLY_TEXT").unwrap_or_else(|_| "hello from smsfly".to_owned());

    let client = SmsFlyClientBuilder::from_env()?.build()?;
    let request = SendSms::new(RawPhoneNumber::new(to)?, MessageText::new(text)?)
        .description("smsfly demo");
    let response = client.send_sms(&request).await?;

    println!(
        "campaign_id: {}, status: {} ({})",
        response.campaign_id,
        response.status,
        response.status.description()
    );

    Ok(())
}
