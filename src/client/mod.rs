//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::domain::{
    CampaignId, DeliveryStatus, Login, Password, RawPhoneNumber, SendSms, SendSmsResponse,
    SenderAlias, ValidationError,
};
use crate::provider::BoxFuture;
use crate::transport::{self, DecodeError, Operation, SendSmsOutcome};

const DEFAULT_ENDPOINT: &str = "https://sms-fly.com/api/api.php";
const DEFAULT_NO_ALIAS_ENDPOINT: &str = "https://sms-fly.com/api/api.noai.php";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const XML_MIME: &str = "text/xml";

/// Key identifying SMS-fly in stores shared by several SMS providers.
pub const PROCESSING_KEY: &str = "sms_fly";

pub const ENV_LOGIN: &str = "SMSFLY_LOGIN";
pub const ENV_PASSWORD: &str = "SMSFLY_PASSWORD";
pub const ENV_ALIAS: &str = "SMSFLY_ALFANAME";
pub const ENV_INSECURE_TLS: &str = "SMSFLY_INSECURE_TLS";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_xml<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_xml<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .basic_auth(auth.login.as_str(), Some(auth.password.as_str()))
                .header(CONTENT_TYPE, XML_MIME)
                .header(ACCEPT, XML_MIME)
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Credentials for SMS-fly API calls, sent as HTTP basic auth.
pub struct Auth {
    login: Login,
    password: Password,
}

impl Auth {
    /// Validate that both parts are non-empty.
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            login: Login::new(login)?,
            password: Password::new(password)?,
        })
    }

    pub fn login(&self) -> &Login {
        &self.login
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsFlyClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - gateway rejections of `SENDSMS` (with the catalog description),
/// - validation/parse failures.
pub enum SmsFlyError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// SMS-fly refused to accept a `SENDSMS` campaign.
    #[error("gateway rejected the message: {code} ({description})")]
    Rejected {
        code: crate::domain::ErrorCode,
        description: String,
    },

    /// Response body is not well-formed XML or lacks a required element.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<DecodeError> for SmsFlyError {
    fn from(err: DecodeError) -> Self {
        Self::Parse(Box::new(err))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmsFlyClient`].
///
/// Defaults: sender alias `InfoCenter`, the public SMS-fly endpoints, a 10s
/// connect timeout, a 15s total timeout and certificate verification enabled.
pub struct SmsFlyClientBuilder {
    auth: Auth,
    alias: Option<SenderAlias>,
    endpoint: String,
    no_alias_endpoint: String,
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
}

impl SmsFlyClientBuilder {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            alias: Some(SenderAlias::default()),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            no_alias_endpoint: DEFAULT_NO_ALIAS_ENDPOINT.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            accept_invalid_certs: false,
        }
    }

    /// Configure a builder from `SMSFLY_*` environment variables.
    ///
    /// `SMSFLY_LOGIN` and `SMSFLY_PASSWORD` are required. `SMSFLY_ALFANAME`
    /// overrides the sender alias; an empty value or `off` disables it.
    /// `SMSFLY_INSECURE_TLS=1` turns off certificate verification.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let login = lookup(ENV_LOGIN).ok_or(ValidationError::MissingEnvVar { name: ENV_LOGIN })?;
        let password = lookup(ENV_PASSWORD).ok_or(ValidationError::MissingEnvVar {
            name: ENV_PASSWORD,
        })?;
        let mut builder = Self::new(Auth::new(login, password)?);

        if let Some(alias) = lookup(ENV_ALIAS) {
            let alias = alias.trim();
            builder = if alias.is_empty() || alias.eq_ignore_ascii_case("off") {
                builder.without_alias()
            } else {
                builder.alias(SenderAlias::new(alias)?)
            };
        }
        if let Some(insecure) = lookup(ENV_INSECURE_TLS) {
            builder = builder.danger_accept_invalid_certs(matches!(insecure.trim(), "1" | "true"));
        }

        Ok(builder)
    }

    /// Send with a registered sender alias (uses the alias-capable endpoint).
    pub fn alias(mut self, alias: SenderAlias) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Send without a sender alias (cheaper; uses the alias-free endpoint).
    pub fn without_alias(mut self) -> Self {
        self.alias = None;
        self
    }

    /// Override the endpoint used when a sender alias is configured.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the endpoint used when the sender alias is disabled.
    pub fn no_alias_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.no_alias_endpoint = endpoint.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Skip TLS certificate verification.
    ///
    /// Some SMS-fly deployments have served self-signed or outdated
    /// certificates. Enabling this exposes credentials to anyone able to
    /// intercept the connection; leave it off unless you have to.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build a [`SmsFlyClient`].
    pub fn build(self) -> Result<SmsFlyClient, SmsFlyError> {
        validate_endpoint("endpoint", &self.endpoint)?;
        validate_endpoint("no_alias_endpoint", &self.no_alias_endpoint)?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if self.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for SMS-fly requests");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|err| SmsFlyError::Transport(Box::new(err)))?;

        Ok(SmsFlyClient {
            auth: self.auth,
            alias: self.alias,
            endpoint: self.endpoint,
            no_alias_endpoint: self.no_alias_endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn validate_endpoint(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl {
            field,
            value: value.to_owned(),
        }),
    }
}

#[derive(Clone)]
/// High-level SMS-fly client.
///
/// Every call is an XML document POSTed with basic auth to
/// `https://sms-fly.com/api/api.php`, or to `https://sms-fly.com/api/api.noai.php`
/// when the sender alias is disabled.
pub struct SmsFlyClient {
    auth: Auth,
    alias: Option<SenderAlias>,
    endpoint: String,
    no_alias_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl SmsFlyClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`SmsFlyClient::builder`].
    pub fn new(auth: Auth) -> Result<Self, SmsFlyError> {
        SmsFlyClientBuilder::new(auth).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> SmsFlyClientBuilder {
        SmsFlyClientBuilder::new(auth)
    }

    /// Configured sender alias, `None` when sending unbranded.
    pub fn alias(&self) -> Option<&SenderAlias> {
        self.alias.as_ref()
    }

    /// Endpoint every request goes to, chosen by the alias setting.
    pub fn api_url(&self) -> &str {
        match self.alias {
            Some(_) => &self.endpoint,
            None => &self.no_alias_endpoint,
        }
    }

    /// Key identifying this gateway in shared message stores.
    pub fn processing_key(&self) -> &'static str {
        PROCESSING_KEY
    }

    /// Query the account balance.
    ///
    /// A response without a numeric `<balance>` yields `0.0` rather than an
    /// error; the fallback is logged.
    pub async fn get_balance(&self) -> Result<f64, SmsFlyError> {
        let body = self
            .call(Operation::GetBalance, &transport::encode_get_balance_body())
            .await?;

        match transport::decode_get_balance_xml_response(&body)? {
            Some(balance) => Ok(balance),
            None => {
                warn!("SMS-fly balance response has no numeric balance, assuming 0");
                Ok(0.0)
            }
        }
    }

    /// Send a single SMS.
    ///
    /// Errors:
    /// - [`SmsFlyError::Transport`] / [`SmsFlyError::HttpStatus`] when the call fails,
    /// - [`SmsFlyError::Parse`] for malformed responses,
    /// - [`SmsFlyError::Rejected`] when the gateway does not accept the campaign.
    pub async fn send_sms(&self, request: &SendSms) -> Result<SendSmsResponse, SmsFlyError> {
        let body = transport::encode_send_sms_body(request, self.alias.as_ref());
        let response = self.call(Operation::SendSms, &body).await?;

        match transport::decode_send_sms_xml_response(&response)? {
            SendSmsOutcome::Accepted(accepted) => {
                debug!(campaign_id = %accepted.campaign_id, status = %accepted.status, "SMS accepted");
                Ok(accepted)
            }
            SendSmsOutcome::Rejected(code) => {
                let description = code.description().into_owned();
                Err(SmsFlyError::Rejected { code, description })
            }
        }
    }

    /// Query the delivery status of one recipient of a campaign.
    ///
    /// The status is returned verbatim; see [`DeliveryStatus::known`] and
    /// [`DeliveryStatus::description`] to interpret it.
    pub async fn check_status(
        &self,
        campaign_id: &CampaignId,
        recipient: &RawPhoneNumber,
    ) -> Result<DeliveryStatus, SmsFlyError> {
        let body = transport::encode_check_status_body(campaign_id, recipient);
        let response = self.call(Operation::GetMessageStatus, &body).await?;
        Ok(transport::decode_check_status_xml_response(&response)?)
    }

    async fn call(&self, operation: Operation, body: &str) -> Result<String, SmsFlyError> {
        let url = self.api_url();
        debug!(%operation, url, "calling SMS-fly");

        let response = self
            .http
            .post_xml(url, &self.auth, transport::encode_envelope(operation, body))
            .await
            .map_err(SmsFlyError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(SmsFlyError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response.body)
    }
}
