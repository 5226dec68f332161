use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::errors::{ErrorKind, Result};
use crate::model::{Subscription, WebsiteRecord};
use crate::services::{Billing, UserMetadata};

const AGENT: &str = concat!("roamjs-lifecycle/", env!("CARGO_PKG_VERSION"));

/// Query values are escaped like `encodeURIComponent`: spaces become `%20`,
/// never `+`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Client for the FLOSS API, which owns user metadata and Stripe billing.
#[derive(Clone)]
pub struct FlossClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    website: Option<WebsiteRecord>,
}

#[derive(Serialize)]
struct MetadataUpdate<'a> {
    website: Option<&'a WebsiteRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribedResponse {
    #[serde(default)]
    subscribed_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelRequest<'a> {
    subscription_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct CancelResponse {
    #[serde(default)]
    success: bool,
}

impl FlossClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        FlossClient {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub fn url_with_query(&self, path: &str, query: &[(&str, &str)]) -> String {
        let pairs: Vec<String> = query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_VALUE),
                    utf8_percent_encode(value, QUERY_VALUE)
                )
            })
            .collect();
        if pairs.is_empty() {
            return self.url(path);
        }
        format!("{}?{}", self.url(path), pairs.join("&"))
    }

    fn authorized(&self, builder: RequestBuilder, authorization: Option<&str>) -> RequestBuilder {
        let builder = builder.header(USER_AGENT, AGENT);
        match authorization {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        authorization: Option<&str>,
    ) -> Result<T> {
        let request = self.authorized(self.client.get(self.url_with_query(path, query)), authorization);
        let response = check(path, request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check(path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        warn!(path, status = status.as_u16(), body = %body, "FLOSS API request failed");
        return Err(ErrorKind::Dependency(format!("{} responded with {}", path, status)).into());
    }
    Ok(response)
}

#[async_trait]
impl UserMetadata for FlossClient {
    async fn website(&self, authorization: Option<&str>) -> Result<Option<WebsiteRecord>> {
        let body: MetadataResponse = self
            .get("auth-user-metadata", &[("key", "website")], authorization)
            .await?;
        Ok(body.website)
    }

    async fn set_website(&self, authorization: Option<&str>, website: Option<&WebsiteRecord>) -> Result<()> {
        let request = self.authorized(self.client.put(self.url("auth-user-metadata")), authorization);
        check("auth-user-metadata", request.json(&MetadataUpdate { website }).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl Billing for FlossClient {
    async fn subscription(&self, authorization: Option<&str>, product: &str) -> Result<Subscription> {
        let body: SubscribedResponse = self
            .get("stripe-is-subscribed", &[("product", product)], authorization)
            .await?;
        Ok(Subscription {
            subscription_id: body.subscribed_id,
        })
    }

    async fn cancel(&self, authorization: Option<&str>, subscription: &Subscription) -> Result<bool> {
        let request = self.authorized(self.client.post(self.url("stripe-cancel")), authorization);
        let payload = CancelRequest {
            subscription_id: subscription.subscription_id.as_deref(),
        };
        let response = check("stripe-cancel", request.json(&payload).send().await?).await?;
        let body: CancelResponse = response.json().await?;
        Ok(body.success)
    }
}
