//! View state for the tweet compose overlay.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::header::USER_AGENT;

use crate::config::Settings;
use crate::errors::{ErrorKind, Result};
use crate::widgets::host::{generate_block_uid, setting_value, HostApi, TreeRef};

pub const SETTINGS_PAGE: &str = "roam/js/twitter";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TweetRequest {
    pub key: Option<String>,
    pub secret: Option<String>,
    pub content: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TweetUser {
    pub screen_name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub id: serde_json::Value,
    pub user: TweetUser,
}

#[async_trait]
pub trait TweetApi: Send + Sync {
    async fn tweet(&self, request: &TweetRequest) -> Result<Tweet>;
}

/// Posts to `{base}/twitter-tweet`.
pub struct HttpTweetApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize, Default)]
struct TweetFailure {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl HttpTweetApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        HttpTweetApi {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        HttpTweetApi::new(reqwest::Client::new(), settings.roamjs_api_url.clone())
    }
}

#[async_trait]
impl TweetApi for HttpTweetApi {
    async fn tweet(&self, request: &TweetRequest) -> Result<Tweet> {
        let response = self
            .client
            .post(format!("{}/twitter-tweet", self.base_url))
            .header(USER_AGENT, concat!("roamjs-lifecycle/", env!("CARGO_PKG_VERSION")))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let failure: TweetFailure = response.json().await.unwrap_or_default();
            let text = failure
                .error
                .or(failure.message)
                .unwrap_or_else(|| format!("twitter-tweet responded with {}", status));
            return Err(ErrorKind::Dependency(text).into());
        }
        Ok(response.json().await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub uid: String,
    pub content: String,
}

#[derive(Deserialize, Default)]
struct OAuth {
    oauth_token: Option<String>,
    oauth_token_secret: Option<String>,
}

/// The compose overlay attached to one block. The block's children are the
/// queued messages; only the first one is sent.
#[derive(Debug, Clone)]
pub struct TweetComposer {
    block_uid: String,
    messages: Vec<Message>,
    open: bool,
    sending: usize,
    error: Option<String>,
}

impl TweetComposer {
    pub fn mount(host: &dyn HostApi, block_uid: &str) -> Result<TweetComposer> {
        let messages = host
            .get_tree(TreeRef::Block(block_uid))?
            .map(|tree| {
                tree.children
                    .into_iter()
                    .map(|child| Message {
                        uid: child.uid,
                        content: child.text,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(TweetComposer {
            block_uid: block_uid.to_string(),
            messages,
            open: false,
            sending: 0,
            error: None,
        })
    }

    pub fn block_uid(&self) -> &str {
        &self.block_uid
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Number of tweets in flight, for the "Sending n of m" indicator.
    pub fn sending(&self) -> usize {
        self.sending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sends the first message. Failures are kept on the composer for
    /// display rather than returned.
    pub async fn send(&mut self, host: &dyn HostApi, api: &dyn TweetApi) {
        self.sending = 1;
        self.error = None;

        match self.try_send(host, api).await {
            Ok(tweet) => {
                info!(id = %tweet.id, screen_name = %tweet.user.screen_name, "tweet sent");
                self.close();
            }
            Err(e) => {
                warn!(error = %e, "tweet failed");
                self.error = Some(e.to_string());
                self.sending = 0;
            }
        }
    }

    async fn try_send(&self, host: &dyn HostApi, api: &dyn TweetApi) -> Result<Tweet> {
        let message = self
            .messages
            .first()
            .ok_or_else(|| ErrorKind::Validation("There is no tweet to send".to_string()))?;

        let settings = host
            .get_tree(TreeRef::Page(SETTINGS_PAGE))?
            .map(|page| page.children)
            .unwrap_or_default();
        let oauth: OAuth = serde_json::from_str(&setting_value(&settings, "oauth", "{}"))?;
        let sent_uid = setting_value(&settings, "sent", "").replace("((", "").replace("))", "");

        let source_uid = generate_block_uid();
        if !sent_uid.is_empty() {
            let stamp = format!("Sent at {}", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
            host.create_block(&sent_uid, 0, &source_uid, &stamp)?;
        }

        let request = TweetRequest {
            key: oauth.oauth_token,
            secret: oauth.oauth_token_secret,
            content: message.content.clone(),
        };
        let tweet = api.tweet(&request).await?;

        if !sent_uid.is_empty() {
            host.move_block(&source_uid, 0, &message.uid)?;
        }
        Ok(tweet)
    }
}
