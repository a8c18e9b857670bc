//! Slack Web API client.
//!
//! Wraps a single `reqwest::Client` plus the bot token. Every call is a plain
//! request/response; directory uploads run one file at a time.

use reqwest::{
    Client, RequestBuilder,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{error, info, warn};

use crate::{
    error::SendError,
    message::{Attachment, Message, PostMessageRequest, PostedMessage},
};

/// Public Slack Web API endpoint.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "SLACK_TOKEN";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings for [`SlackClient::with_config`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A file stored by Slack after a completed upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct UploadTicket {
    upload_url: String,
    file_id: String,
}

#[derive(Debug, Serialize)]
struct FileRef<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CompletedUpload {
    #[serde(default)]
    files: Vec<UploadedFile>,
}

/// Authenticated connection details; absent when no token was supplied.
#[derive(Debug)]
struct ApiHandle {
    http: Client,
    token: String,
    base_url: String,
}

impl ApiHandle {
    fn post(&self, method: &str) -> RequestBuilder {
        self.http
            .post(format!("{}/{method}", self.base_url))
            .bearer_auth(&self.token)
    }

    /// Sends a Web API request and unwraps Slack's `{ ok, error }` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
    ) -> Result<T, SendError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SendError::api(method, format!("HTTP {status}")));
        }

        let body: Value = resp.json().await?;
        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let code = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Err(SendError::api(method, code));
        }

        Ok(serde_json::from_value(body)?)
    }

    async fn post_message(
        &self,
        request: &PostMessageRequest<'_>,
    ) -> Result<PostedMessage, SendError> {
        let method = "chat.postMessage";
        self.call(method, self.post(method).json(request)).await
    }

    async fn upload_file(
        &self,
        path: &Path,
        title: &str,
        channel: &str,
    ) -> Result<UploadedFile, SendError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| SendError::io(path, e))?;
        let length = contents.len().to_string();

        let method = "files.getUploadURLExternal";
        let ticket: UploadTicket = self
            .call(
                method,
                self.post(method)
                    .form(&[("filename", filename.as_str()), ("length", length.as_str())]),
            )
            .await?;

        let form = Form::new().part("file", Part::bytes(contents).file_name(filename));
        let resp = self
            .http
            .post(&ticket.upload_url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SendError::api("file upload", format!("HTTP {status}")));
        }

        let files = serde_json::to_string(&[FileRef {
            id: &ticket.file_id,
            title: (!title.is_empty()).then_some(title),
        }])?;
        let mut params = vec![("files", files)];
        if !channel.is_empty() {
            params.push(("channel_id", channel.to_string()));
        }

        let method = "files.completeUploadExternal";
        let completed: CompletedUpload = self.call(method, self.post(method).form(&params)).await?;
        Ok(completed
            .files
            .into_iter()
            .next()
            .unwrap_or_else(|| UploadedFile {
                id: ticket.file_id,
                title: title.to_string(),
            }))
    }
}

/// Posts messages and uploads files to Slack.
#[derive(Debug)]
pub struct SlackClient {
    api: Option<ApiHandle>,
}

impl SlackClient {
    /// Creates a client against the public API. An empty token yields a client
    /// that is not ready.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Http`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self, SendError> {
        Self::with_config(token, &ClientConfig::default())
    }

    /// Creates a client from the `SLACK_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// See [`SlackClient::new`].
    pub fn from_env() -> Result<Self, SendError> {
        Self::new(std::env::var(TOKEN_ENV).unwrap_or_default())
    }

    /// Creates a client with an explicit endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Http`] if the HTTP client cannot be built.
    pub fn with_config(
        token: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self, SendError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::from_parts(token.into(), http, &config.base_url))
    }

    fn from_parts(token: String, http: Client, base_url: &str) -> Self {
        let api = (!token.is_empty()).then(|| ApiHandle {
            http,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        });
        Self { api }
    }

    fn api(&self) -> Result<&ApiHandle, SendError> {
        self.api.as_ref().ok_or_else(|| {
            error!("slack client not initialised");
            SendError::NotReady
        })
    }

    /// Checks that the client holds a token.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::NotReady`] if the client was built without a token.
    pub fn is_ready(&self) -> Result<(), SendError> {
        self.api().map(|_| ())
    }

    /// Posts plain text with no attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not ready or Slack rejects the post.
    pub async fn send_text(
        &self,
        text: &str,
        channel_id: &str,
    ) -> Result<PostedMessage, SendError> {
        let api = self.api()?;
        let request = PostMessageRequest {
            channel: channel_id,
            text,
            attachments: Vec::new(),
            as_user: false,
        };
        log_post(api.post_message(&request).await)
    }

    /// Posts `header` as the message text with `text` in an attachment.
    /// An empty `color` leaves the attachment uncolored.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not ready or Slack rejects the post.
    pub async fn send(
        &self,
        header: &str,
        text: &str,
        color: &str,
        channel_id: &str,
    ) -> Result<PostedMessage, SendError> {
        let api = self.api()?;
        let request = PostMessageRequest {
            channel: channel_id,
            text: header,
            attachments: vec![Attachment::new(text, Some(color))],
            as_user: true,
        };
        log_post(api.post_message(&request).await)
    }

    /// # Errors
    ///
    /// See [`SlackClient::send`].
    pub async fn send_message(&self, msg: &Message) -> Result<PostedMessage, SendError> {
        self.send(
            &msg.header,
            &msg.text,
            msg.color.as_deref().unwrap_or_default(),
            &msg.channel_id,
        )
        .await
    }

    /// Uploads one local file to `channel` under `title`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not ready, the file cannot be read,
    /// or any step of the upload is rejected.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        title: &str,
        channel: &str,
    ) -> Result<UploadedFile, SendError> {
        let api = self.api()?;
        let path = path.as_ref();
        info!(path = %path.display(), "sending file");

        match api.upload_file(path, title, channel).await {
            Ok(file) => {
                info!(id = %file.id, title = %file.title, "uploaded file");
                Ok(file)
            }
            Err(e) => {
                error!(error = %e, path = %path.display(), "upload file failed");
                Err(e)
            }
        }
    }

    /// Uploads every regular entry of `path` (not recursive), in name order.
    ///
    /// Each file is titled with its own name; `_title` is accepted for call
    /// symmetry with [`SlackClient::upload_file`]. Failures are collected and
    /// do not stop the remaining uploads. An empty result means every file
    /// went through.
    pub async fn upload_directory(
        &self,
        path: impl AsRef<Path>,
        _title: &str,
        channel: &str,
    ) -> Vec<SendError> {
        if let Err(e) = self.is_ready() {
            return vec![e];
        }

        let dir = path.as_ref();
        let files = match list_files(dir).await {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "list directory failed");
                return vec![e];
            }
        };

        let mut errors = Vec::new();
        for (file, name) in files {
            if let Err(e) = self.upload_file(&file, &name, channel).await {
                errors.push(e);
            }
        }
        if !errors.is_empty() {
            warn!(dir = %dir.display(), failed = errors.len(), "some files were not uploaded");
        }
        errors
    }
}

fn log_post(result: Result<PostedMessage, SendError>) -> Result<PostedMessage, SendError> {
    match &result {
        Ok(posted) => info!(ts = %posted.ts, channel = %posted.channel, "posted message"),
        Err(e) => error!(error = %e, "post message failed"),
    }
    result
}

/// Non-directory entries of `dir` with their file names, sorted by name.
async fn list_files(dir: &Path) -> Result<Vec<(PathBuf, String)>, SendError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| SendError::io(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| SendError::io(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| SendError::io(entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push((entry.path(), name));
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}
