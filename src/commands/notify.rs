// src/commands/notify.rs
use std::ffi::OsStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Serialize;

use crate::data_struct::{Config, CreatorEntry};
use crate::error::NotifyError;

/// Discord rejects embed field values longer than this.
pub const FIELD_VALUE_LIMIT: usize = 1024;
const FENCE_LEN: usize = "```\n```".len();

const SUCCESS_COLOR: u32 = 0xa600ff;
const ERROR_COLOR: u32 = 0xff0000;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookPayload {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub footer: EmbedFooter,
}

#[cfg(test)]
impl Embed {
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

/// Delivers one payload to the chat channel.
pub trait WebhookTransport {
    fn send(&self, payload: &WebhookPayload) -> Result<(), NotifyError>;
}

/// POSTs payloads as JSON to a webhook URL.
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl WebhookTransport for HttpTransport {
    fn send(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        self.client
            .post(&self.url)
            .json(payload)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

fn render_preview(shown: &[String], total: usize) -> String {
    let mut lines = shown.to_vec();
    if total > shown.len() {
        lines.push(format!("+{} more...", total - shown.len()));
    }
    lines.join("\n")
}

/// Last `limit` names, one per line, with a `+K more...` line when cut.
/// Drops further names while the code block would exceed a field value.
pub fn preview<T: AsRef<OsStr>>(files: &[T], limit: usize) -> String {
    let names: Vec<String> = files
        .iter()
        .map(|f| f.as_ref().to_string_lossy().into_owned())
        .collect();
    let budget = FIELD_VALUE_LIMIT - FENCE_LEN;

    let mut shown = names.len().min(limit);
    loop {
        let text = render_preview(&names[names.len() - shown..], names.len());
        if shown == 0 || text.chars().count() <= budget {
            return text;
        }
        shown -= 1;
    }
}

/// Cut `text` to `budget` characters, marking the cut with an ellipsis.
fn clip(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut out: String = text.chars().take(budget.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn code_block(text: &str) -> String {
    format!("```\n{text}```")
}

pub fn footer_text() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub struct Notifier<'a> {
    transport: &'a dyn WebhookTransport,
    username: String,
    avatar_url: String,
    preview_limit: usize,
}

impl<'a> Notifier<'a> {
    pub fn new(transport: &'a dyn WebhookTransport, config: &Config) -> Self {
        Self {
            transport,
            username: config.username.clone(),
            avatar_url: config.avatar_url.clone(),
            preview_limit: config.preview_limit,
        }
    }

    pub fn success_embed<T: AsRef<OsStr>>(
        &self,
        creator: &CreatorEntry,
        new_files: &[T],
        archive_url: Option<&str>,
    ) -> Embed {
        let mut fields = vec![EmbedField::new(
            "Overview",
            code_block(&preview(new_files, self.preview_limit)),
        )];

        if let Some(url) = archive_url {
            fields.push(EmbedField::new(
                "Download latest file(s)",
                format!("[Archive (zip)]({url})"),
            ));
        }

        Embed {
            title: "New Fanbox Images".to_string(),
            description: format!("from {} downloaded successfully!", creator.name),
            author: Some(EmbedAuthor {
                name: creator.name.clone(),
                icon_url: creator.logo.clone(),
                url: creator.url.clone(),
            }),
            fields,
            image: Some(EmbedImage {
                url: creator.banner.clone(),
            }),
            color: SUCCESS_COLOR,
            timestamp: Utc::now(),
            footer: EmbedFooter {
                text: footer_text(),
            },
        }
    }

    /// `message` goes out verbatim; redact it before calling.
    pub fn error_embed(&self, creator: &CreatorEntry, message: &str) -> Embed {
        Embed {
            title: "Download Error".to_string(),
            description: format!("when downloading images from {}", creator.name),
            author: None,
            fields: vec![EmbedField::new(
                "Overview",
                code_block(&clip(message, FIELD_VALUE_LIMIT - FENCE_LEN)),
            )],
            image: None,
            color: ERROR_COLOR,
            timestamp: Utc::now(),
            footer: EmbedFooter {
                text: footer_text(),
            },
        }
    }

    fn deliver(&self, embed: Embed) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            embeds: vec![embed],
        };
        self.transport.send(&payload)
    }

    pub fn notify_success<T: AsRef<OsStr>>(
        &self,
        creator: &CreatorEntry,
        new_files: &[T],
        archive_url: Option<&str>,
    ) -> Result<(), NotifyError> {
        self.deliver(self.success_embed(creator, new_files, archive_url))
    }

    pub fn notify_error(&self, creator: &CreatorEntry, message: &str) -> Result<(), NotifyError> {
        self.deliver(self.error_embed(creator, message))
    }
}
