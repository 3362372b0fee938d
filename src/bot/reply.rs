//! Outbound message model.
//!
//! Transport-neutral: a platform adapter maps `Reply` onto its own send
//! call and `Button` rows onto an inline keyboard.

use crate::bot::Callback;

/// An inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, callback: &Callback) -> Self {
        Self {
            label: label.into(),
            data: callback.data(),
        }
    }
}

/// A message to send back to the chat, in HTML parse mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,

    /// Inline keyboard rows
    pub buttons: Vec<Vec<Button>>,

    /// Suppress link previews
    pub disable_preview: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
            disable_preview: false,
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Vec<Button>>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn without_preview(mut self) -> Self {
        self.disable_preview = true;
        self
    }
}

/// Response to a button press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackAnswer {
    /// Short toast shown by the client
    pub notice: Option<String>,
    pub replies: Vec<Reply>,
}

impl CallbackAnswer {
    pub fn notice(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
            replies: Vec::new(),
        }
    }

    pub fn with_replies(mut self, replies: Vec<Reply>) -> Self {
        self.replies = replies;
        self
    }
}
