//! Typed transfer descriptors decoded from peer-messaging payloads.
//!
//! A transfer arrives as a string type tag plus a `content` value whose
//! shape depends on the tag. [`classify`] maps the tag against a closed set
//! and decodes the content; an unrecognized tag or a shape mismatch is an
//! error, never a guess.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransferError;

/// Which side of the connection constructed a transfer event.
///
/// Set by the constructing side, never inferred from payload content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Constructed on this device.
    Local,
    /// Constructed by the peer.
    Peer,
}

/// The kind of an incoming transfer, matching the wire type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// A plain text message.
    TextMessage,
    /// An offer to transfer one or more files.
    PrepareFileTransfer,
}

impl TransferKind {
    /// The wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextMessage => "TextMessage",
            Self::PrepareFileTransfer => "PrepareFileTransfer",
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferKind {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TextMessage" => Ok(Self::TextMessage),
            "PrepareFileTransfer" => Ok(Self::PrepareFileTransfer),
            other => Err(TransferError::UnknownTransferType(other.to_string())),
        }
    }
}

/// The file list carried by a `PrepareFileTransfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifest {
    /// Optional text accompanying the files.
    #[serde(default)]
    pub text: Option<String>,
    /// The offered file paths, in the order the sender listed them.
    pub paths: Vec<String>,
}

/// Typed display content of a transfer, matching its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferPayload {
    /// Content of a [`TransferKind::TextMessage`].
    Text(String),
    /// Content of a [`TransferKind::PrepareFileTransfer`].
    Files(FileManifest),
}

/// A discrete unit of exchange with a peer, ready for display.
///
/// Immutable once constructed; handed to the presentation layer, never
/// stored in the connection registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// The decoded kind.
    pub kind: TransferKind,
    /// The decoded content, shape matching `kind`.
    pub payload: TransferPayload,
    /// Which side constructed the event.
    pub origin: Origin,
}

/// Decode an incoming transfer descriptor into a typed [`TransferEvent`].
///
/// `wire_tag` must match one of the known kinds exactly; anything else is
/// [`TransferError::UnknownTransferType`]. `content` is then decoded per
/// kind: a JSON string for `TextMessage`, a [`FileManifest`] object for
/// `PrepareFileTransfer`. A tag/shape mismatch is
/// [`TransferError::PayloadMismatch`].
pub fn classify(
    wire_tag: &str,
    content: &serde_json::Value,
    origin: Origin,
) -> Result<TransferEvent, TransferError> {
    let kind = TransferKind::from_str(wire_tag)?;
    let payload = match kind {
        TransferKind::TextMessage => {
            let text = content
                .as_str()
                .ok_or_else(|| TransferError::PayloadMismatch {
                    kind: kind.as_str(),
                    detail: format!("expected a string, got {content}"),
                })?;
            TransferPayload::Text(text.to_string())
        }
        TransferKind::PrepareFileTransfer => {
            let manifest: FileManifest = serde_json::from_value(content.clone()).map_err(|e| {
                TransferError::PayloadMismatch {
                    kind: kind.as_str(),
                    detail: e.to_string(),
                }
            })?;
            TransferPayload::Files(manifest)
        }
    };
    Ok(TransferEvent {
        kind,
        payload,
        origin,
    })
}
