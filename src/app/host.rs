//! Line protocol between the orchestrator and whatever hosts it.
//!
//! Commands arrive one per line on stdin; frames leave as one JSON object per
//! line on stdout.

use std::str::FromStr;

use anyhow::{Context, bail};
use serde::Serialize;

use crate::domain::scene::SceneDescriptor;

use super::flash::FlashState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Refresh,
    Resize(u32),
    Reload,
    Quit,
}

impl FromStr for HostCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();
        let command = match command.as_str() {
            "refresh" => Self::Refresh,
            "reload" => Self::Reload,
            "quit" | "exit" => Self::Quit,
            "resize" => {
                let raw = parts.next().context("resize needs a pixel width")?;
                let width: u32 = raw
                    .parse()
                    .with_context(|| format!("invalid width {raw:?}"))?;
                if width == 0 {
                    bail!("width must be positive");
                }
                Self::Resize(width)
            }
            "" => bail!("empty command"),
            other => bail!("unknown command {other:?}"),
        };
        if let Some(extra) = parts.next() {
            bail!("unexpected argument {extra:?}");
        }
        Ok(command)
    }
}

/// Everything the render layer is told, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostFrame {
    Scene(SceneDescriptor),
    #[serde(rename_all = "camelCase")]
    Flash { state: FlashState, generation: u64 },
}

impl HostFrame {
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
