use std::{env, fs, io, path::Path};

use serde::Deserialize;
use tracing::Level;

use crate::{
    domain::{ChannelId, GroupId, GroupTarget, RecipientId},
    errors::Error,
    relay::layout::DEFAULT_PATTERN,
    Result,
};

/// Where a relay sink forwards records.
///
/// A zero id disables its destination; both group ids must be non-zero for the group
/// destination to be active.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Session to send through. Unset means "any connected session".
    pub session: Option<String>,
    pub group_id: i64,
    pub channel_id: i64,
    pub recipient_id: i64,
}

impl TargetConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_env() -> Self {
        Self {
            session: env_str("LOG_RELAY_SESSION").and_then(non_empty),
            group_id: env_i64("LOG_RELAY_GROUP_ID").unwrap_or(0),
            channel_id: env_i64("LOG_RELAY_CHANNEL_ID").unwrap_or(0),
            recipient_id: env_i64("LOG_RELAY_RECIPIENT_ID").unwrap_or(0),
        }
    }

    pub fn session_name(&self) -> Option<&str> {
        self.session.as_deref().filter(|s| !s.is_empty())
    }

    pub fn group_target(&self) -> Option<GroupTarget> {
        if self.group_id == 0 || self.channel_id == 0 {
            return None;
        }
        Some(GroupTarget {
            group: GroupId(self.group_id),
            channel: ChannelId(self.channel_id),
        })
    }

    pub fn direct_target(&self) -> Option<RecipientId> {
        (self.recipient_id != 0).then_some(RecipientId(self.recipient_id))
    }

    pub fn is_active(&self) -> bool {
        self.group_target().is_some() || self.direct_target().is_some()
    }
}

/// A named bot account to register as a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotAccount {
    pub name: String,
    pub token: String,
}

/// Typed configuration of the `logrelay` binary.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub bots: Vec<BotAccount>,
    pub targets: TargetConfig,
    pub layout: String,
    /// Most verbose level forwarded to chat.
    pub level: Level,
}

impl RelayConfig {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"))?;

        let bots = match env_str("TELEGRAM_BOT_TOKENS").and_then(non_empty) {
            Some(raw) => parse_bot_accounts(&raw)?,
            None => env_str("TELEGRAM_BOT_TOKEN")
                .and_then(non_empty)
                .map(|token| {
                    vec![BotAccount {
                        name: "main".to_string(),
                        token: token.trim().to_string(),
                    }]
                })
                .unwrap_or_default(),
        };
        if bots.is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKENS or TELEGRAM_BOT_TOKEN environment variable is required"
                    .to_string(),
            ));
        }

        let targets = TargetConfig::from_env();

        let layout = env_str("LOG_RELAY_LAYOUT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_PATTERN.to_string());

        let level = match env_str("LOG_RELAY_LEVEL").and_then(non_empty) {
            Some(raw) => raw
                .trim()
                .parse::<Level>()
                .map_err(|_| Error::Config(format!("invalid LOG_RELAY_LEVEL: {raw}")))?,
            None => Level::INFO,
        };

        Ok(Self {
            bots,
            targets,
            layout,
            level,
        })
    }
}

/// Parse `name=token,name2=token2`.
fn parse_bot_accounts(raw: &str) -> Result<Vec<BotAccount>> {
    let mut out: Vec<BotAccount> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((name, token)) = entry.split_once('=') else {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKENS entries must be name=token".to_string(),
            ));
        };
        let (name, token) = (name.trim(), token.trim());
        if name.is_empty() || token.is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKENS entry has an empty name or token".to_string(),
            ));
        }
        if out.iter().any(|b| b.name == name) {
            return Err(Error::Config(format!("duplicate bot name: {name}")));
        }
        out.push(BotAccount {
            name: name.to_string(),
            token: token.to_string(),
        });
    }
    Ok(out)
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_i64(key: &str) -> Option<i64> {
    env_str(key).and_then(|s| s.trim().parse::<i64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) -> Result<()> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, strip_quotes(v.trim()));
    }
    Ok(())
}

fn strip_quotes(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}
