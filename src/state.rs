use std::path::{Path, PathBuf};
use std::sync::Arc;

use assist_lib::assistant::Assistant;
use deadpool_postgres::Pool;

use crate::chat::ChatStore;
use crate::error;
use crate::config;
use crate::template;
use crate::sec;

pub mod db;

pub struct Shared {
    assets: PathBuf,
    pool: Pool,
    templates: template::state::Templates,
    sec: sec::state::Sec,
    assistant: Assistant,
    chats: ChatStore,
}

pub type ArcShared = Arc<Shared>;

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("assets", &self.assets)
            .field("templates", &self.templates)
            .field("sec", &self.sec)
            .field("chats", &self.chats.len())
            .finish_non_exhaustive()
    }
}

impl Shared {
    pub fn from_config(config: &config::Config, assistant: Assistant) -> error::Result<Shared> {
        tracing::debug!("creating Shared state");

        Ok(Shared {
            assets: config.settings.assets.directory.clone(),
            pool: db::from_config(config)?,
            templates: template::state::Templates::from_config(config)?,
            sec: sec::state::Sec::from_config(config)?,
            assistant,
            chats: ChatStore::new(config.settings.assistant.history_limit),
        })
    }

    pub fn assets(&self) -> &Path {
        &self.assets
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn templates(&self) -> &template::state::Templates {
        &self.templates
    }

    pub fn sec(&self) -> &sec::state::Sec {
        &self.sec
    }

    /// whether cookies should carry the secure attribute
    pub fn secure(&self) -> bool {
        self.sec.session_info().secure()
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn chats(&self) -> &ChatStore {
        &self.chats
    }
}

impl AsRef<Pool> for Shared {
    fn as_ref(&self) -> &Pool {
        &self.pool
    }
}

impl AsRef<sec::state::Sec> for Shared {
    fn as_ref(&self) -> &sec::state::Sec {
        &self.sec
    }
}

impl AsRef<template::state::Templates> for Shared {
    fn as_ref(&self) -> &template::state::Templates {
        &self.templates
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    /// shared state over `ASSIST_TEST_DB` with the templates and assets of
    /// this package
    pub async fn test_state() -> ArcShared {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        Arc::new(Shared {
            assets: root.join("static"),
            pool: db::test::test_pool().await,
            templates: template::state::Templates::load(&root.join("templates"), false).unwrap(),
            sec: sec::state::test_sec(),
            assistant: Assistant::builtin().unwrap(),
            chats: ChatStore::new(assist_lib::assistant::conversation::DEFAULT_HISTORY_LIMIT),
        })
    }
}
