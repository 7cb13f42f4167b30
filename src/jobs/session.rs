use crate::chat::ChatStore;
use crate::state;
use crate::error::{self, Context};
use crate::sec::authn::session::{Session, SessionCache, SessionToken};

/// drops any cached lookups and conversations still held for the given
/// sessions
fn evict(cache: &SessionCache, chats: &ChatStore, tokens: &[SessionToken]) -> usize {
    let mut conversations = 0;

    for token in tokens {
        cache.invalidate(token);

        if chats.remove(token) {
            conversations += 1;
        }
    }

    conversations
}

pub async fn cleanup(state: state::ArcShared) -> error::Result<()> {
    let now = chrono::Utc::now();
    let conn = state.pool().get().await?;

    let tokens = Session::delete_expired(&conn, &now)
        .await
        .context("failed to delete expired sessions")?;

    let conversations = evict(
        state.sec().session_info().cache(),
        state.chats(),
        &tokens
    );

    tracing::info!("dropped {} sessions and {conversations} conversations", tokens.len());

    Ok(())
}
