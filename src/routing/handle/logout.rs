use axum::extract::State;
use axum::response::Response;

use crate::net::{cookie, error};
use crate::net::flash::Flash;
use crate::sec::authn::initiator::Initiator;
use crate::sec::authn::session;
use crate::state::ArcShared;
use crate::template;

pub async fn get(
    State(state): State<ArcShared>,
    initiator: Initiator,
) -> error::Result<Response> {
    let conn = state.pool().get().await?;

    initiator.session.delete(&conn).await?;

    state.sec().session_info().cache().invalidate(initiator.token());
    state.chats().remove(initiator.token());

    tracing::info!(user_id = initiator.user().id, "logged out");

    let mut response = template::redirect_with_flash(
        "/",
        Flash::success("Logged out successfully."),
        state.secure()
    )?;
    cookie::append_cookie(&mut response, session::expire_session_cookie(state.sec()))?;

    Ok(response)
}
