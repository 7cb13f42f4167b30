use assist_api::{Payload, Validator};
use assist_api::chat::ProcessMessage;
use assist_lib::assistant::Reply;
use axum::extract::State;

use crate::net::error;
use crate::sec::authn::initiator::Initiator;
use crate::state::ArcShared;

pub async fn post(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<ProcessMessage>,
) -> error::Result<Payload<Reply>> {
    json.validate()?;

    let mode = json.mode();
    let conversation = state.chats().get_or_create(initiator.token());
    let mut locked = conversation.lock().await;

    let reply = state.assistant().handle_message(
        &mut *locked,
        &json.message,
        initiator.user().consent,
        mode,
    ).await?;

    Ok(Payload::new(reply))
}
