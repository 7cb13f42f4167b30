use assist_api::{Payload, Validator};
use assist_api::chat::{
    TranslateMessage,
    Translation,
    TopicQuery,
    Information,
    VerbalizeMessage,
    Verbalization,
};
use axum::extract::State;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::net::error;
use crate::sec::authn::initiator::Initiator;
use crate::state::ArcShared;

pub async fn translate(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<TranslateMessage>,
) -> error::Result<Payload<Translation>> {
    json.validate()?;

    tracing::debug!(user_id = initiator.user().id, target = %json.target, "translate");

    let translation = state.assistant().translate(&json.text, &json.target).await?;

    Ok(Payload::new(Translation { translation }))
}

pub async fn information(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<TopicQuery>,
) -> error::Result<Payload<Information>> {
    json.validate()?;

    tracing::debug!(user_id = initiator.user().id, topic = %json.topic, "topic lookup");

    let summary = state.assistant().get_latest_information(&json.topic).await?;

    Ok(Payload::new(Information { summary }))
}

pub async fn verbalize(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    axum::Json(json): axum::Json<VerbalizeMessage>,
) -> error::Result<Payload<Verbalization>> {
    json.validate()?;

    let spoken = state.assistant().verbalize_emotion(&json.text).await?;

    Ok(Payload::new(Verbalization {
        text: spoken.text,
        audio: STANDARD.encode(spoken.audio),
    }))
}
