use crate::state::RequestStage;
use crate::{AppState, Effect, Msg, RenderResult, ENCODE_FAILED_MESSAGE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_torn_down() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::InputChanged(text) => {
            let mut effects = Vec::with_capacity(2);
            // An encode already in flight cannot be cancelled; dropping the
            // pending request is enough to make its result stale.
            if let Some(previous) = state.take_pending() {
                if previous.stage == RequestStage::Debouncing {
                    effects.push(Effect::CancelDebounce);
                }
            }

            if text.is_empty() {
                state.set_input(text);
                state.set_result(RenderResult::Empty);
            } else {
                let request_id = state.begin_request(text.clone());
                state.set_input(text);
                effects.push(Effect::ArmDebounce {
                    request_id,
                    delay: state.settings().debounce,
                });
            }
            effects
        }
        Msg::DebounceElapsed { request_id } => match state.start_encoding(request_id) {
            Some(payload) => vec![Effect::Encode {
                request_id,
                payload,
            }],
            None => Vec::new(),
        },
        Msg::EncodeFinished { request_id, result } => {
            if state.finish_encoding(request_id) {
                let result = match result {
                    Ok(image) => RenderResult::Image(image),
                    Err(_failure) => RenderResult::Error(ENCODE_FAILED_MESSAGE.to_string()),
                };
                state.set_result(result);
            }
            Vec::new()
        }
        Msg::DownloadClicked => match state.result() {
            RenderResult::Image(image) => vec![Effect::SaveImage {
                image: image.clone(),
                filename: state.settings().filename.clone(),
            }],
            RenderResult::Empty | RenderResult::Error(_) => Vec::new(),
        },
        Msg::Teardown => {
            let was_debouncing = state
                .pending()
                .is_some_and(|pending| pending.stage == RequestStage::Debouncing);
            state.tear_down();
            if was_debouncing {
                vec![Effect::CancelDebounce]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}
