use qrlink_core::{update, AppState, Effect, EncodeFailure, Msg, Phase, QrImage, RenderResult};

fn image(width: u32) -> QrImage {
    QrImage::new(vec![1, 2, 3], width, width)
}

/// Types `text` and lets its timer fire, leaving the encode in flight.
fn dispatch(state: AppState, text: &str) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::InputChanged(text.to_string()));
    let request_id = match effects.last() {
        Some(Effect::ArmDebounce { request_id, .. }) => *request_id,
        other => panic!("expected arm effect, got {other:?}"),
    };
    let (state, _) = update(state, Msg::DebounceElapsed { request_id });
    (state, request_id)
}

#[test]
fn in_flight_result_for_superseded_input_is_dropped() {
    let (state, old_id) = dispatch(AppState::new(), "https://old.example.com");
    let (state, new_id) = dispatch(state, "https://new.example.com");

    // The newer encode returns first.
    let (state, _) = update(
        state,
        Msg::EncodeFinished {
            request_id: new_id,
            result: Ok(image(400)),
        },
    );
    let (state, _) = update(
        state,
        Msg::EncodeFinished {
            request_id: old_id,
            result: Ok(image(200)),
        },
    );

    assert_eq!(state.result(), &RenderResult::Image(image(400)));
}

#[test]
fn editing_while_encoding_does_not_cancel_a_timer() {
    let (state, _old_id) = dispatch(AppState::new(), "first");

    let (state, effects) = update(state, Msg::InputChanged("second".to_string()));

    assert!(matches!(effects.as_slice(), [Effect::ArmDebounce { .. }]));
    assert_eq!(state.view().phase, Phase::AwaitingEncode);
}

#[test]
fn in_flight_result_after_clearing_is_dropped() {
    let (state, request_id) = dispatch(AppState::new(), "pending");
    let (state, effects) = update(state, Msg::InputChanged(String::new()));
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::EncodeFinished {
            request_id,
            result: Err(EncodeFailure::new("late")),
        },
    );

    assert_eq!(state.result(), &RenderResult::Empty);
    assert_eq!(state.view().phase, Phase::Empty);
}

#[test]
fn duplicate_timer_expiry_encodes_once() {
    let (state, request_id) = dispatch(AppState::new(), "once");

    let (state, effects) = update(state, Msg::DebounceElapsed { request_id });

    assert!(effects.is_empty());
    assert_eq!(state.current_request(), Some(request_id));
}

#[test]
fn unknown_request_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::EncodeFinished {
            request_id: 42,
            result: Ok(image(400)),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
