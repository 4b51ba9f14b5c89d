use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;

use crate::encoding::encode_animation_use_case::EncodeAnimationUseCase;
use crate::encoding::encode_config::EncodeConfig;
use crate::encoding::encode_request::EncodeRequest;
use crate::encoding::encode_result::{EncodeError, EncodeResult};

/// Encodes `request` on the calling thread with the default wiring.
pub fn encode(request: &EncodeRequest) -> EncodeResult {
    EncodeAnimationUseCase::from_config(&EncodeConfig::default(), None).execute(request)
}

/// Runs the encode on a background thread. The receiver yields exactly
/// one result.
pub fn spawn(use_case: EncodeAnimationUseCase, request: EncodeRequest) -> Receiver<EncodeResult> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    spawn_with_callback(use_case, request, move |result| {
        // Caller may have dropped the receiver.
        let _ = tx.send(result);
    });
    rx
}

/// Runs the encode on a background thread and hands the result to
/// `on_complete` exactly once, from that thread.
///
/// A panic inside the encode is reported as [`EncodeError::Aborted`].
pub fn spawn_with_callback<F>(
    mut use_case: EncodeAnimationUseCase,
    request: EncodeRequest,
    on_complete: F,
) -> JoinHandle<()>
where
    F: FnOnce(EncodeResult) + Send + 'static,
{
    std::thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| use_case.execute(&request)))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                log::error!("Encode worker panicked: {message}");
                Err(EncodeError::Aborted(message))
            });
        on_complete(result);
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
