use crate::error::Result;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::Stream;
use log::*;
use service::AppState;
use std::convert::Infallible;

/// SSE handler that starts a new stream session for this request.
/// Every tick of the session arrives here as one patch-elements event.
pub(crate) async fn stream_handler(
    State(app_state): State<AppState>,
) -> Result<Sse<impl Stream<Item = core::result::Result<Event, Infallible>>>> {
    let mut rx = app_state.sse_manager.open_session()?;

    // The session ends by dropping its sender; the response body ends with it.
    // If the client goes away first, this stream is dropped together with
    // `rx`, which is what tells the session to stop.
    let stream = stream! {
        while let Some(patch) = rx.recv().await {
            yield Ok::<_, Infallible>(patch.into_event());
        }

        debug!("SSE stream finished");
    };

    Ok(Sse::new(stream))
}
