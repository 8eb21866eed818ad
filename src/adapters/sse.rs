use crate::utils::error::{PlannerError, Result};
use futures::StreamExt;
use reqwest::RequestBuilder;
use reqwest_eventsource::{Error as EventSourceError, Event, EventSource};

/// Whether to keep reading after a `data` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

/// Opens `request` as a server-sent event stream and hands every `data`
/// payload to `on_data` until the server closes the stream, `on_data` stops,
/// or an error occurs. The source is always closed so it never reconnects.
pub(crate) async fn read_events<F>(
    provider: &str,
    request: RequestBuilder,
    mut on_data: F,
) -> Result<()>
where
    F: FnMut(&str) -> Result<Flow> + Send,
{
    let mut source = EventSource::new(request)
        .map_err(|e| PlannerError::provider(provider, e.to_string()))?;

    let outcome = loop {
        let Some(event) = source.next().await else {
            break Ok(());
        };

        match event {
            Ok(Event::Open) => tracing::debug!("{} stream opened", provider),
            Ok(Event::Message(message)) => {
                tracing::trace!("{} stream event '{}'", provider, message.event);
                match on_data(&message.data) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Stop) => break Ok(()),
                    Err(e) => break Err(e),
                }
            }
            Err(EventSourceError::StreamEnded) => break Ok(()),
            Err(EventSourceError::InvalidStatusCode(status, _)) => {
                break Err(PlannerError::provider(
                    provider,
                    format!("Failed to fetch response ({})", status),
                ));
            }
            Err(EventSourceError::Transport(e)) => break Err(PlannerError::ApiError(e)),
            Err(e) => break Err(PlannerError::provider(provider, e.to_string())),
        }
    };

    source.close();
    outcome
}
