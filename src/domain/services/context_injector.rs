#[cfg(test)]
#[path = "context_injector_test.rs"]
mod tests;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::history_window;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::SummaryRequest;
use crate::domain::models::SummaryServiceBox;
use crate::domain::models::HISTORY_WINDOW;

pub const SUMMARY_DELAY: Duration = Duration::from_millis(400);

/// Turns "user viewed a property" into chat traffic: opens the chat, asks the
/// summary service about the property, then emits the hidden context and the
/// visible summary as events for the chat host to append.
pub struct PropertyContextInjector {
    service: SummaryServiceBox,
    tx: mpsc::UnboundedSender<Event>,
    generation: u64,
}

impl PropertyContextInjector {
    pub fn new(service: SummaryServiceBox, tx: mpsc::UnboundedSender<Event>) -> Self {
        return PropertyContextInjector {
            service,
            tx,
            generation: 0,
        };
    }

    /// Fire and forget. Each call is independent of earlier ones that may
    /// still be in flight.
    pub fn notify_property_view(&mut self, property_id: &str, messages: &[Message]) -> JoinHandle<()> {
        self.generation += 1;
        let generation = self.generation;

        if self.tx.send(Event::ChatOpen()).is_err() {
            tracing::debug!(generation, "chat host is gone, dropping open request");
        }

        let request = SummaryRequest {
            property_id: property_id.to_string(),
            history: history_window(messages, HISTORY_WINDOW),
        };
        let service = self.service.clone();
        let tx = self.tx.clone();

        return tokio::spawn(async move {
            return inject(service, tx, generation, request).await;
        });
    }
}

async fn inject(
    service: SummaryServiceBox,
    tx: mpsc::UnboundedSender<Event>,
    generation: u64,
    request: SummaryRequest,
) {
    let property_id = request.property_id.to_string();
    tracing::debug!(
        generation,
        property_id,
        history = request.history.len(),
        "requesting property summary"
    );

    let res = match service.summarize(request).await {
        Ok(res) => res,
        Err(err) => {
            tracing::error!(generation, property_id, error = ?err, "failed to fetch property summary");
            return;
        }
    };

    if let Some(property) = res.property {
        if tx.send(Event::MarkContext(generation, property)).is_err() {
            tracing::debug!(generation, "chat host is gone, dropping property context");
            return;
        }
    }

    let summary = match res.summary {
        Some(summary) if !summary.is_empty() => summary,
        _ => return,
    };

    tokio::time::sleep(SUMMARY_DELAY).await;
    if tx.send(Event::MarkSummary(generation, summary)).is_err() {
        tracing::debug!(generation, "chat host is gone, dropping property summary");
    }
}
