//! Request handling tests.
//!
//! These tests drive `Reader` the way a chat front-end does:
//! - Concurrent requests sharing one reader
//! - Rejections for bad requests
//! - Commentary after a completed delivery
//! - Follow-up buttons replayed through `handle_action`

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tarot_spread::cards::CardDeck;
use tarot_spread::core::EngineConfig;
use tarot_spread::delivery::{NotificationSink, RecordingSink, SinkEvent};
use tarot_spread::enrich::{build_prompt, EnrichError, NarrativeEnricher, ENRICHMENT_HEADING};
use tarot_spread::error::SpreadError;
use tarot_spread::reader::{Reader, ReaderAction, SpreadRequest};
use tarot_spread::spreads::{ResolvedSpread, SpreadCatalog};
use tokio_util::sync::CancellationToken;

/// Enricher that remembers the prompts it was asked for.
#[derive(Default)]
struct EchoEnricher {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl NarrativeEnricher for EchoEnricher {
    async fn interpret(
        &self,
        spread: &ResolvedSpread,
        question: Option<&str>,
    ) -> Result<String, EnrichError> {
        self.prompts.lock().push(build_prompt(spread, question));
        Ok(format!("{} cards considered.", spread.len()))
    }
}

fn reader(config: EngineConfig) -> Reader {
    Reader::new(
        Arc::new(CardDeck::standard()),
        Arc::new(SpreadCatalog::builtin()),
        config,
    )
    .unwrap()
}

/// Several chats served at once each get a complete, independent reading.
#[tokio::test(start_paused = true)]
async fn test_concurrent_requests() {
    let reader = Arc::new(reader(EngineConfig::default().with_seed(8)));

    let handles: Vec<_> = ["one-card", "three-card", "ten-card", "love"]
        .into_iter()
        .map(|layout| {
            let reader = reader.clone();
            tokio::spawn(async move {
                let sink = Arc::new(RecordingSink::new());
                let report = reader
                    .handle(&SpreadRequest::new(layout), sink.clone(), CancellationToken::new())
                    .await
                    .unwrap();
                (report, sink.events().iter().filter(|e| e.is_image()).count())
            })
        })
        .collect();

    let expected_images = [1, 3, 10, 5];
    for (handle, expected) in handles.into_iter().zip(expected_images) {
        let (report, images) = handle.await.unwrap();
        assert!(report.completed);
        assert_eq!(images, expected);
    }
}

/// A request the deck cannot satisfy is rejected with a message.
#[tokio::test]
async fn test_oversized_layout_rejected() {
    let deck = CardDeck::from_records(vec![
        tarot_spread::CardRecord::new("The_Fool", tarot_spread::Arcana::Major),
        tarot_spread::CardRecord::new("The_Magician", tarot_spread::Arcana::Major),
    ])
    .unwrap();
    let reader = Reader::new(
        Arc::new(deck),
        Arc::new(SpreadCatalog::builtin()),
        EngineConfig::default().without_delays(),
    )
    .unwrap();
    let sink = Arc::new(RecordingSink::new());

    let err = reader
        .handle(&SpreadRequest::new("three-card"), sink.clone(), CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, SpreadError::InvalidArgument { requested: 3, available: 2 });
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].text().contains("Cannot draw 3 cards"));
}

/// Commentary is requested with the user's question and sent last.
#[tokio::test(start_paused = true)]
async fn test_enrichment_sent_after_delivery() {
    let enricher = Arc::new(EchoEnricher::default());
    let reader = reader(EngineConfig::default().with_seed(4)).with_enricher(enricher.clone());
    let sink = Arc::new(RecordingSink::new());

    let request = SpreadRequest::new("three-card")
        .with_question("Will the move go well?")
        .with_enrichment(true);
    let report = reader
        .handle(&request, sink.clone() as Arc<dyn NotificationSink>, CancellationToken::new())
        .await
        .unwrap();
    assert!(report.completed);

    let prompts = enricher.prompts.lock().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Will the move go well?"));

    let events = sink.events();
    let last = events.last().unwrap().text();
    assert!(last.starts_with(ENRICHMENT_HEADING));
    assert!(last.contains("3 cards considered."));
}

/// Commentary is skipped when delivery did not finish.
#[tokio::test(start_paused = true)]
async fn test_no_enrichment_after_dead_session() {
    let enricher = Arc::new(EchoEnricher::default());
    let reader = reader(EngineConfig::default()).with_enricher(enricher.clone());
    let sink = Arc::new(RecordingSink::new().fail_text_when(|t| t.starts_with("🎴 *2.")));

    let request = SpreadRequest::new("three-card").with_enrichment(true);
    let report = reader
        .handle(&request, sink.clone(), CancellationToken::new())
        .await
        .unwrap();

    assert!(!report.completed);
    assert!(enricher.prompts.lock().is_empty());
}

/// The interpretation button on a delivered spread rebuilds that same
/// spread, so the commentary covers the cards the user actually saw.
#[tokio::test(start_paused = true)]
async fn test_interpret_button_replays_delivered_spread() {
    let enricher = Arc::new(EchoEnricher::default());
    let first = reader(EngineConfig::default()).with_enricher(enricher.clone());
    let sink = Arc::new(RecordingSink::new());

    let request = SpreadRequest::new("ten-card").with_enrichment(true);
    first
        .handle(&request, sink.clone(), CancellationToken::new())
        .await
        .unwrap();

    let events = sink.events();
    let controls = events
        .iter()
        .rev()
        .find_map(|e| match e {
            SinkEvent::Text { controls: Some(c), .. } => Some(c.clone()),
            _ => None,
        })
        .unwrap();
    let payload = controls
        .0
        .iter()
        .map(|c| c.action.as_str())
        .find(|a| a.starts_with("interpret:"))
        .unwrap();

    // A second chat pressing the button, served by a fresh reader.
    let other = reader(EngineConfig::default()).with_enricher(enricher.clone());
    let replay_sink = Arc::new(RecordingSink::new());
    let action = ReaderAction::parse(payload).unwrap();
    let report = other
        .handle_action(&action, replay_sink.clone(), CancellationToken::new())
        .await
        .unwrap();
    assert!(report.is_none());

    let prompts = enricher.prompts.lock().clone();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);

    let replayed = replay_sink.events();
    assert_eq!(replayed.len(), 1);
    assert!(replayed[0].text().starts_with(ENRICHMENT_HEADING));
}

/// Every button the reader hands out parses back into an action it serves.
#[tokio::test(start_paused = true)]
async fn test_menu_and_help_buttons() {
    let reader = reader(EngineConfig::default().with_seed(1));

    for payload in ["new_spread", "help"] {
        let sink = Arc::new(RecordingSink::new());
        let action = ReaderAction::parse(payload).unwrap();
        let report = reader
            .handle_action(&action, sink.clone(), CancellationToken::new())
            .await
            .unwrap();
        assert!(report.is_none());

        let events = sink.events();
        let SinkEvent::Text { controls: Some(controls), .. } = &events[0] else {
            panic!("{payload} should answer with the layout menu");
        };
        for control in &controls.0 {
            assert!(matches!(
                ReaderAction::parse(&control.action),
                Some(ReaderAction::Spread(_))
            ));
        }
    }
}
