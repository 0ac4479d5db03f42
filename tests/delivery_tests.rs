//! End-to-end delivery scenarios.
//!
//! These tests run the sequencer against a recording sink on paused time:
//! - A complete single-card reading
//! - Image fallback for one card of a ten-card reading
//! - A session that dies in the middle of the reveals
//! - Compact delivery split across several messages
//! - Card blocks and headers kept whole at the smallest valid message limit

use std::sync::Arc;
use std::time::Duration;

use tarot_spread::cards::CardDeck;
use tarot_spread::core::{DeliveryMode, DrawRng, EngineConfig};
use tarot_spread::delivery::{
    Controls, DeliverySequencer, DeliveryState, RecordingSink, SinkEvent,
};
use tarot_spread::error::SpreadError;
use tarot_spread::spreads::{
    max_position_label_chars, ResolvedSpread, SpreadBuilder, SpreadCatalog, SpreadLayout,
};
use tokio_util::sync::CancellationToken;

fn build(layout: &str, config: &EngineConfig, seed: u64) -> ResolvedSpread {
    SpreadBuilder::new(
        Arc::new(CardDeck::standard()),
        Arc::new(SpreadCatalog::builtin()),
        config,
    )
    .build(&mut DrawRng::new(seed), layout)
    .unwrap()
}

/// Split recorded events into the per-card reveal groups that follow the
/// announcement and its three shuffling edits.
fn reveal_events(events: &[SinkEvent]) -> &[SinkEvent] {
    &events[4..]
}

/// A one-card reading walks every state and ends in Done.
#[tokio::test(start_paused = true)]
async fn test_one_card_reading_completes() {
    let config = EngineConfig::default();
    let spread = build("one-card", &config, 1);
    let sink = Arc::new(RecordingSink::new());

    let report = DeliverySequencer::new(sink.clone(), &config).run(&spread).await;

    assert!(report.completed);
    assert_eq!(report.last_state, DeliveryState::Done);

    let events = sink.events();
    assert!(matches!(events[0], SinkEvent::Text { .. }));
    assert!(events[0].text().contains(&spread.name));
    for edit in &events[1..4] {
        assert!(matches!(edit, SinkEvent::Edit { .. }));
    }

    let reveal = reveal_events(&events);
    assert!(reveal[0].text().starts_with("🎴 *1. General advice*"));
    match &reveal[1] {
        SinkEvent::Image { image, caption, .. } => {
            assert_eq!(Some(image), spread.cards()[0].image.as_ref());
            assert_eq!(caption, &spread.cards()[0].interpretation);
        }
        other => panic!("expected image, got {other:?}"),
    }

    let SinkEvent::Text { controls, .. } = &reveal[2] else {
        panic!("expected summary text");
    };
    assert_eq!(controls.as_ref(), Some(&Controls::after_spread(&spread)));
    assert_eq!(reveal.len(), 3);
}

/// When the image of card 4 cannot be sent, that card arrives as text and
/// every other card still arrives as an image.
#[tokio::test(start_paused = true)]
async fn test_image_failure_falls_back_to_text() {
    let config = EngineConfig::default();
    let spread = build("ten-card", &config, 17);
    let broken = spread.cards()[3].image.clone().unwrap();

    let sink = Arc::new(RecordingSink::new().fail_image_when(move |image| image == &broken));
    let report = DeliverySequencer::new(sink.clone(), &config).run(&spread).await;

    assert!(report.completed);
    assert_eq!(report.fallback_cards, vec![4]);

    let events = sink.events();
    let reveal = reveal_events(&events);
    // label + body for each of the 10 cards, then the summary.
    assert_eq!(reveal.len(), 21);

    for (i, pair) in reveal[..20].chunks(2).enumerate() {
        let card = &spread.cards()[i];
        assert!(pair[0].text().starts_with(&format!("🎴 *{}. {}*", i + 1, card.position)));
        assert_eq!(pair[1].text(), card.interpretation);
        if i == 3 {
            assert!(matches!(pair[1], SinkEvent::Text { .. }));
        } else {
            assert!(pair[1].is_image(), "card {} should be an image", i + 1);
        }
    }
}

/// The session dies when the label of card 3 is sent: nothing after that
/// point is delivered and nothing before it is retracted.
#[tokio::test(start_paused = true)]
async fn test_dead_session_stops_delivery() {
    let config = EngineConfig::default();
    let spread = build("ten-card", &config, 5);
    let sink = Arc::new(RecordingSink::new().fail_text_when(|text| text.starts_with("🎴 *3.")));

    let report = DeliverySequencer::new(sink.clone(), &config).run(&spread).await;

    assert!(!report.completed);
    assert_eq!(report.last_state, DeliveryState::RevealingCard(3));

    let events = sink.events();
    let reveal = reveal_events(&events);
    assert_eq!(reveal.len(), 4);
    assert!(reveal[0].text().starts_with("🎴 *1."));
    assert!(reveal[2].text().starts_with("🎴 *2."));
    assert!(events.iter().all(|e| !e.text().contains("is complete")));
    assert_eq!(report.actions_emitted, events.len());
}

/// Cancelling mid-run stops at the next suspension point.
#[tokio::test(start_paused = true)]
async fn test_cancellation_during_reveals() {
    let config = EngineConfig::default();
    let spread = build("ten-card", &config, 9);
    let sink = Arc::new(RecordingSink::new());
    let cancel = CancellationToken::new();

    let sequencer = DeliverySequencer::new(sink.clone(), &config).with_cancellation(cancel.clone());
    let run = tokio::spawn(async move { sequencer.run(&spread).await });

    // Announcing + shuffling take 4 x 1.5 s; two reveals take 2 s each.
    tokio::time::sleep(Duration::from_millis(6000 + 3000)).await;
    cancel.cancel();
    let report = run.await.unwrap();

    assert!(!report.completed);
    assert_eq!(report.last_state, DeliveryState::RevealingCard(2));
    let labels = sink
        .events()
        .iter()
        .filter(|e| e.text().starts_with("🎴"))
        .count();
    assert_eq!(labels, 2);
}

/// Compact delivery with a small message limit sends ordered parts that
/// rebuild the full spread text.
#[tokio::test(start_paused = true)]
async fn test_compact_delivery_splits_long_text() {
    let config = EngineConfig::default()
        .with_delivery_mode(DeliveryMode::Compact)
        .with_interpretation_max_chars(200)
        .with_message_limit(400);
    assert!(config.validate().is_ok());

    let spread = build("year-ahead", &config, 3);
    let sink = Arc::new(RecordingSink::new());
    let report = DeliverySequencer::new(sink.clone(), &config).run(&spread).await;

    assert!(report.completed);
    assert!(report.fallback_cards.is_empty());

    let events = sink.events();
    let parts = reveal_events(&events);
    assert!(parts.len() >= 3);

    let mut joined = String::new();
    for (i, part) in parts.iter().enumerate() {
        let SinkEvent::Text { text, controls, .. } = part else {
            panic!("compact delivery sends text only");
        };
        assert!(!text.is_empty());
        assert!(text.chars().count() <= 400);
        assert_eq!(controls.is_some(), i == parts.len() - 1);
        joined.push_str(text);
    }
    assert_eq!(joined, spread.render_text());

    // No card block is broken across parts.
    for i in 0..spread.len() {
        let block = spread.card_block(i);
        assert!(parts.iter().any(|p| p.text().contains(&block)));
    }
}

/// The smallest message limit a config accepts still holds every card
/// block whole, even with position labels as long as a layout may have.
#[tokio::test(start_paused = true)]
async fn test_longest_labels_fit_smallest_limit() {
    let config = EngineConfig::default()
        .with_delivery_mode(DeliveryMode::Compact)
        .with_interpretation_max_chars(100)
        .with_message_limit(199);
    assert!(config.validate().is_ok());

    let label = "l".repeat(max_position_label_chars(3));
    let mut catalog = SpreadCatalog::new();
    catalog
        .register(SpreadLayout::new("wide", "Wide", [&label, &label, &label]))
        .unwrap();

    // Anything longer is refused up front.
    let too_long = "l".repeat(150);
    let err = catalog
        .register(SpreadLayout::new("wider", "Wider", [too_long.as_str(), "B", "C"]))
        .unwrap_err();
    assert!(matches!(err, SpreadError::InvalidConfig(_)));

    let long_text = "The road bends again and again. ".repeat(50);
    let records = (0..3)
        .map(|i| {
            tarot_spread::CardRecord::new(format!("Card_{i}"), tarot_spread::Arcana::Minor)
                .with_meanings(long_text.clone(), long_text.clone())
        })
        .collect();
    let deck = CardDeck::from_records(records).unwrap();
    let spread = SpreadBuilder::new(Arc::new(deck), Arc::new(catalog), &config)
        .build(&mut DrawRng::new(11), "wide")
        .unwrap();

    let sink = Arc::new(RecordingSink::new());
    DeliverySequencer::new(sink.clone(), &config).run(&spread).await;

    let events = sink.events();
    let parts = reveal_events(&events);
    for i in 0..spread.len() {
        let block = spread.card_block(i);
        assert!(block.chars().count() <= 199);
        assert!(parts.iter().any(|p| p.text().contains(&block)), "block {i} was cut");
    }
}

/// A very long question is shortened so the header still arrives whole.
#[tokio::test(start_paused = true)]
async fn test_long_question_keeps_header_whole() {
    let config = EngineConfig::default()
        .with_delivery_mode(DeliveryMode::Compact)
        .with_interpretation_max_chars(100)
        .with_message_limit(300);
    let question = "Is this the right time to change everything? ".repeat(40);

    let spread = SpreadBuilder::new(
        Arc::new(CardDeck::standard()),
        Arc::new(SpreadCatalog::builtin()),
        &config,
    )
    .build_for(&mut DrawRng::new(2), "three-card", Some(&question))
    .unwrap();

    let sink = Arc::new(RecordingSink::new());
    DeliverySequencer::new(sink.clone(), &config).run(&spread).await;

    let events = sink.events();
    let parts = reveal_events(&events);
    let header = spread.header_block();
    assert!(header.chars().count() <= 300);
    assert!(parts[0].text().starts_with(&header));
    assert!(parts.iter().all(|p| p.text().chars().count() <= 300));
}
