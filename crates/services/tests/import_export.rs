use std::collections::HashMap;

use services::{AppConfig, AppState};
use storage::repository::Storage;
use topik_core::model::{QuestionBank, ReplacePolicy};
use topik_core::time::fixed_clock;
use topik_core::transfer::parse_import;

const BATCH_A: &str = r#"{
    "topik1": { "2024": { "reading": [
        { "id": "2024-r1-1", "year": "2024", "type": "reading", "level": "topik1",
          "part": 1, "question": "A1", "options": ["a", "b", "c", "d"], "answer": 0 }
    ] } }
}"#;

const BATCH_B: &str = r#"{
    "topik1": { "2024": { "reading": [
        { "id": "2024-r1-2", "year": "2024", "type": "reading", "level": "topik1",
          "part": 1, "question": "B1", "options": ["a", "b", "c", "d"], "answer": 3 }
    ] } },
    "topik2": { "2024": { "writing": [
        { "id": "2024-w2-1", "year": "2024", "type": "writing", "level": "topik2",
          "part": 1, "question": "B2" }
    ] } }
}"#;

async fn empty_state() -> AppState {
    let storage = Storage::in_memory();
    storage.save_bank(&QuestionBank::empty_shell()).await.unwrap();
    AppState::load(storage, AppConfig::default(), fixed_clock())
        .await
        .unwrap()
}

fn id_counts(bank: &QuestionBank) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for (_, _, _, question) in bank.iter() {
        *counts.entry(question.id.as_str().to_owned()).or_default() += 1;
    }
    counts
}

#[tokio::test]
async fn export_then_import_into_empty_bank_reproduces_it() {
    let source = AppState::load(Storage::in_memory(), AppConfig::default(), fixed_clock())
        .await
        .unwrap();
    let exported = source.export().unwrap();
    assert_eq!(exported.file_name, "topik-questions-export-2023-11-14.json");

    let mut target = empty_state().await;
    let summary = target.import(&exported.contents).await.unwrap();

    assert_eq!(summary.added_count, 44);
    assert!(summary.drifted.is_empty());
    assert_eq!(target.bank(), source.bank());

    let reexported: serde_json::Value =
        serde_json::from_str(&target.export().unwrap().contents).unwrap();
    let original: serde_json::Value = serde_json::from_str(&exported.contents).unwrap();
    assert_eq!(reexported, original);
}

#[tokio::test]
async fn merge_order_does_not_change_the_multiset() {
    let mut ab = empty_state().await;
    ab.import(BATCH_A).await.unwrap();
    ab.import(BATCH_B).await.unwrap();

    let mut ba = empty_state().await;
    ba.import(BATCH_B).await.unwrap();
    ba.import(BATCH_A).await.unwrap();

    assert_eq!(id_counts(ab.bank()), id_counts(ba.bank()));
    assert_eq!(ab.bank().total_questions(), 3);
}

#[tokio::test]
async fn import_counts_every_leaf_question() {
    let mut state = empty_state().await;
    let summary = state.import(BATCH_B).await.unwrap();
    assert_eq!(summary.added_count, parse_import(BATCH_B).unwrap().total_questions());
    assert_eq!(summary.added_count, 2);
}

#[tokio::test]
async fn statistics_and_overview_follow_the_bank() {
    let mut state = empty_state().await;
    state.import(BATCH_B).await.unwrap();

    let stats = state.bank_service().statistics();
    assert_eq!(stats.total_questions(), 2);
    assert_eq!(stats.for_level(topik_core::model::Level::Topik2).year_count, 1);

    let overview = state.overview();
    assert_eq!(overview.total_questions, 2);
    assert_eq!(overview.accuracy, 100);
}

#[tokio::test]
async fn manual_entry_uses_suggested_id() {
    use topik_core::model::{Category, Level, Question, QuestionKind};

    let mut state = empty_state().await;
    state.import(BATCH_A).await.unwrap();
    let id = state
        .bank_service()
        .suggest_id(Level::Topik1, "2024", Category::Reading);
    assert_eq!(id.as_str(), "2024-r1-2");

    let question = Question {
        id,
        year: "2024".into(),
        level: Level::Topik1,
        part: 2,
        prompt: "manual".into(),
        explanation: Some("because".into()),
        extra: Default::default(),
        kind: QuestionKind::Reading {
            content: Some("passage".into()),
            options: vec!["a".into(), "b".into()],
            answer: Some(1),
        },
    };
    let result = state
        .add_question(question, &mut ReplacePolicy::Decline)
        .await
        .unwrap();
    assert!(result.outcome.is_applied());
    assert_eq!(state.bank().total_questions(), 2);
}
