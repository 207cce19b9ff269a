use criterion::{black_box, criterion_group, criterion_main, Criterion};
use clue_meister::{
    core::Coordinate,
    knowledge::{KnowledgeBase, SqliteKnowledgeBase, AI_FLAGGED_TAG},
};

async fn setup_kb() -> SqliteKnowledgeBase {
    let kb = SqliteKnowledgeBase::new(":memory:").await.unwrap();

    // Populate with test data
    for i in 0..100 {
        let id = kb.add_clue(&format!("footprint at {},{}", i, i)).await.unwrap();
        if i % 10 == 0 {
            kb.add_clue_tag(id, AI_FLAGGED_TAG).await.unwrap();
        }
    }
    kb.add_interview_sighting(Coordinate::new(50.0, 50.0), 5.0).await.unwrap();

    kb
}

fn bench_get_clues(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let kb = runtime.block_on(setup_kb());

    c.bench_function("kb_get_clues_100", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(kb.get_clues().await.unwrap())
        });
    });

    c.bench_function("kb_clue_tags", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(kb.clue_tags(AI_FLAGGED_TAG).await.unwrap())
        });
    });
}

fn bench_add_clue(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let kb = runtime.block_on(setup_kb());

    c.bench_function("kb_add_clue", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(kb.add_clue("red hat at 1,2").await.unwrap())
        });
    });
}

fn bench_interview_support(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let kb = runtime.block_on(setup_kb());

    c.bench_function("kb_interview_supports_path", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(kb.interview_supports_path(Coordinate::new(52.0, 51.0)).await.unwrap())
        });
    });
}

criterion_group!(benches, bench_get_clues, bench_add_clue, bench_interview_support);
criterion_main!(benches);
