//! # QnA-Hub Benchmarks
//!
//! | Path | Expectation |
//! |------|-------------|
//! | Thread assembly | Linear in answers, < 1ms for 1k answers |
//! | Vote ledger | Logarithmic in voters per toggle |
//! | Service vote round trip | Dominated by the in-memory store lock |

use std::sync::Arc;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qna_core::{
    apply_vote, assemble, Answer, AnswerId, InMemoryRepository, QnaApi, QnaConfig, QnaService,
    Question, QuestionId, UserId, VoteDirection, VoteTally, VoteTarget,
};

fn answers_with_replies(tops: usize, replies_per_top: usize) -> Vec<Answer> {
    let q = QuestionId::new("Q");
    let mut answers = Vec::with_capacity(tops * (replies_per_top + 1));
    for t in 0..tops {
        let top = AnswerId::new(format!("A{}", t));
        answers.push(Answer::new(top.clone(), q.clone(), UserId::new("u1"), "top", Utc::now()));
        for r in 0..replies_per_top {
            answers.push(Answer::reply(
                AnswerId::new(format!("A{}R{}", t, r)),
                q.clone(),
                top.clone(),
                UserId::new("u2"),
                "reply",
                Utc::now(),
            ));
        }
    }
    answers
}

fn bench_thread_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("thread-assembler");

    for tops in [10, 100, 250] {
        let answers = answers_with_replies(tops, 3);
        group.throughput(Throughput::Elements(answers.len() as u64));
        group.bench_with_input(BenchmarkId::new("assemble", answers.len()), &answers, |b, answers| {
            b.iter(|| black_box(assemble(answers)))
        });
    }

    group.finish();
}

fn bench_vote_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("vote-ledger");

    for voters in [10, 1_000, 10_000] {
        let tally = VoteTally::from_voters(
            (0..voters).map(|i| UserId::new(format!("up{}", i))),
            (0..voters).map(|i| UserId::new(format!("down{}", i))),
        );
        let actor = UserId::new("up0");
        group.bench_with_input(BenchmarkId::new("toggle", voters), &tally, |b, tally| {
            b.iter(|| black_box(apply_vote(Some(&actor), tally, VoteDirection::Down)))
        });
    }

    group.finish();
}

fn bench_service_vote(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    let repo = InMemoryRepository::new();
    let question = Question::new(QuestionId::new("Q"), UserId::new("u1"), "t", "c", Utc::now());
    repo.insert_question(question);
    for answer in answers_with_replies(50, 2) {
        repo.insert_answer(answer);
    }
    let mut service = QnaService::new(QnaConfig::default(), Arc::new(repo));
    runtime
        .block_on(service.load(&QuestionId::new("Q")))
        .expect("load");

    let actor = UserId::new("voter");
    c.bench_function("service-vote-round-trip", |b| {
        b.iter(|| {
            runtime.block_on(service.vote(
                Some(&actor),
                VoteTarget::Answer(AnswerId::new("A7")),
                VoteDirection::Up,
            ))
        })
    });
}

criterion_group!(benches, bench_thread_assembly, bench_vote_ledger, bench_service_vote);
criterion_main!(benches);
