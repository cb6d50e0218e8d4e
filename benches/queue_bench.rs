//! Benchmarks for the event queue.
//!
//! Run with: cargo bench
//!
//! Enqueue cost grows with the number of pending events (linear scan), so
//! each group is measured at several fill levels. Dequeue and clear should
//! stay flat.
//!
//! Benchmark groups:
//!   - queue/enqueue    insert into a queue already holding `fill` events
//!   - queue/dequeue    pop the due head
//!   - queue/clear      reset a full arena
//!   - scenarios/notes  schedule and play back a bar of notes

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use midiq::{
    io::send_command,
    sequencing::{schedule_note, Note},
    Command, Event, EventQueue, Key, QUEUE_LEN,
};

/// Pending-event counts to measure at.
const FILL_LEVELS: &[usize] = &[0, 8, 16, 23];

const CMD: Command = Command::new(0x90, 60, 100);

fn filled(fill: usize) -> EventQueue<QUEUE_LEN> {
    let mut queue = EventQueue::new();
    for i in 0..fill {
        queue
            .enqueue(Event::at(i as u16, 0, CMD))
            .expect("fill fits the arena");
    }
    queue
}

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue/enqueue");

    for &fill in FILL_LEVELS {
        // Worst case: new event sorts after everything pending
        group.bench_with_input(BenchmarkId::new("tail", fill), &fill, |b, &fill| {
            b.iter_batched_ref(
                || filled(fill),
                |queue| queue.enqueue(black_box(Event::at(u16::MAX, 0, CMD))),
                criterion::BatchSize::SmallInput,
            )
        });

        // Best case: new event becomes the head
        group.bench_with_input(BenchmarkId::new("head", fill), &fill, |b, &fill| {
            b.iter_batched_ref(
                || filled(fill),
                |queue| queue.enqueue(black_box(Event::at(0, 0, CMD))),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_dequeue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue/dequeue");

    for &fill in FILL_LEVELS.iter().filter(|&&f| f > 0) {
        group.bench_with_input(BenchmarkId::new("due", fill), &fill, |b, &fill| {
            b.iter_batched_ref(
                || filled(fill),
                |queue| queue.dequeue(black_box(Key::new(u16::MAX, 0))),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    // Polling steady state: head exists but is not due yet
    let mut queue: EventQueue<QUEUE_LEN> = EventQueue::new();
    queue.enqueue(Event::at(1, 0, CMD)).expect("empty queue has room");
    group.bench_function("not_due", |b| b.iter(|| queue.dequeue(black_box(Key::new(0, 23)))));

    group.finish();
}

fn bench_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue/clear");
    let mut queue = filled(QUEUE_LEN - 1);
    group.bench_function("full", |b| b.iter(|| black_box(&mut queue).clear()));
    group.finish();
}

fn bench_notes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/notes");

    let bar: Vec<Note> = (0..4)
        .flat_map(|beat| [Note::new(beat, 60), Note::new(beat, 64), Note::new(beat, 67)])
        .collect();

    group.bench_function("schedule_and_play_bar", |b| {
        let mut queue: EventQueue<QUEUE_LEN> = EventQueue::new();
        let mut wire: Vec<u8> = Vec::with_capacity(256);
        b.iter(|| {
            for note in &bar {
                schedule_note(&mut queue, note, 0).expect("bar fits the arena");
            }
            for beat in 0..=4 {
                for event in queue.drain_due(Key::beat(beat)) {
                    let _ = send_command(&mut wire, event.command);
                }
            }
            wire.clear();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_enqueue, bench_dequeue, bench_clear, bench_notes);
criterion_main!(benches);
