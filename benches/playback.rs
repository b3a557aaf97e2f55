//! Benchmarks for state log loading and playback ticking.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cube_replay::{BASE_FRAME_MS, CubeState, PlaybackEngine, StateLog, replay::STATES_FIELD};

fn cube_state(order: usize, seed: i64) -> CubeState {
    let cube = (0..order)
        .map(|i| {
            (0..order)
                .map(|j| {
                    (0..order)
                        .map(|k| (seed + (i * order * order + j * order + k) as i64) % 125 + 1)
                        .collect()
                })
                .collect()
        })
        .collect();
    CubeState::new(seed % 110, cube).with_iteration(seed as u64)
}

fn document(frames: usize) -> Vec<u8> {
    let states: Vec<CubeState> = (0..frames).map(|i| cube_state(5, i as i64)).collect();
    serde_json::to_vec(&serde_json::json!({ STATES_FIELD: states })).unwrap()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for frames in [100, 1_000, 10_000] {
        let bytes = document(frames);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_states", frames)),
            &bytes,
            |b, bytes| {
                b.iter(|| StateLog::load(black_box(bytes)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for speed in [0.5, 1.0, 4.0] {
        let log = StateLog::from_states((0..10_000).map(|i| cube_state(5, i)).collect()).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x", speed)),
            &speed,
            |b, &speed| {
                let mut engine = PlaybackEngine::default();
                engine.attach(log.clone());
                engine.set_speed(speed).unwrap();

                b.iter(|| {
                    engine.reset();
                    engine.play();
                    for t in 0..1_000 {
                        engine.tick(black_box(t as f64 * BASE_FRAME_MS / 3.0));
                    }
                    engine.current_frame()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_tick);
criterion_main!(benches);
