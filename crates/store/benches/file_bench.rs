use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use store::{record, FixedStr, RecordStore, StoreOptions};
use tempfile::tempdir;

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Sample {
        tag: FixedStr<16>,
        seq: u64,
        value: f64,
    }
}

const N: u64 = 10_000;

fn populated(options: StoreOptions) -> RecordStore<Sample> {
    let mut store = RecordStore::with_options(options);
    store.add_entries((0..N).map(|i| Sample {
        tag: FixedStr::new("sensor"),
        seq: i,
        value: i as f64 * 0.25,
    }));
    store
}

fn publish_nosync(c: &mut Criterion) {
    c.bench_function("publish_nosync_10k", |b| {
        b.iter_batched(
            || (tempdir().unwrap(), populated(StoreOptions::default())),
            |(dir, store)| store.publish(dir.path(), "samples.cdb").unwrap(),
            BatchSize::SmallInput,
        );
    });
}

fn publish_sync(c: &mut Criterion) {
    let options = StoreOptions {
        sync: true,
        ..StoreOptions::default()
    };
    c.bench_function("publish_sync_10k", |b| {
        b.iter_batched(
            || (tempdir().unwrap(), populated(options)),
            |(dir, store)| store.publish(dir.path(), "samples.cdb").unwrap(),
            BatchSize::SmallInput,
        );
    });
}

fn parse(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    populated(StoreOptions::default())
        .publish(dir.path(), "samples.cdb")
        .unwrap();

    c.bench_function("parse_10k", |b| {
        b.iter(|| {
            let store = RecordStore::<Sample>::open(dir.path(), "samples.cdb").unwrap();
            assert_eq!(store.total_entries(), N as usize);
        });
    });
}

criterion_group!(benches, publish_nosync, publish_sync, parse);
criterion_main!(benches);
