use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use serde_json::json;
use vidatea_core::CoreError;
use vidatea_store::{DocumentStore, InMemoryStore, WriteOp, run_transaction};

fn seed_product(store: &InMemoryStore) {
    store
        .commit(
            &[],
            vec![WriteOp::Set {
                collection: "products".into(),
                id: "p1".into(),
                data: json!({"name": "Green Tea", "inventory": 1_000_000}),
            }],
            Utc::now(),
        )
        .unwrap();
}

/// Read-check-write transaction per call, the inventory ledger's shape.
fn bench_transaction_commit(c: &mut Criterion) {
    let store = InMemoryStore::new();
    seed_product(&store);
    let now = Utc::now();

    let mut group = c.benchmark_group("transaction_commit");
    group.throughput(Throughput::Elements(1));
    group.bench_function("read_check_write", |b| {
        b.iter(|| {
            run_transaction(&store, now, |tx| {
                let doc = tx.get("products", "p1")?.ok_or(CoreError::NotFound)?;
                let current = doc.data["inventory"].as_i64().unwrap_or(0);
                tx.set("products", "p1", &json!({"inventory": current - 1}))?;
                Ok(())
            })
            .unwrap();
            black_box(())
        })
    });
    group.finish();
}

/// Fire-and-forget append, the analytics writer's shape.
fn bench_plain_add(c: &mut Criterion) {
    let store = InMemoryStore::new();
    let now = Utc::now();

    let mut group = c.benchmark_group("plain_add");
    group.throughput(Throughput::Elements(1));
    group.bench_function("append_auto_id", |b| {
        b.iter(|| {
            let id = store
                .add("analytics", json!({"eventType": "page_view"}), now)
                .unwrap();
            black_box(id)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_transaction_commit, bench_plain_add);
criterion_main!(benches);
