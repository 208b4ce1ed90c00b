//! Benchmark: access check cost as a scope grows.
//!
//! Matching probes every prefix of the requested object against the scope's
//! ordered key index, so cost should track object length and the number of
//! entries sharing a key, not the total number of entries in the scope.
//!
//! Run with `cargo bench -p warden-auth`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use warden_auth::{Principal, Session};

fn populated(entries: usize) -> Session {
    let session =
        Session::new(Arc::new(Principal::System), Duration::from_secs(300)).expect("session");
    for i in 0..entries {
        session
            .grant("ubus", &format!("service.{i:05}.*"), "*", "rw")
            .expect("grant");
    }
    session.grant("ubus", "network.*", "status", "r").expect("grant");
    session
}

fn bench_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("acl_access");

    for size in [10usize, 100, 1_000, 10_000] {
        let session = populated(size);
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("hit", size), &session, |b, s| {
            b.iter(|| black_box(s.access("ubus", "network.interface.lan", "status", "r")));
        });

        group.bench_with_input(BenchmarkId::new("miss", size), &session, |b, s| {
            b.iter(|| black_box(s.access("ubus", "system.board", "info", "r")));
        });

        group.bench_with_input(BenchmarkId::new("unknown_scope", size), &session, |b, s| {
            b.iter(|| black_box(s.access("uci", "network", "get", "r")));
        });
    }

    group.finish();
}

fn bench_grant(c: &mut Criterion) {
    c.bench_function("acl_grant/fresh_scope", |b| {
        b.iter_with_setup(
            || Session::new(Arc::new(Principal::System), Duration::from_secs(300)).expect("session"),
            |s| {
                s.grant("ubus", "network.*", "status", "rw").expect("grant");
                black_box(s)
            },
        );
    });
}

criterion_group!(benches, bench_access, bench_grant);
criterion_main!(benches);
