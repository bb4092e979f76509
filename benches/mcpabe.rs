use std::collections::BTreeMap;
use criterion::{criterion_group, criterion_main, Criterion, BenchmarkId};
use mcpabe::schemes::mcpabe::{basic, binding, setup, AttributeUniverse};
use mcpabe::utils::policy::pest::PolicyLanguage;
use rabe_bn::Gt;
use rand::{Rng, SeedableRng, rngs::StdRng};

const AUTHORITIES: u64 = 8;
const ATTRIBUTES: usize = 10;

fn and_policy(size: usize) -> String {
    (1..=size).map(|i| format!("A{}", i)).collect::<Vec<String>>().join(" and ")
}

fn attributes() -> Vec<String> {
    (1..=ATTRIBUTES).map(|i| format!("A{}", i)).collect()
}

fn criterion_setup(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let universe = AttributeUniverse::random(1, AUTHORITIES, ATTRIBUTES, &mut rng).unwrap();
    let mut group = c.benchmark_group("setup");
    group.bench_function("global", |b| b.iter(|| setup(&universe, &mut rng)));
    let gp = setup(&universe, &mut rng);
    group.bench_function("basic authority", |b| b.iter(|| basic::authgen(&gp, 1, &mut rng)));
    group.bench_function("binding authority", |b| b.iter(|| binding::authgen(&gp, 1, &mut rng)));
    group.finish();
}

fn criterion_basic(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let universe = AttributeUniverse::random(1, AUTHORITIES, ATTRIBUTES, &mut rng).unwrap();
    let gp = setup(&universe, &mut rng);
    let mut pks = BTreeMap::new();
    let mut msks = BTreeMap::new();
    for aid in 1..=AUTHORITIES {
        let (pk, msk) = basic::authgen(&gp, aid, &mut rng);
        pks.insert(aid, pk);
        msks.insert(aid, msk);
    }
    let attr = attributes();
    let attr: Vec<&str> = attr.iter().map(|a| a.as_str()).collect();
    let sk = basic::keygen(&gp, 1, &attr, &msks, &mut rng).unwrap();
    let mut group = c.benchmark_group("basic");
    for size in [2, 4, 8] {
        let policy = and_policy(size);
        let msg: Gt = rng.gen();
        group.bench_with_input(BenchmarkId::new("encrypt", size), &policy, |b, policy| {
            b.iter(|| basic::encrypt(&gp, &pks, msg, policy, PolicyLanguage::HumanPolicy, &mut rng).unwrap())
        });
        let ct = basic::encrypt(&gp, &pks, msg, &policy, PolicyLanguage::HumanPolicy, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("decrypt", size), &ct, |b, ct| {
            b.iter(|| basic::decrypt(&gp, 1, &sk, ct).unwrap())
        });
    }
    group.finish();
}

fn criterion_binding(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let universe = AttributeUniverse::random(1, AUTHORITIES, ATTRIBUTES, &mut rng).unwrap();
    let gp = setup(&universe, &mut rng);
    let mut pks = BTreeMap::new();
    let mut msks = BTreeMap::new();
    for aid in 1..=AUTHORITIES {
        let (pk, msk) = binding::authgen(&gp, aid, &mut rng);
        pks.insert(aid, pk);
        msks.insert(aid, msk);
    }
    let attr = attributes();
    let attr: Vec<&str> = attr.iter().map(|a| a.as_str()).collect();
    let mut group = c.benchmark_group("binding");
    group.bench_function("keygen", |b| {
        b.iter(|| binding::keygen(&gp, 1, &attr, &msks, &mut rng).unwrap())
    });
    let sk = binding::keygen(&gp, 1, &attr, &msks, &mut rng).unwrap();
    for size in [2, 4, 8] {
        let policy = and_policy(size);
        let msg: Gt = rng.gen();
        group.bench_with_input(BenchmarkId::new("encrypt", size), &policy, |b, policy| {
            b.iter(|| binding::encrypt(&gp, &pks, msg, policy, PolicyLanguage::HumanPolicy, &mut rng).unwrap())
        });
        let ct = binding::encrypt(&gp, &pks, msg, &policy, PolicyLanguage::HumanPolicy, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("decrypt", size), &ct, |b, ct| {
            b.iter(|| binding::decrypt(&gp, &sk, ct).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches,
    criterion_setup,
    criterion_basic,
    criterion_binding,
);

criterion_main!(benches);
