use criterion::{criterion_group, criterion_main, Criterion};
use lancet::{canonical, Node, ReferenceKmers, Variant, VariantType};

fn criterion_benchmark(c: &mut Criterion) {
    let variant = Variant::new("chr1", 100, VariantType::Substitution, 1, "A", "G")
        .with_normal(60, 0, 0)
        .with_tumor(45, 9, 8);
    c.bench_function("variant update", |b| {
        b.iter(|| {
            let mut variant = variant.clone();
            variant.update().unwrap();
            variant
        })
    });

    let reference = ReferenceKmers::new(b"acGTCttACGaTAGGCTTACAGGATTACAGCCTTAGCAAT", 11);
    let seq = b"TTTTGGGGCCCCAAAATTTTGGGGCCCCAAAATTTTGGGGCCCCAAAA".to_vec();
    c.bench_function("node mark_ref miss", |b| {
        b.iter(|| {
            let mut node = Node::new(canonical(&seq[..11]), seq.clone());
            node.mark_ref(&reference, 11)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
