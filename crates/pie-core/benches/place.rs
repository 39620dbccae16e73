use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pie_core::{Circle, CircleGroup, PickedItem, merge_groups};

fn bench_merge(c: &mut Criterion) {
    let source = CircleGroup::new((0..50).map(|_| Circle::new(2, 2)).collect());
    let target = CircleGroup::new(vec![Circle::new(12, 5)]);
    let item = PickedItem::Group {
        source_group: source.id,
        divisions: 2,
        slice_count: source.active_count(),
    };

    c.bench_function("merge_groups_100_halves_into_twelfths", |b| {
        b.iter(|| merge_groups(black_box(&source), black_box(&target), black_box(&item)))
    });
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
