use criterion::Criterion;

use covtrace::{
    coverage::BucketLayout,
    value::{Sample, ValueKind},
};

pub fn bucket_assignment(criterion: &mut Criterion) {
    let banded = BucketLayout::resolve(
        ValueKind::Integral {
            width: 32,
            signed: true,
        },
        false,
    );
    criterion.bench_function("banded_signed_index", |bencher| {
        let mut value = 1_u64;
        bencher.iter(move || {
            value = value
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            banded.index_of(&Sample::Bits(value & 0xffff_ffff))
        });
    });

    let per_value = BucketLayout::resolve(
        ValueKind::Integral {
            width: 4,
            signed: false,
        },
        false,
    );
    criterion.bench_function("per_value_index", |bencher| {
        let mut value = 0_u64;
        bencher.iter(move || {
            value = value.wrapping_add(7) & 0xf;
            per_value.index_of(&Sample::Bits(value))
        });
    });
}

criterion::criterion_group!(benches, bucket_assignment);
criterion::criterion_main! {
    benches,
}
