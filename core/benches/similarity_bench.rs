use criterion::{criterion_group, criterion_main, Criterion};
use movie_core::{SimilarityMatrix, TfidfVectorizer, VectorizerConfig};

fn synthetic_tags(n: usize) -> Vec<String> {
    let words = ["space", "marine", "ocean", "love", "war", "robot", "heist", "dream", "crime", "family", "ship", "alien"];
    (0..n)
        .map(|i| (0..12).map(|k| words[(i * 7 + k * 5) % words.len()]).collect::<Vec<_>>().join(" "))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let docs = synthetic_tags(500);
    c.bench_function("fit_transform_500", |b| {
        b.iter(|| TfidfVectorizer::fit_transform(VectorizerConfig::default(), &docs).unwrap())
    });
    let (_, rows) = TfidfVectorizer::fit_transform(VectorizerConfig::default(), &docs).unwrap();
    c.bench_function("similarity_500", |b| b.iter(|| SimilarityMatrix::from_rows(&rows)));
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
