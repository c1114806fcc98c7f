use criterion::{criterion_group, criterion_main, Criterion};
use engine::tokenizer::tokenize;

fn sample_text() -> String {
    let paragraph = "Поисковая система indexes mixed Russian и English text, \
        splitting on punctuation: 42 words, ёлки, URLs and headers alike. ";
    paragraph.repeat(500)
}

fn bench_tokenize(c: &mut Criterion) {
    let text = sample_text();
    c.bench_function("tokenize_mixed_corpus", |b| b.iter(|| tokenize(text.as_bytes())));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
