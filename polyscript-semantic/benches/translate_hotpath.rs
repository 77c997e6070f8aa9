use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polyscript_semantic::Translator;

const EN_HANDLER: &str = "on click toggle .active on #btn then hide #menu";
const JA_ASK: &str = "#form から \"名前は?\" を 尋ねる";

fn bench_parse(c: &mut Criterion) {
    let translator = Translator::default();
    c.bench_function("parse/en_handler", |b| {
        b.iter(|| {
            let node = translator.parse(black_box(EN_HANDLER), "en").expect("parse en");
            black_box(node.body.len());
        });
    });
    c.bench_function("parse/ja_ask", |b| {
        b.iter(|| {
            let node = translator.parse(black_box(JA_ASK), "ja").expect("parse ja");
            black_box(node.roles.len());
        });
    });
}

fn bench_translate(c: &mut Criterion) {
    let translator = Translator::default();
    for target in ["es", "ja", "ar", "tr"] {
        c.bench_function(&format!("translate/en_{}", target), |b| {
            b.iter(|| {
                let out = translator
                    .translate(black_box(EN_HANDLER), "en", target)
                    .expect("translate");
                black_box(out.len());
            });
        });
    }
}

criterion_group!(benches, bench_parse, bench_translate);
criterion_main!(benches);
