use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use docskel::{
    CanonicalizeConfig, DocumentProfile, FingerprintConfig, FingerprintedDocument, MiningConfig,
    ParagraphRecord, fingerprint_document, mine_profiles,
};
use miner::{FingerprintStats, MinerConfig, classify, detect_anchors, mine_sequences};

const SECTIONS: [&str; 6] = [
    "Fragestellung",
    "Anamnese",
    "Untersuchungsbefunde",
    "Diagnosen",
    "Beurteilung",
    "Zusammenfassung",
];

fn synthetic_profile(i: usize) -> DocumentProfile {
    let mut paragraphs = Vec::new();
    for (s, section) in SECTIONS.iter().enumerate() {
        paragraphs.push(ParagraphRecord::new(section.to_uppercase(), "Heading 1"));
        for p in 0..4 {
            let text = format!("Abschnitt {s}, Absatz {p}: Befundtext für Fall {i} mit Angaben.");
            paragraphs.push(ParagraphRecord::new(text, "Normal"));
        }
        paragraphs.push(ParagraphRecord::new(
            "Die Angaben beruhen auf der persönlichen Untersuchung.",
            "Normal",
        ));
        paragraphs.push(ParagraphRecord::new("", "Normal"));
    }
    DocumentProfile::new(
        format!("gutachten_{i:04}.docx"),
        "",
        paragraphs,
        vec!["Praxis Dr. Beispiel".to_string()],
        vec!["Seite 1".to_string()],
    )
}

fn corpus(size: usize) -> Vec<FingerprintedDocument> {
    let cfg = FingerprintConfig::default();
    (0..size)
        .map(|i| fingerprint_document(synthetic_profile(i), &cfg).expect("fingerprint"))
        .collect()
}

fn bench_stages(c: &mut Criterion) {
    let cfg = MinerConfig::default();
    let canonical = CanonicalizeConfig::default();
    let mut group = c.benchmark_group("mining_stages");

    for size in [10usize, 100] {
        let docs = corpus(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("classify", size), &docs, |b, docs| {
            b.iter(|| {
                let stats = FingerprintStats::from_documents(black_box(docs), 3).expect("stats");
                classify(&stats, &cfg)
            })
        });

        let stats = FingerprintStats::from_documents(&docs, 3).expect("stats");
        let classification = classify(&stats, &cfg);
        group.bench_with_input(BenchmarkId::new("sequences", size), &docs, |b, docs| {
            b.iter(|| mine_sequences(black_box(docs), &classification, &cfg))
        });

        group.bench_with_input(BenchmarkId::new("anchors", size), &docs, |b, docs| {
            b.iter(|| detect_anchors(black_box(docs), &cfg, &canonical))
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let cfg = MiningConfig::default();
    let profiles: Vec<_> = (0..50).map(synthetic_profile).collect();

    c.bench_function("mine_profiles_50", |b| {
        b.iter(|| mine_profiles(black_box(profiles.clone()), Vec::new(), &cfg).expect("run"))
    });
}

criterion_group!(benches, bench_stages, bench_pipeline);
criterion_main!(benches);
