//! Extract from DOCX, then re-mine from the saved profiles.

mod common;

use std::fs;

use common::report_corpus;
use docskel::{
    IngestConfig, InputFormat, MiningConfig, SkeletonNode, artifacts::PROFILES_DIR, ingest_path,
    mine_directory, mine_template, write_artifacts,
};
use miner::StyleRole;

#[test]
fn extract_writes_template_and_diagnostics() {
    let corpus = tempfile::tempdir().expect("corpus dir");
    let paths = report_corpus(corpus.path(), 4);
    let out = tempfile::tempdir().expect("out dir");

    let run = mine_template(&paths, &MiningConfig::default()).expect("run");
    let written = write_artifacts(&run, out.path()).expect("artifacts");

    let template = &run.template;
    let anchor_ids: Vec<&str> = template.anchors.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(anchor_ids, vec!["anamnese", "beurteilung"]);
    assert_eq!(template.skeleton.len(), 4);
    assert!(matches!(
        &template.skeleton[0],
        SkeletonNode::Fixed { id, .. } if id == "anamnese_heading"
    ));

    assert_eq!(template.header.content, "Praxis Dr. Beispiel");
    assert_eq!(template.footer.content, "Vertraulich");
    assert_eq!(template.style_roles.get(StyleRole::H1), "Heading 1");
    assert_eq!(template.style_roles.get(StyleRole::Body), "Normal");
    assert_eq!(template.style_roles.get(StyleRole::Bullet), "List Bullet");
    assert_eq!(template.render_rules.spacing_after_heading, 18.0);
    assert_eq!(template.render_rules.spacing_after_paragraph, 8.0);

    // Every report ends with the same bullet, heading and closing line.
    assert!(template.sequences.iter().any(|s| s.len() >= 3 && s.all_fixed));

    assert_eq!(written.profiles.len(), 4);
    assert!(written.template_spec.is_file());
    let spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written.template_spec).expect("read"))
            .expect("template json");
    assert_eq!(spec["version"], "1.0");
    assert_eq!(spec["family_id"], "default");
    assert_eq!(spec["skeleton"][1]["type"], "slot");
    assert_eq!(spec["quality_metrics"]["documents_analyzed"], 4);

    let classification: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written.classification).expect("read"))
            .expect("classification json");
    assert_eq!(classification["total_documents"], 4);
}

#[test]
fn saved_profiles_round_trip_into_the_same_template() {
    let corpus = tempfile::tempdir().expect("corpus dir");
    let paths = report_corpus(corpus.path(), 3);
    let out = tempfile::tempdir().expect("out dir");
    let cfg = MiningConfig::default();

    let extracted = mine_template(&paths, &cfg).expect("extract");
    write_artifacts(&extracted, out.path()).expect("artifacts");

    let profiles_dir = out.path().join(PROFILES_DIR);
    let saved = profiles_dir.join("gutachten_00.json");
    let profile = ingest_path(&saved, &IngestConfig::default()).expect("saved profile");
    assert_eq!(profile, extracted.documents[0].profile);

    let analyzed = mine_directory(&profiles_dir, InputFormat::SavedProfile, &cfg).expect("analyze");
    assert_eq!(analyzed.template, extracted.template);
    assert_eq!(analyzed.classification, extracted.classification);
}
