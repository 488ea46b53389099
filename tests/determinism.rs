//! Output must not depend on input order, ingest parallelism or reruns.

mod common;

use std::fs;
use std::path::Path;

use common::report_corpus;
use docskel::{MiningConfig, mine_template, write_artifacts};

fn read_all(dir: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for name in ["template_spec.json", "classification.json", "sequences.json"] {
        files.push((name.to_string(), fs::read_to_string(dir.join(name)).expect("artifact")));
    }
    let mut profiles: Vec<_> = fs::read_dir(dir.join("doc_profiles"))
        .expect("profiles dir")
        .map(|entry| entry.expect("entry").path())
        .collect();
    profiles.sort();
    for path in profiles {
        let name = path.file_name().expect("name").to_string_lossy().into_owned();
        files.push((name, fs::read_to_string(&path).expect("profile")));
    }
    files
}

#[test]
fn artifacts_are_byte_identical_across_orderings_and_parallelism() {
    let corpus = tempfile::tempdir().expect("corpus dir");
    let paths = report_corpus(corpus.path(), 6);
    let out = tempfile::tempdir().expect("out dir");

    let sequential = MiningConfig::default();
    let run = mine_template(&paths, &sequential).expect("forward run");
    write_artifacts(&run, &out.path().join("forward")).expect("write forward");

    let mut reversed = paths.clone();
    reversed.reverse();
    let run = mine_template(&reversed, &sequential).expect("reversed run");
    write_artifacts(&run, &out.path().join("reversed")).expect("write reversed");

    let parallel = MiningConfig {
        parallel: true,
        ..MiningConfig::default()
    };
    let mut shuffled = paths.clone();
    shuffled.rotate_left(4);
    let run = mine_template(&shuffled, &parallel).expect("parallel run");
    write_artifacts(&run, &out.path().join("parallel")).expect("write parallel");

    let forward = read_all(&out.path().join("forward"));
    assert_eq!(forward.len(), 3 + 6);
    assert_eq!(forward, read_all(&out.path().join("reversed")));
    assert_eq!(forward, read_all(&out.path().join("parallel")));
}

#[test]
fn rerun_produces_identical_template() {
    let corpus = tempfile::tempdir().expect("corpus dir");
    let paths = report_corpus(corpus.path(), 4);
    let cfg = MiningConfig::default();

    let first = mine_template(&paths, &cfg).expect("first run");
    let second = mine_template(&paths, &cfg).expect("second run");

    assert_eq!(first.template, second.template);
    assert_eq!(
        serde_json::to_string_pretty(&first.template).expect("json"),
        serde_json::to_string_pretty(&second.template).expect("json")
    );
}

#[test]
fn document_order_in_run_follows_file_names() {
    let corpus = tempfile::tempdir().expect("corpus dir");
    let mut paths = report_corpus(corpus.path(), 3);
    paths.reverse();

    let run = mine_template(&paths, &MiningConfig::default()).expect("run");
    let sources: Vec<&str> = run.documents.iter().map(|d| d.source()).collect();
    assert_eq!(sources, vec!["gutachten_00.docx", "gutachten_01.docx", "gutachten_02.docx"]);
}
