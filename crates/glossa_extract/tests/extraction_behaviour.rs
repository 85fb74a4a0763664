//! Behaviour coverage for batch extraction over a real directory tree.

use std::cell::RefCell;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use glossa_common::MessageRecord;
use glossa_extract::{BatchReport, Extractors, collect_inputs, extract_files};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const COMPONENT: &str = r#"<script>
  const greeting = $t`Hello`;
</script>

<p>{$plural(count, { one: '# apple', other: '# apples' })}</p>
<T msg="right" ctx="direction" />
"#;

const MODULE: &str = "export const left = msg({ message: 'left', context: 'direction' });
export const bye = (name) => gt`Goodbye ${name}`;
";

struct ExtractionWorld {
    root: TempDir,
    extractors: Extractors,
    inputs: RefCell<Vec<Utf8PathBuf>>,
    reports: RefCell<Vec<BatchReport>>,
}

impl ExtractionWorld {
    fn root(&self) -> &Utf8Path {
        Utf8Path::from_path(self.root.path()).expect("temporary directory should be UTF-8")
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.root().join(relative);
        let parent = path.parent().expect("file should have a parent");
        fs::create_dir_all(parent).expect("create parent directory");
        fs::write(&path, contents).expect("write fixture file");
    }

    fn collect(&self) {
        let patterns = vec![self.root().to_string()];
        let inputs =
            collect_inputs(&self.extractors, &patterns).expect("directory should expand");
        self.inputs.replace(inputs);
    }

    fn extract(&self, jobs: usize) {
        self.collect();
        let report = extract_files(&self.extractors, &self.inputs.borrow(), jobs);
        self.reports.borrow_mut().push(report);
    }

    fn last_report(&self) -> std::cell::Ref<'_, BatchReport> {
        std::cell::Ref::map(self.reports.borrow(), |reports| {
            reports.last().expect("a batch should have run")
        })
    }
}

#[fixture]
fn world() -> ExtractionWorld {
    ExtractionWorld {
        root: TempDir::new().expect("create temporary directory"),
        extractors: Extractors::default(),
        inputs: RefCell::new(Vec::new()),
        reports: RefCell::new(Vec::new()),
    }
}

fn fingerprint(records: &[MessageRecord]) -> Vec<(String, String, usize, usize)> {
    records
        .iter()
        .map(|record| {
            (
                record.id().to_string(),
                record.origin().file.to_string(),
                record.origin().line,
                record.origin().column,
            )
        })
        .collect()
}

#[given("a project with a component and a script module")]
fn given_project(world: &ExtractionWorld) {
    world.write("src/App.svelte", COMPONENT);
    world.write("src/lib/labels.ts", MODULE);
}

#[given("a malformed script \"{path}\"")]
fn given_malformed_script(world: &ExtractionWorld, path: String) {
    world.write(&path, "export const broken = gt`never closed;\n");
}

#[given("a file \"{path}\" containing \"{contents}\"")]
fn given_file(world: &ExtractionWorld, path: String, contents: String) {
    world.write(&path, &contents);
}

#[when("the inputs are collected")]
fn when_inputs_collected(world: &ExtractionWorld) {
    world.collect();
}

#[when("the project is extracted with jobs set to {jobs}")]
fn when_extracted(world: &ExtractionWorld, jobs: usize) {
    world.extract(jobs);
}

#[when("the project is extracted again with jobs set to {jobs}")]
fn when_extracted_again(world: &ExtractionWorld, jobs: usize) {
    world.extract(jobs);
}

#[then("both runs report the same records")]
fn then_same_records(world: &ExtractionWorld) {
    let reports = world.reports.borrow();
    let [first, second] = reports.as_slice() else {
        panic!("expected two runs, found {}", reports.len());
    };
    assert_eq!(first.records, second.records);
    assert_eq!(fingerprint(&first.records), fingerprint(&second.records));
    assert_eq!(first.failures.len(), second.failures.len());
}

#[then("{count} records are reported")]
fn then_record_count(world: &ExtractionWorld, count: usize) {
    assert_eq!(world.last_report().records.len(), count);
}

#[then("the failure names \"{path}\"")]
fn then_failure_names(world: &ExtractionWorld, path: String) {
    let report = world.last_report();
    let [failure] = report.failures.as_slice() else {
        panic!("expected exactly one failure, got {:?}", report.failures);
    };
    assert_eq!(failure.path, world.root().join(&path));
    assert_eq!(failure.error.path(), Some(&failure.path));
}

#[then("{count} input files are found")]
fn then_input_count(world: &ExtractionWorld, count: usize) {
    assert_eq!(world.inputs.borrow().len(), count);
}

// Bindings are index-based; keep them in step with extraction.feature.
#[scenario(path = "tests/features/extraction.feature", index = 0)]
fn scenario_idempotent(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/extraction.feature", index = 1)]
fn scenario_partial_failure(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/extraction.feature", index = 2)]
fn scenario_parallel_order(world: ExtractionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/extraction.feature", index = 3)]
fn scenario_directory_expansion(world: ExtractionWorld) {
    let _ = world;
}
