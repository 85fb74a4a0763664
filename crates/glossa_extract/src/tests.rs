//! Unit tests for call-site recognition.

use camino::Utf8Path;
use glossa_common::{SourceLocation, generate_message_id};
use glossa_syntax::ParseErrorKind;
use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn extractors() -> Extractors {
    Extractors::default()
}

fn extract(extractors: &Extractors, path: &str, source: &str) -> Vec<glossa_common::MessageRecord> {
    extractors
        .extract_source(Utf8Path::new(path), source)
        .unwrap_or_else(|error| panic!("extraction of {path} failed: {error}"))
}

fn messages(records: &[glossa_common::MessageRecord]) -> Vec<&str> {
    records.iter().map(|record| record.message()).collect()
}

#[rstest]
fn tagged_templates_use_positional_slots(extractors: Extractors) {
    let records = extract(&extractors, "src/a.ts", "const a = gt`hello ${name}`;");
    let [record] = records.as_slice() else {
        panic!("expected one record, got {records:?}");
    };
    assert_eq!(record.message(), "hello {0}");
    assert_eq!(record.id(), &generate_message_id("hello {0}", None));
    assert_eq!(record.origin().file, "src/a.ts");
    assert_eq!((record.origin().line, record.origin().column), (1, 12));
}

#[rstest]
fn structured_calls_carry_context_and_comment(extractors: Extractors) {
    let source = "export const label = msg({\n  message: 'right',\n  context: 'direction',\n  comment: 'Opposite of left',\n});";
    let records = extract(&extractors, "labels.js", source);
    let [record] = records.as_slice() else {
        panic!("expected one record, got {records:?}");
    };
    assert_eq!(record.id().as_str(), "d1wX4r");
    assert_eq!(record.context(), Some("direction"));
    assert_eq!(record.comment(), Some("Opposite of left"));
    assert_eq!((record.origin().line, record.origin().column), (1, 21));
}

#[rstest]
#[case::absent("msg({ context: 'x' })")]
#[case::empty("msg({ message: '' })")]
#[case::empty_template("gt({ message: `` })")]
fn structured_calls_without_a_message_fail(extractors: Extractors, #[case] source: &str) {
    let error = extractors
        .extract_source(Utf8Path::new("bad.js"), source)
        .expect_err("extraction should fail");
    assert!(
        matches!(
            &error,
            ExtractError::MissingMessage { line: 1, column: 0, .. }
        ),
        "unexpected error: {error}"
    );
}

#[rstest]
#[case::dynamic_message("msg({ message: label })")]
#[case::interpolated_message("msg({ message: `a ${b}` })")]
#[case::dynamic_context("msg({ message: 'a', context: ctx })")]
#[case::spread("msg({ ...base, message: 'a' })")]
#[case::computed_key("msg({ [key]: 'a' })")]
#[case::non_object("msg(descriptor)")]
#[case::member_callee("i18n.gt`hello`")]
#[case::dynamic_variation("gPlural(n, { one: one, other: 'many' })")]
#[case::empty_variations("msgPlural({})")]
fn dynamic_shapes_are_skipped(extractors: Extractors, #[case] source: &str) {
    assert!(extract(&extractors, "skip.ts", source).is_empty());
}

#[rstest]
fn comments_that_are_not_literal_are_dropped(extractors: Extractors) {
    let records = extract(&extractors, "a.js", "msg({ message: 'a', comment: note })");
    let [record] = records.as_slice() else {
        panic!("expected one record, got {records:?}");
    };
    assert_eq!(record.comment(), None);
}

#[rstest]
fn plural_calls_compile_their_variations(extractors: Extractors) {
    let records = extract(
        &extractors,
        "cart.ts",
        "gPlural(items.length, { one: '# item', other: '# items' });\nmsgPlural({ '=0': 'none', 2: 'pair', other: '#' });",
    );
    assert_eq!(
        messages(&records),
        vec![
            "{num, plural, one {# item} other {# items}}",
            "{num, plural, =0 {none} 2 {pair} other {#}}",
        ]
    );
    let compiled = records.first().map(|record| record.message()).unwrap_or_default();
    assert_eq!(
        records.first().map(|record| record.id().clone()),
        Some(generate_message_id(compiled, None))
    );
}

#[rstest]
fn nested_markers_are_found_in_pre_order(extractors: Extractors) {
    let records = extract(&extractors, "a.js", "gt`outer ${gt`inner`}`; gt`last`");
    assert_eq!(messages(&records), vec!["outer {0}", "inner", "last"]);
}

#[rstest]
fn templates_cover_scripts_markup_and_components(extractors: Extractors) {
    let source = r#"<script lang="ts">
  const title = $t`Title`;
</script>

<h1>{title}</h1>
<p>{$t`Hello ${name}`}</p>
<T msg="right" ctx="direction" cmt="Arrow label" />
{#if items.length}
  <span>{$plural(items.length, { one: '# item', other: '# items' })}</span>
{/if}
"#;
    let records = extract(&extractors, "src/App.svelte", source);
    assert_eq!(
        messages(&records),
        vec![
            "Title",
            "Hello {0}",
            "right",
            "{num, plural, one {# item} other {# items}}",
        ]
    );
    let origins: Vec<_> = records
        .iter()
        .map(|record| (record.origin().line, record.origin().column))
        .collect();
    assert_eq!(origins, vec![(2, 18), (6, 6), (7, 0), (9, 9)]);
    assert_eq!(
        records.get(2).map(|record| record.id().as_str()),
        Some("d1wX4r")
    );
}

#[rstest]
#[case::no_msg(r#"<T ctx="x" />"#)]
#[case::bare_msg("<T msg />")]
fn components_without_a_message_fail(extractors: Extractors, #[case] source: &str) {
    let error = extractors
        .extract_source(Utf8Path::new("C.svelte"), source)
        .expect_err("extraction should fail");
    assert!(
        matches!(&error, ExtractError::MissingMessage { marker, .. } if marker == "T"),
        "unexpected error: {error}"
    );
}

#[rstest]
#[case::expression_msg("<T msg={label} />")]
#[case::spread("<T {...props} />")]
#[case::unknown_component(r#"<Trans msg="x" />"#)]
fn dynamic_components_are_skipped(extractors: Extractors, #[case] source: &str) {
    assert!(extract(&extractors, "C.svelte", source).is_empty());
}

#[rstest]
fn literal_expression_attributes_are_accepted(extractors: Extractors) {
    let records = extract(&extractors, "C.svelte", "<T msg={'right'} ctx={`direction`} />");
    assert_eq!(
        records.first().map(|record| record.id().as_str()),
        Some("d1wX4r")
    );
}

#[rstest]
fn failing_files_emit_nothing() {
    let extractor = ScriptExtractor::default();
    let mut emitted = Vec::new();
    let result = extractor.extract(
        Utf8Path::new("broken.js"),
        "gt`first`;\nmsg({ context: 'no message' });",
        &mut |record| emitted.push(record),
    );
    assert!(result.is_err());
    assert!(emitted.is_empty());
}

#[rstest]
fn parse_errors_report_their_position(extractors: Extractors) {
    let error = extractors
        .extract_source(Utf8Path::new("broken.ts"), "gt`ok`;\nfoo(bar;")
        .expect_err("parsing should fail");
    let ExtractError::Parse { path, source } = error else {
        panic!("expected a parse error");
    };
    assert_eq!(path, "broken.ts");
    assert_eq!(source.kind(), &ParseErrorKind::UnclosedDelimiter { expected: ')' });
    assert_eq!(source.location(), SourceLocation::new(2, 3));
}

#[rstest]
fn dialects_use_their_own_names(extractors: Extractors) {
    assert!(extract(&extractors, "a.svelte", "{gt`script name`}").is_empty());
    assert!(extract(&extractors, "a.ts", "$t`template name`").is_empty());
}

#[rstest]
fn custom_names_replace_the_defaults() {
    let names = RecognizedNames {
        messages: vec!["t".to_owned()],
        ..RecognizedNames::script()
    };
    let extractors = Extractors::new(ScriptExtractor::new(names), TemplateExtractor::default());
    let records = extract(&extractors, "a.js", "t`custom`; gt`default`");
    assert_eq!(messages(&records), vec!["custom"]);
}

#[rstest]
#[case("a.js", true)]
#[case("a.mjs", true)]
#[case("a.cjs", true)]
#[case("a.ts", true)]
#[case("a.mts", true)]
#[case("a.cts", true)]
#[case("a.svelte", false)]
#[case("a.py", false)]
#[case("Makefile", false)]
fn script_extensions(#[case] path: &str, #[case] expected: bool) {
    assert_eq!(ScriptExtractor::default().matches(Utf8Path::new(path)), expected);
}

#[rstest]
fn unsupported_files_are_rejected(extractors: Extractors) {
    let error = extractors
        .extract_source(Utf8Path::new("notes.md"), "gt`x`")
        .expect_err("markdown is not supported");
    assert!(matches!(error, ExtractError::Unsupported { .. }));
}
