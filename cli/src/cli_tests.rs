//! Tests for CLI parsing and defaults.

use super::*;
use rstest::rstest;

fn extract_args(cli: Cli) -> ExtractArgs {
    match cli.command {
        Command::Extract(args) => args,
        Command::Id(_) => panic!("expected the extract command"),
    }
}

#[rstest]
fn extract_parses_defaults() {
    let args = extract_args(Cli::parse_from(["glossa", "extract"]));
    assert!(args.config.is_none());
    assert!(args.output.is_none());
    assert!(args.jobs.is_none());
    assert!(!args.quiet);
    assert!(args.paths.is_empty());
}

#[rstest]
fn extract_parses_every_option() {
    let args = extract_args(Cli::parse_from([
        "glossa",
        "extract",
        "--config",
        "conf/glossa.toml",
        "-o",
        "out.json",
        "-j",
        "3",
        "--quiet",
        "src",
        "lib/**/*.ts",
    ]));
    assert_eq!(args.config, Some(Utf8PathBuf::from("conf/glossa.toml")));
    assert_eq!(args.output, Some(Utf8PathBuf::from("out.json")));
    assert_eq!(args.jobs, Some(3));
    assert!(args.quiet);
    assert_eq!(args.paths, vec!["src", "lib/**/*.ts"]);
}

#[rstest]
#[case::zero("0")]
#[case::negative("-1")]
#[case::word("many")]
fn extract_rejects_unusable_job_counts(#[case] jobs: &str) {
    assert!(Cli::try_parse_from(["glossa", "extract", "--jobs", jobs]).is_err());
}

#[rstest]
fn id_parses_message_and_context() {
    let cli = Cli::parse_from(["glossa", "id", "right", "--context", "direction"]);
    let Command::Id(args) = cli.command else {
        panic!("expected the id command");
    };
    assert_eq!(args.message, "right");
    assert_eq!(args.context.as_deref(), Some("direction"));
}

#[rstest]
fn a_subcommand_is_required() {
    assert!(Cli::try_parse_from(["glossa"]).is_err());
}
