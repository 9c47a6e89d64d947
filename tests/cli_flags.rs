mod harness;

use harness::TestContext;
use predicates::prelude::*;

#[test]
fn help_lists_flags_and_exits_zero() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--upgrade-install"))
        .stdout(predicate::str::contains("--create-launcher"))
        .stdout(predicate::str::contains("--very-silent"))
        .stdout(predicate::str::contains("--step"));
}

#[test]
fn short_help_exits_zero() {
    let ctx = TestContext::new();
    ctx.cli().arg("-h").assert().success().stdout(predicate::str::contains("Usage"));
}

#[test]
fn unknown_flag_prints_usage_and_exits_one() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"))
        .stderr(predicate::str::contains("Usage"));

    assert!(ctx.base_entries().is_empty());
}

#[test]
fn version_flag_is_not_accepted() {
    let ctx = TestContext::new();
    ctx.cli().arg("--version").assert().code(1);
}

#[test]
fn invalid_config_is_fatal() {
    let ctx = TestContext::new();
    ctx.write_config("bogus_key = 1\n");

    ctx.cli()
        .arg("-r")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration file"));
}

#[test]
fn very_silent_hides_errors_but_keeps_exit_code() {
    let ctx = TestContext::new();
    ctx.write_config("library_dirs = [\"a\", \"b\", \"c\", \"d\"]\n");

    ctx.cli().args(["-S", "-r"]).assert().code(1).stderr(predicate::str::is_empty());
}
