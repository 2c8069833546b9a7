use crate::utils::*;

use anyhow::Result;
use predicates::prelude::*;

#[test]
fn prints_placeholder_and_succeeds() -> Result<()> {
    let fixture = Fixture::builder().build()?;

    InboundChecker::new(&fixture)?
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "inbound-checker does not have a command line interface yet",
        ))
        .stderr("");

    Ok(())
}

#[test]
fn ignores_files_in_working_directory() -> Result<()> {
    let fixture = Fixture::builder()
        .whitelist("not: [valid")
        .config("not valid toml")
        .build()?;

    InboundChecker::new(&fixture)?.assert().success();

    Ok(())
}

#[test]
fn rejects_arguments() -> Result<()> {
    let fixture = Fixture::builder().build()?;

    InboundChecker::new(&fixture)?
        .arg("org.springframework:spring-context:5.2.2.RELEASE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));

    Ok(())
}

#[test]
fn prints_help() -> Result<()> {
    let fixture = Fixture::builder().build()?;

    InboundChecker::new(&fixture)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clearlydefined.io"));

    Ok(())
}
