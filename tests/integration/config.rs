use crate::utils::*;

use anyhow::Result;
use inbound_checker::{Checker, Dependency, FailurePolicy, config::Config};

#[test]
fn whitelist_is_relative_to_config() -> Result<()> {
    let fixture = Fixture::builder()
        .config(
            r#"
accepted = ["Apache-2.0"]
whitelist = "whitelist.yml"
"#,
        )
        .whitelist(SIMPLE_WHITELIST)
        .build()?;

    let cfg = Config::load(&fixture.path(CONFIG_FILENAME))?;
    assert_eq!(cfg.whitelist, Some(fixture.path(WHITELIST_FILENAME)));

    let whitelist = cfg.load_whitelist()?;
    assert_eq!(whitelist.len(), 1);

    Ok(())
}

#[test]
fn whitelisted_dependencies_pass_even_when_failing_closed() -> Result<()> {
    let fixture = Fixture::builder()
        .config(
            r#"
clearly-defined-url = "http://127.0.0.1:1"
on-lookup-failure = "fail"
whitelist = "whitelist.yml"
"#,
        )
        .whitelist(SIMPLE_WHITELIST)
        .build()?;

    let cfg = Config::load(&fixture.path(CONFIG_FILENAME))?;
    let whitelist = cfg.load_whitelist()?;
    assert_eq!(cfg.on_lookup_failure, FailurePolicy::Fail);
    let checker = Checker::from_config(&cfg)?;

    let whitelisted = Dependency::new("org.springframework", "spring-context", "5.2.2.RELEASE");
    assert!(checker.check(&whitelisted, &whitelist).success);

    let unknown = Dependency::new("org.springframework", "spring-core", "5.2.2.RELEASE");
    assert!(!checker.check(&unknown, &whitelist).success);

    Ok(())
}

#[test]
fn missing_whitelist_is_an_error() -> Result<()> {
    let fixture = Fixture::builder()
        .config(r#"whitelist = "nope.yml""#)
        .build()?;

    let cfg = Config::load(&fixture.path(CONFIG_FILENAME))?;
    let err = cfg.load_whitelist().unwrap_err();

    assert!(format!("{err:#}").contains("unable to read whitelist"));

    Ok(())
}

#[test]
fn invalid_config_is_an_error() -> Result<()> {
    let fixture = Fixture::builder()
        .config(r#"accepted = "Apache-2.0""#)
        .build()?;

    let err = Config::load(&fixture.path(CONFIG_FILENAME)).unwrap_err();
    assert!(format!("{err:#}").contains("failed to deserialize config"));

    Ok(())
}

#[test]
fn unusable_service_url_is_an_error() -> Result<()> {
    let fixture = Fixture::builder()
        .config(
            r#"
accepted = ["MIT"]
clearly-defined-url = "mailto:nobody"
"#,
        )
        .build()?;

    let err = Config::load(&fixture.path(CONFIG_FILENAME)).unwrap_err();
    assert!(format!("{err:#}").contains("cannot be used as the base of a definitions url"));

    Ok(())
}
