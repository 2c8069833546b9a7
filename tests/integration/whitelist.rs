use crate::utils::*;

use anyhow::Result;
use inbound_checker::{
    Dependency, WhitelistEntry, is_whitelisted, load_whitelist, whitelist::WhitelistError,
};

#[test]
fn loads_simple_whitelist() -> Result<()> {
    let fixture = Fixture::builder().whitelist(SIMPLE_WHITELIST).build()?;

    let whitelist = load_whitelist(fixture.path(WHITELIST_FILENAME))?;

    assert_eq!(
        *whitelist,
        [
            WhitelistEntry::new("org.springframework/spring-context", "5.2.2.RELEASE")
                .with_issue("https://issues.example.com/123")
                .with_comment("N/A")
        ]
    );

    assert!(is_whitelisted(
        &Dependency::new("org.springframework", "spring-context", "5.2.2.RELEASE"),
        &whitelist
    ));

    Ok(())
}

#[test]
fn preserves_unknown_keys() -> Result<()> {
    let fixture = Fixture::builder()
        .whitelist(
            "\
- name: com.example/thing
  version: '1.0'
  reviewer: someone
",
        )
        .build()?;

    let whitelist = load_whitelist(fixture.path(WHITELIST_FILENAME))?;

    assert_eq!(whitelist.len(), 1);
    assert_eq!(whitelist[0].version.as_deref(), Some("1.0"));
    assert_eq!(
        whitelist[0].extra.get("reviewer").and_then(|v| v.as_str()),
        Some("someone")
    );

    Ok(())
}

#[test]
fn malformed_file_is_a_parse_error() -> Result<()> {
    let fixture = Fixture::builder()
        .whitelist("- name: [org.springframework/spring-context\n")
        .build()?;

    let err = load_whitelist(fixture.path(WHITELIST_FILENAME)).unwrap_err();
    assert!(matches!(err, WhitelistError::Parse { .. }), "{err:?}");

    Ok(())
}

#[test]
fn missing_file_is_a_read_error() -> Result<()> {
    let fixture = Fixture::builder().build()?;

    let err = load_whitelist(fixture.path(WHITELIST_FILENAME)).unwrap_err();
    assert!(matches!(err, WhitelistError::Read { .. }), "{err:?}");

    Ok(())
}
