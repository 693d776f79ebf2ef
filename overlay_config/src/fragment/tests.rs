//! Tests for fragment parsing.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use test_helpers::{FragmentBuilder, SectionBuilder};

use super::Fragment;
use crate::OverlayError;
use crate::codec::{Base64Codec, RejectCodec};

fn parse(text: &str) -> crate::OverlayResult<Fragment> {
    Fragment::parse("/WEB-INF/conf/app.xml", text, &Base64Codec)
}

#[test]
fn reads_aliases_and_sections() -> Result<()> {
    let xml = FragmentBuilder::new()
        .alias("%HOST%", "db.local")
        .section(
            SectionBuilder::new("db")
                .entry("url", "jdbc://%HOST%/app")
                .entry("user", "admin"),
        )
        .section(SectionBuilder::new("mail").no_inherit().entry("from", "a@b"))
        .to_xml();
    let fragment = parse(&xml).map_err(|e| anyhow!("{e}"))?;
    ensure!(fragment.name() == "/WEB-INF/conf/app.xml", "{}", fragment.name());
    ensure!(
        fragment.aliases() == [("%HOST%".to_owned(), "db.local".to_owned())],
        "{:?}",
        fragment.aliases()
    );
    let [db, mail] = fragment.sections() else {
        return Err(anyhow!("expected two sections, got {:?}", fragment.sections()));
    };
    ensure!(db.name() == "db" && db.inherits(), "{db:?}");
    ensure!(db.entries().len() == 2, "{db:?}");
    ensure!(mail.name() == "mail" && !mail.inherits(), "{mail:?}");
    Ok(())
}

#[rstest]
#[case("no")]
#[case("NO")]
#[case("No")]
fn inherit_no_is_case_insensitive(#[case] flag: &str) -> Result<()> {
    let xml = format!(
        r#"<root><properties><section name="s" inherit="{flag}"/></properties></root>"#
    );
    let fragment = parse(&xml).map_err(|e| anyhow!("{e}"))?;
    ensure!(
        fragment.sections().iter().all(|s| !s.inherits()),
        "{fragment:?}"
    );
    Ok(())
}

#[test]
fn duplicate_section_in_one_fragment_is_fatal() {
    let xml = FragmentBuilder::new()
        .section(SectionBuilder::new("db").entry("a", "1"))
        .section(SectionBuilder::new("db").entry("b", "2"))
        .to_xml();
    let err = parse(&xml).expect_err("duplicate section must fail");
    match err.as_ref() {
        OverlayError::DuplicateSection { section, fragment } => {
            assert_eq!(section, "db");
            assert_eq!(fragment, "/WEB-INF/conf/app.xml");
        }
        other => panic!("expected DuplicateSection, got {other:?}"),
    }
}

#[test]
fn duplicate_section_across_properties_blocks_is_fatal() {
    let xml = concat!(
        r#"<root>"#,
        r#"<properties><section name="db"><entry name="a" value="1"/></section></properties>"#,
        r#"<properties><section name="db"><entry name="b" value="2"/></section></properties>"#,
        r#"</root>"#,
    );
    let err = parse(xml).expect_err("duplicate section must fail");
    assert!(
        matches!(err.as_ref(), OverlayError::DuplicateSection { section, .. } if section == "db"),
        "unexpected error {err:?}"
    );
}

#[test]
fn encrypted_values_are_decoded() -> Result<()> {
    let xml = FragmentBuilder::new()
        .section(
            SectionBuilder::new("db")
                .encrypted("password", "c2VjcmV0")
                .encrypted("empty", ""),
        )
        .to_xml();
    let fragment = parse(&xml).map_err(|e| anyhow!("{e}"))?;
    let entries = fragment
        .sections()
        .first()
        .map(super::SectionDecl::entries)
        .ok_or_else(|| anyhow!("missing section"))?;
    ensure!(
        entries
            == [
                ("password".to_owned(), "secret".to_owned()),
                ("empty".to_owned(), String::new()),
            ],
        "{entries:?}"
    );
    Ok(())
}

#[test]
fn decode_failure_names_the_key() {
    let xml = FragmentBuilder::new()
        .section(SectionBuilder::new("db").encrypted("password", "c2VjcmV0"))
        .to_xml();
    let err = Fragment::parse("f.xml", &xml, &RejectCodec).expect_err("codec refuses");
    assert!(
        matches!(err.as_ref(), OverlayError::Decode { key, .. } if key == "password"),
        "unexpected error {err:?}"
    );
    assert!(err.to_string().contains("'password'"), "{err}");
}

#[test]
fn incomplete_declarations_are_skipped() -> Result<()> {
    let xml = r#"<root>
        <properties>
            <section><entry name="lost" value="x"/></section>
            <section name="kept">
                <entry value="no-key"/>
                <entry name="no-value"/>
                <entry name="" value="empty-key"/>
                <entry name="ok" value=""/>
            </section>
        </properties>
    </root>"#;
    let fragment = parse(xml).map_err(|e| anyhow!("{e}"))?;
    let [kept] = fragment.sections() else {
        return Err(anyhow!("expected one section, got {:?}", fragment.sections()));
    };
    ensure!(
        kept.entries() == [("ok".to_owned(), String::new())],
        "{:?}",
        kept.entries()
    );
    Ok(())
}

#[test]
fn unexpected_elements_are_collected() {
    let xml = r#"<root>
        <settings/>
        <properties>
            <group name="x"/>
            <section name="s"><item name="a" value="b"/></section>
        </properties>
    </root>"#;
    let err = parse(xml).expect_err("structure must be rejected");
    match err.as_ref() {
        OverlayError::Malformed { messages, .. } => assert_eq!(messages.len(), 3, "{messages:?}"),
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[rstest]
#[case("<root><properties></root>")]
#[case("<root/><root/>")]
#[case("")]
#[case("<root>text</root>")]
fn malformed_documents_are_rejected(#[case] xml: &str) {
    let err = parse(xml).expect_err("document must be rejected");
    assert!(
        matches!(err.as_ref(), OverlayError::Malformed { .. }),
        "unexpected error {err:?}"
    );
}

#[test]
fn entity_references_are_unescaped() -> Result<()> {
    let xml = r#"<root><properties><section name="jndi">
        <entry name="url" value="ldap://tl/o=B&amp;P,c=DE"/>
    </section></properties></root>"#;
    let fragment = parse(xml).map_err(|e| anyhow!("{e}"))?;
    let value = fragment
        .sections()
        .first()
        .and_then(|s| s.entries().first())
        .map(|(_, v)| v.as_str());
    ensure!(value == Some("ldap://tl/o=B&P,c=DE"), "{value:?}");
    Ok(())
}
