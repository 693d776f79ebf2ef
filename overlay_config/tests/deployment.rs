//! End-to-end loading of a stacked deployment.

use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use overlay_config::lifecycle::PropertiesService;
use overlay_config::plan::PlanSettings;
use overlay_config::resource::{Layer, OverlayResolver, ResourceRoots};
use overlay_config::{OverlayError, PropertySnapshot};
use rstest::{fixture, rstest};
use test_helpers::{FragmentBuilder, OverlayTree, SectionBuilder, meta_conf, with_env};

#[fixture]
fn tree() -> Result<OverlayTree> {
    let tree = OverlayTree::new(["overlay", "base"])?;
    tree.write("base", "/WEB-INF/conf/metaConf.txt", &meta_conf(&["base.xml"]))?;
    tree.write(
        "base",
        "/WEB-INF/conf/base.xml",
        &FragmentBuilder::new()
            .alias("%HOST%", "localhost")
            .alias("%URL%", "jdbc://%HOST%/app")
            .section(SectionBuilder::new("db").entry("url", "%URL%").entry("pool", "4"))
            .section(SectionBuilder::new("mail").entry("host", "smtp.base").entry("port", "25"))
            .to_xml(),
    )?;
    tree.write("overlay", "/WEB-INF/conf/metaConf.txt", &meta_conf(&["overlay.xml"]))?;
    tree.write(
        "overlay",
        "/WEB-INF/conf/overlay.xml",
        &FragmentBuilder::new()
            .alias("HOST", "db.prod")
            .section(
                SectionBuilder::new("db")
                    .entry("user", "admin")
                    .encrypted("password", "czNjcjN0"),
            )
            .section(SectionBuilder::new("mail").no_inherit().entry("host", "smtp.prod"))
            .to_xml(),
    )?;
    tree.write(
        "base",
        "/WEB-INF/autoconf/tuning.config.xml",
        &FragmentBuilder::new()
            .section(SectionBuilder::new("db").entry("pool", "16"))
            .to_xml(),
    )?;
    Ok(tree)
}

fn load(tree: &OverlayTree) -> Result<(Arc<OverlayResolver>, Arc<PropertySnapshot>)> {
    let roots = ResourceRoots::new(tree.roots().iter().cloned()).map_err(|e| anyhow!("{e}"))?;
    let resolver = Arc::new(OverlayResolver::new(roots));
    let service = PropertiesService::new(Arc::clone(&resolver), PlanSettings::default());
    let snapshot = with_env(&[], || {
        service.start().map_err(|e| anyhow!("{e}"))?;
        service.snapshot().map_err(|e| anyhow!("{e}"))
    })?;
    Ok((resolver, snapshot))
}

#[rstest]
fn fragments_fold_in_priority_order(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    let (_, snapshot) = load(&tree)?;
    ensure!(
        snapshot.sources()
            == [
                "/WEB-INF/conf/base.xml",
                "/WEB-INF/conf/overlay.xml",
                "/WEB-INF/autoconf/tuning.config.xml",
            ],
        "{:?}",
        snapshot.sources()
    );

    let db = snapshot.configuration("db");
    ensure!(db.value("url").as_deref() == Some("jdbc://db.prod/app"));
    ensure!(db.value("user").as_deref() == Some("admin"));
    ensure!(db.value("password").as_deref() == Some("s3cr3t"));
    ensure!(db.value_as::<u32>("pool").map_err(|e| anyhow!("{e}"))? == Some(16));

    let mail = snapshot.configuration("mail");
    ensure!(mail.value("host").as_deref() == Some("smtp.prod"));
    ensure!(mail.value("port").is_none());
    Ok(())
}

#[rstest]
fn overlay_shadows_base_resources(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    let (resolver, _) = load(&tree)?;
    let meta = resolver
        .resolve("/WEB-INF/conf/metaConf.txt")
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(meta.layer() == Layer::Root(0));
    let overlays = resolver
        .overlays("/WEB-INF/conf/metaConf.txt")
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(overlays.len() == 2);
    let base_only = resolver
        .resolve("/WEB-INF/conf/base.xml")
        .map_err(|e| anyhow!("{e}"))?;
    ensure!(base_only.layer() == Layer::Root(1));
    let listing = resolver.list("/WEB-INF/conf").map_err(|e| anyhow!("{e}"))?;
    ensure!(
        listing.iter().map(String::as_str).collect::<Vec<_>>()
            == [
                "/WEB-INF/conf/base.xml",
                "/WEB-INF/conf/metaConf.txt",
                "/WEB-INF/conf/overlay.xml",
            ]
    );
    Ok(())
}

#[rstest]
fn duplicate_sections_abort_startup(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    tree.write(
        "overlay",
        "/WEB-INF/conf/overlay.xml",
        &FragmentBuilder::new()
            .section(SectionBuilder::new("db").entry("a", "1"))
            .section(SectionBuilder::new("db").entry("b", "2"))
            .to_xml(),
    )?;
    let roots = ResourceRoots::new(tree.roots().iter().cloned()).map_err(|e| anyhow!("{e}"))?;
    let service = PropertiesService::new(Arc::new(OverlayResolver::new(roots)), PlanSettings::default());
    let outcome = with_env(&[], || Ok(service.start()))?;
    let err = outcome.err().ok_or_else(|| anyhow!("duplicate section must fail"))?;
    ensure!(
        matches!(&*err, OverlayError::DuplicateSection { section, fragment }
            if section == "db" && fragment == "/WEB-INF/conf/overlay.xml"),
        "{err}"
    );
    ensure!(!service.is_active());
    Ok(())
}
