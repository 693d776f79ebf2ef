//! End-to-end tests running the `overlay-inspect` binary.

use anyhow::{Result, ensure};
use assert_cmd::Command;
use rstest::{fixture, rstest};
use test_helpers::{FragmentBuilder, OverlayTree, SectionBuilder, meta_conf};

#[fixture]
fn tree() -> Result<OverlayTree> {
    let tree = OverlayTree::new(["overlay", "base"])?;
    tree.write("base", "/WEB-INF/conf/metaConf.txt", &meta_conf(&["base.xml"]))?;
    tree.write(
        "base",
        "/WEB-INF/conf/base.xml",
        &FragmentBuilder::new()
            .alias("%HOST%", "localhost")
            .section(
                SectionBuilder::new("db")
                    .entry("url", "jdbc://%HOST%/app")
                    .encrypted("password", "c2VjcmV0"),
            )
            .to_xml(),
    )?;
    tree.write("overlay", "/WEB-INF/conf/metaConf.txt", &meta_conf(&["overlay.xml"]))?;
    tree.write(
        "overlay",
        "/WEB-INF/conf/overlay.xml",
        &FragmentBuilder::new()
            .alias("%HOST%", "db.prod")
            .section(SectionBuilder::new("db").entry("user", "admin"))
            .to_xml(),
    )?;
    Ok(tree)
}

fn inspect(tree: &OverlayTree, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_overlay-inspect"));
    cmd.env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", tree.base().as_str())
        .env("HOME", tree.base().as_str());
    for root in tree.roots() {
        cmd.arg("--root").arg(root.as_str());
    }
    cmd.args(args);
    cmd
}

fn stdout_of(tree: &OverlayTree, args: &[&str]) -> Result<String> {
    let output = inspect(tree, args).output()?;
    ensure!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?)
}

#[rstest]
fn get_prints_expanded_values(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    ensure!(stdout_of(&tree, &["get", "db", "url"])? == "jdbc://db.prod/app\n");
    ensure!(stdout_of(&tree, &["get", "db", "password"])? == "secret\n");
    ensure!(stdout_of(&tree, &["get", "db", "port", "--default", "5432"])? == "5432\n");
    Ok(())
}

#[rstest]
fn show_merges_base_and_overlay(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    let text = stdout_of(&tree, &["show", "db"])?;
    ensure!(
        text == "password = secret\nurl = jdbc://db.prod/app\nuser = admin\n",
        "{text}"
    );
    let raw = stdout_of(&tree, &["show", "db", "--raw"])?;
    ensure!(raw.contains("url = jdbc://%HOST%/app"), "{raw}");
    Ok(())
}

#[rstest]
fn resolve_reports_the_providing_root(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    let first = stdout_of(&tree, &["resolve", "/WEB-INF/conf/metaConf.txt"])?;
    ensure!(first.starts_with("root 0\t"), "{first}");
    let all = stdout_of(&tree, &["resolve", "--all", "/WEB-INF/conf/metaConf.txt"])?;
    ensure!(all.lines().count() == 2, "{all}");
    ensure!(all.lines().nth(1).is_some_and(|line| line.starts_with("root 1\t")));
    Ok(())
}

#[rstest]
fn plan_and_listing(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    ensure!(
        stdout_of(&tree, &["plan"])? == "/WEB-INF/conf/base.xml\n/WEB-INF/conf/overlay.xml\n"
    );
    let listing = stdout_of(&tree, &["list", "/WEB-INF/conf"])?;
    ensure!(
        listing
            == "/WEB-INF/conf/base.xml\n/WEB-INF/conf/metaConf.txt\n/WEB-INF/conf/overlay.xml\n",
        "{listing}"
    );
    Ok(())
}

#[rstest]
fn dump_emits_json(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    let text = stdout_of(&tree, &["dump"])?;
    ensure!(text.trim_start().starts_with('{'), "{text}");
    ensure!(text.contains("\"HOST\": \"db.prod\""), "{text}");
    Ok(())
}

#[rstest]
fn aliases_prefer_the_overlay(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    let text = stdout_of(&tree, &["aliases"])?;
    ensure!(text == "%HOST% = db.prod\n", "{text}");
    Ok(())
}

#[rstest]
fn failures_exit_non_zero(tree: Result<OverlayTree>) -> Result<()> {
    let tree = tree?;
    let missing = inspect(&tree, &["get", "db", "port"]).output()?;
    ensure!(!missing.status.success());
    ensure!(String::from_utf8_lossy(&missing.stderr).contains("no value for 'port'"));

    let rejected = inspect(&tree, &["--codec", "reject", "sections"]).output()?;
    ensure!(!rejected.status.success());
    ensure!(String::from_utf8_lossy(&rejected.stderr).contains("password"));
    Ok(())
}
