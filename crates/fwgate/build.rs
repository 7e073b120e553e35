// Renders `fwgate.1` plus one page per visible subcommand into
// `$OUT_DIR/man` (`fwgate-plan.1`, `fwgate-config-show.1`, ...).

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

#[allow(dead_code)]
#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?);
    let man_dir = out_dir.join("man");
    std::fs::create_dir_all(&man_dir)?;

    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        write_page(&cmd, &man_dir)?;

        let parent = cmd.get_name().to_owned();
        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{parent}-{}", sub.get_name()))),
        );
    }
    Ok(())
}

fn write_page(cmd: &clap::Command, man_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut page = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut page)?;
    std::fs::write(man_dir.join(format!("{}.1", cmd.get_name())), page)?;
    Ok(())
}
