//! `cargo xtask generate-dom-completions`

use anyhow::{anyhow, Context, Result};
use html_id_dom::{CompletionDatabase, Member, ELEMENT_TYPES};
use std::path::{Path, PathBuf};

use crate::tsserver::TsServer;

const ARTIFACT_PATH: &str = "crates/dom/data/dom-completions.json";

/// Something that can list the members of a DOM type.
pub trait TypeAnalysisService {
    fn member_completions(&mut self, type_name: &str) -> Result<Vec<Member>>;
}

/// Stands in when tsserver can't be started so every type degrades the same way.
struct Unavailable(String);

impl TypeAnalysisService for Unavailable {
    fn member_completions(&mut self, _type_name: &str) -> Result<Vec<Member>> {
        Err(anyhow!("{}", self.0))
    }
}

pub fn run(root: &Path) -> Result<()> {
    println!("Generating DOM completions...");

    let program = tsserver_program(root);
    let mut service: Box<dyn TypeAnalysisService> = match TsServer::spawn(&program) {
        Ok(server) => Box::new(server),
        Err(err) => {
            eprintln!("warning: {err:#}");
            Box::new(Unavailable(format!("{err:#}")))
        }
    };

    let database = generate(service.as_mut(), ELEMENT_TYPES);
    drop(service);

    let out_path = root.join(ARTIFACT_PATH);
    let json = database.to_json().context("Failed to serialize completions")?;
    std::fs::write(&out_path, &json)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    let size = std::fs::metadata(&out_path)?.len();
    println!("\nGenerated {}", out_path.display());
    #[allow(clippy::cast_precision_loss)]
    let kilobytes = size as f64 / 1024.0;
    println!("Size: {kilobytes:.1} KB");
    println!("Types: {}", database.type_count());
    println!("Total completions: {}", database.member_count());

    Ok(())
}

/// Query every type in order. Failures become an empty member list.
pub fn generate(service: &mut dyn TypeAnalysisService, types: &[&str]) -> CompletionDatabase {
    let mut database = CompletionDatabase::new();

    for &type_name in types {
        println!("  Processing {type_name}...");
        let members = match service.member_completions(type_name) {
            Ok(members) if members.is_empty() => {
                eprintln!("warning: no completions for {type_name}");
                members
            }
            Ok(members) => members,
            Err(err) => {
                eprintln!("warning: {type_name}: {err:#}");
                Vec::new()
            }
        };
        database.insert(type_name, members);
    }

    database
}

fn tsserver_program(root: &Path) -> PathBuf {
    if let Some(program) = std::env::var_os("TSSERVER") {
        return PathBuf::from(program);
    }
    let local = root.join("node_modules/.bin/tsserver");
    if local.is_file() {
        local
    } else {
        PathBuf::from("tsserver")
    }
}
