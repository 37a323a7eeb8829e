//! `image` section: entrypoint and binary symlinks of the shipped stage

use super::{artifacts, RuleContext, SectionRule};
use crate::classify;
use crate::document::{DocMap, DocValue};
use crate::model::{CopyInstruction, Stage};
use std::path::Path;

/// Conventional binary directory symlinks point from
const CONVENTIONAL_BIN_DIR: &str = "/usr/bin";
const SHELL: &str = "/bin/sh";

pub struct ImageRule;

impl SectionRule for ImageRule {
    fn section(&self) -> &'static str {
        "image"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let mut image = DocMap::new();

        let Some(stage) = classify::final_stage_candidate(ctx.stages()) else {
            return DocValue::Map(image);
        };

        if let Some(entrypoint) = entrypoint(&stage.entrypoint) {
            image.insert("entrypoint", entrypoint);
        }

        let symlinks = symlinks(stage, ctx.builder_name);
        if !symlinks.is_empty() {
            let mut post = DocMap::new();
            post.insert("symlinks", symlinks);
            image.insert("post", post);
        }

        DocValue::Map(image)
    }
}

/// Inner command of a `/bin/sh -c <cmd>` entrypoint, else the first element
fn entrypoint(args: &[String]) -> Option<&str> {
    match args {
        [shell, flag, command] if shell == SHELL && flag == "-c" => Some(command.as_str()),
        [first, ..] => Some(first.as_str()),
        [] => None,
    }
}

fn symlinks(stage: &Stage, builder_name: &str) -> DocMap {
    let mut links = DocMap::new();

    for copy in stage.copy_instructions.iter().filter(|c| from_builder_like(c, builder_name)) {
        if !is_binary_dir(&copy.dest) {
            continue;
        }
        for src in copy.sources.iter().filter(|src| artifacts::is_binary_path(src)) {
            let Some(binary) = Path::new(src).file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let link = format!("{}/{}", CONVENTIONAL_BIN_DIR, binary);
            let target = resolve_dest(&copy.dest, binary);
            if target == link {
                continue;
            }
            let mut entry = DocMap::new();
            entry.insert("path", target);
            links.insert(link, entry);
        }
    }

    links
}

fn from_builder_like(copy: &CopyInstruction, builder_name: &str) -> bool {
    classify::is_builder_reference(&copy.from_stage, builder_name) || copy.from_stage.contains("build")
}

fn is_binary_dir(dest: &str) -> bool {
    dest.contains("/bin/") || dest.ends_with("/bin")
}

/// Destination file path of a copied binary. Directory destinations get the
/// binary name appended.
fn resolve_dest(dest: &str, binary: &str) -> String {
    if dest.ends_with('/') {
        format!("{}{}", dest, binary)
    } else if dest.ends_with("/bin") {
        format!("{}/{}", dest, binary)
    } else {
        dest.to_string()
    }
}
