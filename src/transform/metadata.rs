//! Top-level package metadata fields

use super::{RuleContext, TransformOptions};
use crate::document::SpecDocument;

pub fn populate(doc: &mut SpecDocument, ctx: &RuleContext<'_>, options: &TransformOptions) {
    doc.set("packager", options.packager.as_str());
    doc.set("vendor", options.vendor.as_str());

    // Unresolved fields stay as empty strings for manual input
    doc.set("license", ctx.repo_field(|repo| repo.license.as_str()).unwrap_or_default());
    doc.set("website", ctx.repo_field(|repo| repo.website.as_str()).unwrap_or_default());
    doc.set(
        "description",
        ctx.repo_field(|repo| repo.description.as_str())
            .unwrap_or_default(),
    );

    doc.set("version", "${VERSION}");
    doc.set("revision", "${REVISION}");
}
