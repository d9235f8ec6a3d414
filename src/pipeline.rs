//! End-to-end orchestration: plan, redact, save, split.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::engine::{PdfDocument, RedactableDocument};
use crate::error::Result;
use crate::model::{DetectionManifest, RedactionPlan};
use crate::options::RedactionOptions;
use crate::plan::OpinionPlanner;
use crate::redact::Redactor;
use crate::split::{BoundaryMaps, OpinionSplitter};

/// What one pipeline run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Body-redacted document
    pub redacted_path: PathBuf,
    /// Per-opinion masked documents, one per span
    pub opinion_paths: Vec<PathBuf>,
    /// The plan that was applied
    pub plan: RedactionPlan,
}

/// Runs the whole pipeline over PDF files.
///
/// Holds the opinion planner so case numbering continues across
/// documents when one pipeline processes a batch.
#[derive(Debug)]
pub struct RedactionPipeline {
    options: RedactionOptions,
    planner: OpinionPlanner,
}

impl RedactionPipeline {
    /// Create a pipeline.
    pub fn new(options: RedactionOptions) -> Self {
        Self {
            planner: OpinionPlanner::new(options.clone()),
            options,
        }
    }

    /// Validate the manifest and plan redactions without touching any
    /// document.
    pub fn plan(&mut self, manifest: &DetectionManifest) -> Result<RedactionPlan> {
        manifest.validate()?;
        Ok(self.planner.plan(&manifest.objects, manifest.first_page))
    }

    /// Redact `input` and split it into per-opinion documents under
    /// `out_dir`.
    pub fn run(
        &mut self,
        input: &Path,
        manifest: &DetectionManifest,
        out_dir: &Path,
    ) -> Result<PipelineOutput> {
        let plan = self.plan(manifest)?;

        info!("redacting {}", input.display());
        let mut doc = PdfDocument::open(input)?;
        let redactor = Redactor::new(self.options.clone());
        redactor.apply(&mut doc, &plan, manifest)?;

        fs::create_dir_all(out_dir)?;
        let extension = input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("pdf")
            .to_string();
        let redacted_path = out_dir.join(redacted_name(input, &extension));
        doc.save(&redacted_path)?;
        info!("saved redacted document to {}", redacted_path.display());

        let splitter = OpinionSplitter::new(self.options.clone());
        let maps = BoundaryMaps {
            columns: &manifest.page_columns,
            headers: &plan.page_headers,
            footers: &plan.page_footers,
        };
        let opinion_paths = splitter.split_to_dir(
            &doc,
            &plan.spans,
            maps,
            &out_dir.join("masked"),
            &extension,
        )?;

        Ok(PipelineOutput {
            redacted_path,
            opinion_paths,
            plan,
        })
    }
}

fn redacted_name(input: &Path, extension: &str) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{stem}_redacted.{extension}")
}
