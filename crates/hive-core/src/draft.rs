//! Draft-answer generation seam.
//!
//! A new question gets a machine-written draft answer. Generation is
//! best-effort: implementations never fail, they degrade to
//! [`template_draft`], which depends only on its input.

use std::future::Future;

/// What the generator sees of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
  pub title: String,
  /// Sanitised body.
  pub body:  String,
}

/// Produces a draft answer for a question.
pub trait DraftGenerator: Send + Sync {
  /// Always yields a draft; internal failures fall back to
  /// [`template_draft`].
  fn generate(
    &self,
    request: DraftRequest,
  ) -> impl Future<Output = String> + Send + '_;
}

/// A generator that only ever uses the template. Used when no remote
/// generator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDrafter;

impl DraftGenerator for TemplateDrafter {
  async fn generate(&self, request: DraftRequest) -> String {
    template_draft(&request)
  }
}

/// Deterministic fallback draft.
///
/// Titles mentioning "how" get a step list, anything else a short conceptual
/// paragraph. Bodies containing a backtick get a code sketch.
pub fn template_draft(request: &DraftRequest) -> String {
  let mut out = format!(
    "Based on your question \"{}\", here is one way to approach it.\n\n",
    request.title
  );

  if request.title.to_lowercase().contains("how") {
    out.push_str("Work through it in steps:\n\n");
    out.push_str("1. Pin down exactly what the result should be.\n");
    out.push_str("2. Split the problem into parts you can check on their own.\n");
    out.push_str("3. Build and verify each part before moving on.\n\n");
  } else {
    out.push_str(
      "The main idea to get right is how the pieces you describe interact; \
       most of the behaviour follows from that.\n\n",
    );
  }

  if request.body.contains('`') {
    out.push_str("A minimal sketch:\n\n");
    out.push_str("```\n");
    out.push_str("// start from the smallest case that reproduces the issue\n");
    out.push_str("// and grow it until it matches your real code\n");
    out.push_str("```\n\n");
  }

  out.push_str(
    "Test the result against your own requirements and adjust as needed.\n\n",
  );
  out.push_str(
    "*This draft was generated automatically. Verify it before relying on it.*",
  );
  out
}
