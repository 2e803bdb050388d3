//! Syntax highlighting for raw JSON documents.
//!
//! Four scripts are injected one after another, each only once the previous
//! one reported completion: the stylesheet, the highlighting library, a script
//! that wraps the body text in a `<pre><code>` block, and the library's
//! highlight-all entry point. Each step reads what the previous one left in
//! the document, so the order is fixed.

use crate::context::{Asset, Assets};
use crate::engine::{ScriptId, ScriptResult, WebEngine};
use common::BrowserResult;
use std::collections::VecDeque;
use tracing::debug;

const WRAP_SCRIPT: &str = r#"
var content = document.body.innerText;
document.body.innerHTML = '<pre><code class="language-json"></code></pre>';
document.body.querySelector('code').textContent = content;
"#;

const HIGHLIGHT_SCRIPT: &str = "Prism.highlightAll();";

/// One injection in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightStep {
    Stylesheet,
    Library,
    Wrap,
    Highlight,
}

/// Where a pipeline stands after handling a completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Waiting for the completion of the given step.
    Running(HighlightStep),
    /// All four steps completed.
    Finished,
    /// A step failed; nothing further is injected.
    Aborted,
}

/// Whether a loaded URL should get JSON highlighting.
pub fn is_json_document(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.path().ends_with(".json"),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .is_some_and(|path| path.ends_with(".json")),
    }
}

/// Script that appends `css` to the document head as a `<style>` element.
pub fn stylesheet_script(css: &str) -> String {
    // A JSON string literal is a valid JavaScript string literal.
    let literal = serde_json::Value::String(css.to_string()).to_string();
    format!(
        "var style = document.createElement('style');\n\
         style.type = 'text/css';\n\
         style.innerHTML = {literal};\n\
         document.head.appendChild(style);"
    )
}

/// Sequential script-injection task list for one page load.
#[derive(Debug)]
pub struct HighlightPipeline {
    queued: VecDeque<(HighlightStep, String)>,
    pending: Option<(HighlightStep, ScriptId)>,
    state: PipelineState,
}

impl HighlightPipeline {
    /// Build the pipeline from the highlighting assets. Fails when either the
    /// library or its stylesheet is missing.
    pub fn prepare(assets: &Assets) -> BrowserResult<Self> {
        let css = assets.read_text(Asset::HighlightStylesheet)?;
        let library = assets.read_text(Asset::HighlightScript)?;

        let queued = VecDeque::from([
            (HighlightStep::Stylesheet, stylesheet_script(&css)),
            (HighlightStep::Library, library),
            (HighlightStep::Wrap, WRAP_SCRIPT.to_string()),
            (HighlightStep::Highlight, HIGHLIGHT_SCRIPT.to_string()),
        ]);

        Ok(Self {
            queued,
            pending: None,
            state: PipelineState::Running(HighlightStep::Stylesheet),
        })
    }

    /// Inject the first step.
    pub fn start(&mut self, engine: &mut dyn WebEngine) -> PipelineState {
        self.inject_next(engine)
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Handle a script completion. Completions for scripts this pipeline is
    /// not waiting on are ignored.
    pub fn on_script_finished(
        &mut self,
        id: ScriptId,
        result: &ScriptResult,
        engine: &mut dyn WebEngine,
    ) -> PipelineState {
        let Some((step, pending)) = self.pending else {
            return self.state;
        };
        if pending != id {
            return self.state;
        }
        self.pending = None;

        if let Err(error) = result {
            debug!(?step, %error, "json highlight step failed");
            self.queued.clear();
            self.state = PipelineState::Aborted;
            return self.state;
        }

        self.inject_next(engine)
    }

    /// Whether `id` is the completion this pipeline is waiting for.
    pub fn is_waiting_on(&self, id: ScriptId) -> bool {
        self.pending.is_some_and(|(_, pending)| pending == id)
    }

    fn inject_next(&mut self, engine: &mut dyn WebEngine) -> PipelineState {
        match self.queued.pop_front() {
            Some((step, script)) => {
                let id = engine.run_script(&script);
                debug!(?step, ?id, "injecting json highlight step");
                self.pending = Some((step, id));
                self.state = PipelineState::Running(step);
            }
            None => self.state = PipelineState::Finished,
        }
        self.state
    }
}
