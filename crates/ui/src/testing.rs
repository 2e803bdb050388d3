//! Test doubles shared by the unit tests in this crate.

use crate::engine::{EngineFactory, ScriptId, WebEngine};
use crate::tab::TabId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Everything a [`RecordingEngine`] was asked to do.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub loads: Vec<String>,
    pub calls: Vec<&'static str>,
    pub scripts: Vec<String>,
    pub opened_in_place: Vec<String>,
}

/// Engine that records calls instead of rendering anything. Events are fed
/// to the tab by the test itself.
pub struct RecordingEngine {
    url: String,
    next_script: u64,
    log: Arc<Mutex<EngineLog>>,
}

impl RecordingEngine {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            next_script: 0,
            log: Arc::new(Mutex::new(EngineLog::default())),
        }
    }

    pub fn log(&self) -> Arc<Mutex<EngineLog>> {
        self.log.clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.log.lock().scripts.clone()
    }

    pub fn last_script_id(&self) -> Option<ScriptId> {
        (self.next_script > 0).then_some(ScriptId(self.next_script))
    }
}

impl WebEngine for RecordingEngine {
    fn load(&mut self, url: &str) {
        self.url = url.to_string();
        self.log.lock().loads.push(url.to_string());
    }

    fn back(&mut self) {
        self.log.lock().calls.push("back");
    }

    fn forward(&mut self) {
        self.log.lock().calls.push("forward");
    }

    fn reload(&mut self) {
        self.log.lock().calls.push("reload");
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn run_script(&mut self, code: &str) -> ScriptId {
        self.next_script += 1;
        self.log.lock().scripts.push(code.to_string());
        ScriptId(self.next_script)
    }

    fn open_in_place(&mut self, url: &str) {
        self.log.lock().opened_in_place.push(url.to_string());
        self.load(url);
    }
}

/// Factory handing out [`RecordingEngine`]s and keeping their logs per tab.
#[derive(Default)]
pub struct RecordingFactory {
    logs: Mutex<HashMap<TabId, Arc<Mutex<EngineLog>>>>,
}

impl RecordingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn log(&self, tab: TabId) -> Arc<Mutex<EngineLog>> {
        self.logs
            .lock()
            .get(&tab)
            .cloned()
            .unwrap_or_else(|| panic!("no engine created for {tab}"))
    }

    pub fn created(&self) -> usize {
        self.logs.lock().len()
    }
}

impl EngineFactory for RecordingFactory {
    fn create(&self, tab: TabId) -> Box<dyn WebEngine> {
        let engine = RecordingEngine::new("about:blank");
        self.logs.lock().insert(tab, engine.log());
        Box::new(engine)
    }
}

pub fn write_highlight_assets(root: &Path) {
    std::fs::create_dir_all(root.join("prismjs")).unwrap();
    let library = "var Prism = { highlightAll: function () {} };";
    let stylesheet = "code[class*=\"language-\"] { color: #ccc; }";
    std::fs::write(root.join("prismjs/prism.js"), library).unwrap();
    std::fs::write(root.join("prismjs/prism.css"), stylesheet).unwrap();
}

pub fn write_placeholder_icon(root: &Path) {
    std::fs::create_dir_all(root.join("public")).unwrap();
    std::fs::write(root.join("public/no_icon_icon.png"), [0x89, b'P', b'N', b'G']).unwrap();
}
