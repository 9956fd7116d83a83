#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use mro_editor::ast::{
    BindingStatement, CallStatement, CompileSuccess, DependencyGraph, PipelineDeclaration,
};
use mro_editor::error::TransportError;
use mro_editor::render::{RenderedNodes, Renderer};
use mro_editor::session::{
    Backend, BuildResult, EditorConfig, FileEntry, IncludeFile, LoadedFile, SessionController,
};

// =============================================================================
// Fixtures
// =============================================================================

pub const MRO_PATH: &str = "/opt/pipelines/mro";
pub const ALT_MRO_PATH: &str = "/home/dev/mro";

pub fn config() -> EditorConfig {
    EditorConfig::new(vec![MRO_PATH.into(), ALT_MRO_PATH.into()])
}

pub fn count_reads_build() -> CompileSuccess {
    serde_json::from_str(include_str!("../fixtures/count_reads_build.json"))
        .expect("fixture should decode")
}

pub fn count_reads_file() -> FileEntry {
    FileEntry::new(MRO_PATH, "count_reads.mro")
}

pub const COUNT_READS_SOURCE: &str =
    "@include \"_types.mro\"\n\npipeline COUNT_PIPELINE(\n    in fastq sample_fastq,\n)\n";

pub fn count_reads_loaded() -> LoadedFile {
    LoadedFile {
        contents: COUNT_READS_SOURCE.into(),
        include_file: Some(IncludeFile {
            mro_path: MRO_PATH.into(),
            name: "_types.mro".into(),
            contents: "filetype bam;\nfiletype fastq;\n".into(),
        }),
    }
}

/// Linear chain `ids[0] -> ids[1] -> ...`, edge `i` labelled `in_i`.
pub fn chain(ids: &[&str]) -> PipelineDeclaration {
    let calls = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let bindings = if i == 0 {
                vec![]
            } else {
                vec![BindingStatement::call(format!("in_{}", i), ids[i - 1])]
            };
            CallStatement::new(*id, bindings)
        })
        .collect();
    PipelineDeclaration::new("CHAIN", calls)
}

// =============================================================================
// Fake backend
// =============================================================================

/// Scripted backend that records every request it receives.
#[derive(Default)]
pub struct FakeBackend {
    pub files: Vec<FileEntry>,
    pub loads: HashMap<String, LoadedFile>,
    pub builds: RefCell<VecDeque<Result<BuildResult, TransportError>>>,
    pub fail_list: bool,
    pub fail_save: bool,
    pub calls: RefCell<Vec<String>>,
    pub saved: RefCell<Vec<(FileEntry, String)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: FileEntry, loaded: LoadedFile) -> Self {
        self.loads.insert(file.fname.clone(), loaded);
        self.files.push(file);
        self
    }

    pub fn with_build(self, result: Result<BuildResult, TransportError>) -> Self {
        self.builds.borrow_mut().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Backend for FakeBackend {
    async fn list_files(&self) -> Result<Vec<FileEntry>, TransportError> {
        self.record("list".into());
        if self.fail_list {
            return Err(TransportError::new("list", "connection refused"));
        }
        Ok(self.files.clone())
    }

    async fn load_file(&self, file: &FileEntry) -> Result<LoadedFile, TransportError> {
        self.record(format!("load {}", file.fname));
        self.loads
            .get(&file.fname)
            .cloned()
            .ok_or_else(|| TransportError::new("load", "404 Not Found"))
    }

    async fn build(&self, file: &FileEntry) -> Result<BuildResult, TransportError> {
        self.record(format!("build {}", file.fname));
        self.builds
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("build", "no scripted response")))
    }

    async fn save(&self, file: &FileEntry, contents: &str) -> Result<(), TransportError> {
        self.record(format!("save {}", file.fname));
        if self.fail_save {
            return Err(TransportError::new("save", "500 Internal Server Error"));
        }
        self.saved
            .borrow_mut()
            .push((file.clone(), contents.to_string()));
        Ok(())
    }
}

// =============================================================================
// Recording renderer
// =============================================================================

/// Keeps every graph it was asked to draw and every handle committed to it.
#[derive(Default)]
pub struct RecordingRenderer {
    pub rendered: Vec<(String, DependencyGraph)>,
    pub committed: Vec<RenderedNodes>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, container_id: &str, graph: &DependencyGraph) -> RenderedNodes {
        self.rendered.push((container_id.to_string(), graph.clone()));
        RenderedNodes::from_graph(container_id, graph)
    }

    fn commit(&mut self, nodes: &RenderedNodes) {
        self.committed.push(nodes.clone());
    }
}

pub type Controller = SessionController<FakeBackend, RecordingRenderer>;

pub fn controller(backend: FakeBackend) -> Controller {
    SessionController::new(config(), backend, RecordingRenderer::default())
        .expect("config should be valid")
}
