//! Session controller: file discovery, load, new file, build, tab selection, save.
//!
//! Every backend round trip is split into `begin_*` (local checks, request
//! ticket) and `complete_*` (apply the response). Hosts with an event loop
//! drive the two halves themselves; hosts that can simply await use the async
//! wrappers. A completion whose ticket has been superseded is dropped, so a
//! slow response never overwrites fresher state.

use tracing::{debug, info, warn};

use super::backend::{Backend, BuildResult, FileEntry, LoadedFile};
use super::buffer::{MemoryBuffer, TextBuffer};
use super::config::EditorConfig;
use super::editor::EditorSession;
use crate::ast::{PipelineDeclaration, build_graph};
use crate::diagnostic::parse_error_location;
use crate::error::{Result, TransportError, UserInputError};
use crate::format::build_summary;
use crate::render::{RenderedNodes, Renderer, render_styled};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request of the same kind (or a file switch) superseded this one.
    Stale,
}

#[derive(Debug, Clone)]
pub struct PendingLoad {
    pub ticket: Ticket,
    pub file: FileEntry,
}

#[derive(Debug, Clone)]
pub struct PendingBuild {
    pub ticket: Ticket,
    pub file: FileEntry,
}

#[derive(Debug, Clone)]
pub struct PendingSave {
    pub file: FileEntry,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainState {
    Unselected,
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    NotBuilt,
    Error,
    Success,
}

pub struct SessionController<B, R, T = MemoryBuffer> {
    config: EditorConfig,
    backend: B,
    renderer: R,
    mro_path: String,
    main: EditorSession<T>,
    include: EditorSession<T>,
    available_files: Vec<FileEntry>,
    compiler_messages: String,
    build_result: Option<BuildResult>,
    active_tab: Option<usize>,
    error_line: Option<u32>,
    rendered: Option<RenderedNodes>,
    next_seq: u64,
    latest_list: u64,
    latest_load: u64,
    latest_build: u64,
}

fn pipelines_of(result: &Option<BuildResult>) -> &[PipelineDeclaration] {
    match result {
        Some(BuildResult::CompileSuccess(success)) => &success.pipelines,
        _ => &[],
    }
}

impl<B, R: Renderer, T: TextBuffer> SessionController<B, R, T> {
    pub fn new(config: EditorConfig, backend: B, renderer: R) -> Result<Self> {
        config.validate()?;
        let mro_path = config.initial_mro_path().to_string();
        let main = EditorSession::editable(&mro_path, &config.placeholder_name);
        Ok(SessionController {
            config,
            backend,
            renderer,
            mro_path,
            main,
            include: EditorSession::read_only(),
            available_files: Vec::new(),
            compiler_messages: String::new(),
            build_result: None,
            active_tab: None,
            error_line: None,
            rendered: None,
            next_seq: 0,
            latest_list: 0,
            latest_load: 0,
            latest_build: 0,
        })
    }

    fn issue(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Drop the previous build and everything derived from it.
    fn clear_build(&mut self) {
        self.compiler_messages.clear();
        self.build_result = None;
        self.active_tab = None;
        self.error_line = None;
        self.rendered = None;
        // responses for the old source must not land
        self.latest_build = self.issue();
    }

    // ------------------------------------------------------------------
    // File discovery
    // ------------------------------------------------------------------

    pub fn begin_refresh_files(&mut self) -> Ticket {
        self.latest_list = self.issue();
        Ticket(self.latest_list)
    }

    pub fn complete_refresh_files(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<Vec<FileEntry>, TransportError>,
    ) -> Result<Completion> {
        if ticket.0 != self.latest_list {
            debug!("dropping stale file listing");
            return Ok(Completion::Stale);
        }
        let files = result?;
        info!(count = files.len(), "file list refreshed");
        self.available_files = files;
        Ok(Completion::Applied)
    }

    pub fn select_mro_path(&mut self, mro_path: &str) -> Result<()> {
        if !self.config.knows_mro_path(mro_path) {
            warn!(mro_path, "rejecting unknown mro path");
            return Err(UserInputError::UnknownMroPath(mro_path.to_string()).into());
        }
        self.mro_path = mro_path.to_string();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Select file
    // ------------------------------------------------------------------

    pub fn begin_select_file(&mut self, file: &FileEntry) -> PendingLoad {
        self.latest_load = self.issue();
        PendingLoad {
            ticket: Ticket(self.latest_load),
            file: file.clone(),
        }
    }

    pub fn complete_select_file(
        &mut self,
        pending: PendingLoad,
        result: std::result::Result<LoadedFile, TransportError>,
    ) -> Result<Completion> {
        if pending.ticket.0 != self.latest_load {
            debug!(fname = %pending.file.fname, "dropping stale load");
            return Ok(Completion::Stale);
        }
        let loaded = result?;

        let file = pending.file;
        self.main.init(&file.mro_path, &file.fname, &loaded.contents);
        if let Some(include) = &loaded.include_file {
            self.include
                .init(&include.mro_path, &include.name, &include.contents);
        }
        self.clear_build();

        info!(
            mro_path = %file.mro_path,
            fname = %file.fname,
            include = loaded.include_file.is_some(),
            "file loaded"
        );
        Ok(Completion::Applied)
    }

    // ------------------------------------------------------------------
    // New file
    // ------------------------------------------------------------------

    pub fn new_file(&mut self, fname: &str) -> Result<()> {
        let fname = fname.trim();
        if fname.is_empty() {
            warn!("rejecting new file without a name");
            return Err(UserInputError::EmptyFileName.into());
        }

        let mro_path = self.mro_path.clone();
        self.available_files.push(FileEntry::new(&mro_path, fname));
        self.main.init(&mro_path, fname, "");
        self.main.set_dirty(true);
        self.include.reset();
        self.clear_build();
        // an in-flight load must not replace the new file
        self.latest_load = self.issue();

        info!(mro_path = %mro_path, fname, "new file");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------

    pub fn begin_build(&mut self) -> Result<PendingBuild> {
        let Some(file) = self.main.file() else {
            warn!("build requested with no file selected");
            return Err(UserInputError::NoFileSelected.into());
        };
        self.latest_build = self.issue();
        Ok(PendingBuild {
            ticket: Ticket(self.latest_build),
            file,
        })
    }

    pub fn complete_build(
        &mut self,
        pending: PendingBuild,
        result: std::result::Result<BuildResult, TransportError>,
    ) -> Result<Completion> {
        if pending.ticket.0 != self.latest_build {
            debug!(fname = %pending.file.fname, "dropping stale build");
            return Ok(Completion::Stale);
        }
        let result = result?;

        self.rendered = None;
        self.active_tab = None;
        match &result {
            BuildResult::CompileError { message } => {
                self.error_line = parse_error_location(message);
                if let Some(line) = self.error_line {
                    self.main.goto_line(line);
                }
                self.compiler_messages = message.clone();
                info!(fname = %pending.file.fname, line = ?self.error_line, "build failed");
            }
            BuildResult::CompileSuccess(success) => {
                self.error_line = None;
                self.compiler_messages = build_summary(success);
                info!(
                    fname = %pending.file.fname,
                    filetypes = success.filetype_count(),
                    stages = success.stage_count(),
                    pipelines = success.pipeline_count(),
                    "build succeeded"
                );
            }
        }
        self.build_result = Some(result);

        if !self.pipelines().is_empty() {
            self.select_tab(0)?;
        }
        Ok(Completion::Applied)
    }

    // ------------------------------------------------------------------
    // Tabs
    // ------------------------------------------------------------------

    /// Render the pipeline at `index` of the current build.
    pub fn select_tab(&mut self, index: usize) -> Result<&RenderedNodes> {
        let decl = pipelines_of(&self.build_result)
            .get(index)
            .ok_or(UserInputError::NoSuchTab(index))?;
        let graph = build_graph(decl);
        let rendered = render_styled(&mut self.renderer, &decl.id, &graph);
        debug!(
            pipeline = %decl.id,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "tab selected"
        );
        self.active_tab = Some(index);
        Ok(self.rendered.insert(rendered))
    }

    pub fn select_tab_by_id(&mut self, pipeline_id: &str) -> Result<&RenderedNodes> {
        let index = self
            .pipelines()
            .iter()
            .position(|p| p.id == pipeline_id)
            .ok_or_else(|| UserInputError::UnknownPipeline(pipeline_id.to_string()))?;
        self.select_tab(index)
    }

    // ------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------

    pub fn begin_save(&mut self) -> Result<PendingSave> {
        let Some(file) = self.main.file().filter(|_| self.main.can_save()) else {
            warn!("save requested with no file selected");
            return Err(UserInputError::NoFileSelected.into());
        };
        Ok(PendingSave {
            file,
            contents: self.main.text(),
        })
    }

    /// Clears dirty only if the main session still shows what was sent.
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        result: std::result::Result<(), TransportError>,
    ) -> Result<Completion> {
        result?;
        let unchanged = self.main.file().as_ref() == Some(&pending.file)
            && self.main.text() == pending.contents;
        if !unchanged {
            debug!(fname = %pending.file.fname, "saved, but buffer changed since; staying dirty");
            return Ok(Completion::Stale);
        }
        self.main.set_dirty(false);
        info!(fname = %pending.file.fname, bytes = pending.contents.len(), "file saved");
        Ok(Completion::Applied)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn mro_path(&self) -> &str {
        &self.mro_path
    }

    pub fn main(&self) -> &EditorSession<T> {
        &self.main
    }

    /// For the editing widget glue: edits and change notifications.
    pub fn main_mut(&mut self) -> &mut EditorSession<T> {
        &mut self.main
    }

    pub fn include(&self) -> &EditorSession<T> {
        &self.include
    }

    pub fn available_files(&self) -> &[FileEntry] {
        &self.available_files
    }

    pub fn compiler_messages(&self) -> &str {
        &self.compiler_messages
    }

    pub fn build_result(&self) -> Option<&BuildResult> {
        self.build_result.as_ref()
    }

    pub fn pipelines(&self) -> &[PipelineDeclaration] {
        pipelines_of(&self.build_result)
    }

    pub fn active_tab(&self) -> Option<usize> {
        self.active_tab
    }

    pub fn active_pipeline(&self) -> Option<&PipelineDeclaration> {
        self.active_tab.and_then(|i| self.pipelines().get(i))
    }

    /// Line the cursor was moved to by the last failed build.
    pub fn error_line(&self) -> Option<u32> {
        self.error_line
    }

    pub fn rendered(&self) -> Option<&RenderedNodes> {
        self.rendered.as_ref()
    }

    pub fn main_state(&self) -> MainState {
        match (self.main.has_file(), self.main.is_dirty()) {
            (false, _) => MainState::Unselected,
            (true, false) => MainState::Clean,
            (true, true) => MainState::Dirty,
        }
    }

    pub fn build_state(&self) -> BuildState {
        match &self.build_result {
            None => BuildState::NotBuilt,
            Some(BuildResult::CompileError { .. }) => BuildState::Error,
            Some(BuildResult::CompileSuccess(_)) => BuildState::Success,
        }
    }
}

impl<B: Backend, R: Renderer, T: TextBuffer> SessionController<B, R, T> {
    pub async fn refresh_files(&mut self) -> Result<Completion> {
        let ticket = self.begin_refresh_files();
        let result = self.backend.list_files().await;
        self.complete_refresh_files(ticket, result)
    }

    pub async fn select_file(&mut self, file: &FileEntry) -> Result<Completion> {
        let pending = self.begin_select_file(file);
        let result = self.backend.load_file(&pending.file).await;
        self.complete_select_file(pending, result)
    }

    pub async fn build(&mut self) -> Result<Completion> {
        let pending = self.begin_build()?;
        let result = self.backend.build(&pending.file).await;
        self.complete_build(pending, result)
    }

    pub async fn save(&mut self) -> Result<Completion> {
        let pending = self.begin_save()?;
        let result = self.backend.save(&pending.file, &pending.contents).await;
        self.complete_save(pending, result)
    }
}
