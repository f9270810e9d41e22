//! Main application module implementing the Cosmic Application trait
//!
//! This is the central hub of the application, implementing libCosmic's
//! Application trait for window management and message routing. Fetches,
//! exports and timers run as tasks and report back through messages.

use crate::catalog::{Catalog, LessonPath};
use crate::config::{Config, ThemePreference, APP_ID, NOTICE_DURATION_MS};
use crate::error::AppError;
use crate::fetch::LessonFetcher;
use crate::markdown::highlight::DARK_THEME;
use crate::markdown::{
    suggest_output_path, CodeHighlighter, HtmlExportOptions, HtmlExporter, LessonRenderer,
};
use crate::menu::{keyboard_shortcuts_subscription, Action as MenuAction};
use crate::message::{
    CatalogMessage, CodeBlockMessage, ContentMessage, LessonMessage, Message, SidebarMessage,
    SystemMessage, TocMessage, ViewMessage,
};
use crate::state::{AppState, LoadOutcome, LoadTicket, SessionState, StatusLevel};
use crate::ui;
use crate::viewer::smooth_scroll::FRAME_INTERVAL;
use crate::viewer::{ClipboardManager, CopyLabels};

use cosmic::app::{Core, Task};
use cosmic::iced::widget::scrollable::{scroll_to, AbsoluteOffset};
use cosmic::iced::window;
use cosmic::widget::menu::KeyBind;
use cosmic::{Application, ApplicationExt, Element};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Window title suffix
const APP_TITLE: &str = "Cosmic Lessons";

/// Cosmic Lessons Application
pub struct CosmicLessons {
    /// libCosmic core reference
    core: Core,

    /// Application state
    pub state: AppState,

    /// User configuration
    pub config: Config,

    /// Session state (for persistence)
    pub session: SessionState,

    fetcher: LessonFetcher,
    renderer: LessonRenderer,
    highlighter: CodeHighlighter,
    exporter: HtmlExporter,
    clipboard: ClipboardManager,
    copy_labels: CopyLabels,

    /// Root and manifest of the current catalog, for reloads
    catalog_source: Option<(PathBuf, Option<PathBuf>)>,

    /// Base URL override for relative lesson paths
    base_url: Option<String>,

    /// Lesson to open once the catalog is in
    pending_lesson: Option<LessonPath>,

    /// Whether expanded sections were restored from the session
    session_restored: bool,

    /// Keyboard shortcut bindings
    key_binds: HashMap<KeyBind, MenuAction>,
}

/// Application flags passed during initialization
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Catalog root directory
    pub root: Option<PathBuf>,

    /// Explicit course manifest
    pub manifest: Option<PathBuf>,

    /// Base URL relative lesson paths resolve against
    pub base_url: Option<String>,

    /// Lesson to open on startup
    pub lesson: Option<LessonPath>,
}

impl Application for CosmicLessons {
    /// Executor for async tasks
    type Executor = cosmic::executor::Default;

    /// Application flags
    type Flags = Flags;

    /// Application message type
    type Message = Message;

    /// Application ID following reverse-DNS convention
    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// Initialize the application
    fn init(core: Core, flags: Self::Flags) -> (Self, Task<Self::Message>) {
        let config = Config::load_or_init().unwrap_or_else(|e| {
            log::warn!("Using default configuration: {}", AppError::from(e));
            Config::default()
        });

        let session = SessionState::load().unwrap_or_else(|e| {
            log::warn!("Starting with an empty session: {}", AppError::from(e));
            SessionState::default()
        });

        let mut state = AppState::new(&config);
        state.sidebar.visible = session.sidebar_visible;
        state.toc_visible = session.toc_visible;
        state.set_zoom(session.zoom, &config.viewer);

        let theme = match config.ui.theme {
            ThemePreference::Dark => DARK_THEME,
            _ => config.viewer.code_theme.as_str(),
        };
        let highlighter = CodeHighlighter::new(theme);

        // Command line wins over the session
        let from_session = flags.root.is_none();
        let root = flags
            .root
            .or_else(|| session.last_root.clone())
            .or_else(|| std::env::current_dir().ok());
        let manifest = flags.manifest.or_else(|| {
            if from_session {
                session.last_manifest.clone()
            } else {
                None
            }
        });
        let pending_lesson = flags.lesson.or_else(|| session.last_lesson.clone());

        let mut app = Self {
            core,
            fetcher: LessonFetcher::new(&config.fetch),
            renderer: LessonRenderer::new(),
            exporter: HtmlExporter::new(highlighter.clone()),
            highlighter,
            clipboard: ClipboardManager::new(),
            copy_labels: CopyLabels::from(&config.viewer),
            base_url: flags.base_url.or_else(|| config.fetch.base_url.clone()),
            catalog_source: None,
            pending_lesson,
            session_restored: false,
            key_binds: crate::menu::key_binds(),
            state,
            config,
            session,
        };

        app.set_header_title(APP_TITLE.to_string());

        let task = match root {
            Some(root) => Task::done(Self::app_message(Message::Catalog(CatalogMessage::Load {
                root,
                manifest,
            }))),
            None => app.open_pending_lesson(),
        };

        (app, task)
    }

    /// Handle incoming messages
    fn update(&mut self, message: Self::Message) -> Task<Self::Message> {
        match message {
            Message::Catalog(msg) => self.handle_catalog_message(msg),
            Message::Sidebar(msg) => self.handle_sidebar_message(msg),
            Message::Lesson(msg) => self.handle_lesson_message(msg),
            Message::Toc(msg) => self.handle_toc_message(msg),
            Message::Content(msg) => self.handle_content_message(msg),
            Message::CodeBlock(msg) => self.handle_code_block_message(msg),
            Message::View(msg) => self.handle_view_message(msg),
            Message::System(msg) => self.handle_system_message(msg),
            Message::Surface(_) => Task::none(), // Surface actions are handled by libcosmic
            Message::None => Task::none(),
        }
    }

    /// Render the application view
    fn view(&self) -> Element<'_, Self::Message> {
        ui::view(&self.state, &self.copy_labels)
    }

    /// Handle subscription events
    fn subscription(&self) -> cosmic::iced::Subscription<Self::Message> {
        use cosmic::iced::time;

        let mut subscriptions = vec![keyboard_shortcuts_subscription()];

        // Frame timer only while an outline jump is animating
        if self.state.viewer.is_scrolling() {
            subscriptions.push(
                time::every(FRAME_INTERVAL)
                    .map(|_| Message::Content(ContentMessage::AnimationTick)),
            );
        }

        cosmic::iced::Subscription::batch(subscriptions)
    }

    /// Elements to show at the start of the header bar (menu bar)
    fn header_start(&self) -> Vec<Element<'_, Self::Message>> {
        use cosmic::widget::menu::ItemHeight;
        use cosmic::widget::responsive_menu_bar;

        let menu_bar = responsive_menu_bar()
            .item_height(ItemHeight::Dynamic(40))
            .into_element(
                self.core(),
                &self.key_binds,
                cosmic::widget::Id::new("menu-bar"),
                Message::Surface,
                crate::menu::menu_items(),
            );

        vec![menu_bar]
    }

    /// Save the session when the window closes
    fn on_close_requested(&self, _id: window::Id) -> Option<Self::Message> {
        Some(Message::System(SystemMessage::Quit))
    }
}

impl CosmicLessons {
    /// Helper to wrap Message in cosmic::Action for Task::perform
    fn app_message(msg: Message) -> cosmic::Action<Message> {
        cosmic::Action::App(msg)
    }

    fn update_window_title(&mut self) {
        let title = match self.state.viewer.lesson() {
            Some(lesson) => format!("{} - {}", lesson.title, APP_TITLE),
            None => APP_TITLE.to_string(),
        };
        self.set_header_title(title);
    }

    /// Show a status message that clears itself after a few seconds
    fn notify(&mut self, message: impl Into<String>, level: StatusLevel) -> Task<Message> {
        let id = self.state.set_status(message, level);
        Task::perform(
            tokio::time::sleep(Duration::from_millis(NOTICE_DURATION_MS)),
            move |_| Self::app_message(Message::System(SystemMessage::ClearStatus(id))),
        )
    }

    /// Log an error and show it as a transient notice
    fn report(&mut self, error: AppError) -> Task<Message> {
        log::error!("{}", error);
        let text = match &error {
            AppError::Fetch(e) => e.user_message(),
            AppError::Clipboard(e) => e.user_message(),
            other => other.to_string(),
        };
        self.notify(text, StatusLevel::Error)
    }

    /// Move the content pane to `offset`
    fn snap_content(offset: f32) -> Task<Message> {
        scroll_to(ui::content_scroll_id(), AbsoluteOffset { x: 0.0, y: offset })
    }

    fn load_catalog(&mut self, root: PathBuf, manifest: Option<PathBuf>) -> Task<Message> {
        self.catalog_source = Some((root.clone(), manifest.clone()));
        self.state.sidebar.is_loading = true;
        self.state.sidebar.error_message = None;

        Task::perform(
            Catalog::load_async(root, manifest, self.base_url.clone()),
            |result| Self::app_message(Message::Catalog(CatalogMessage::Loaded(result))),
        )
    }

    /// Start the fetch for a load begun on the state
    fn start_fetch(&mut self, ticket: LoadTicket) -> Task<Message> {
        self.update_window_title();
        let fetcher = self.fetcher.clone();
        Task::perform(
            async move {
                let result = fetcher.fetch(&ticket.lesson.path).await;
                (ticket, result)
            },
            |(ticket, result)| {
                Self::app_message(Message::Lesson(LessonMessage::Fetched { ticket, result }))
            },
        )
    }

    fn open_pending_lesson(&mut self) -> Task<Message> {
        match self.pending_lesson.take() {
            Some(path) => Task::done(Self::app_message(Message::Lesson(LessonMessage::Open(
                path,
            )))),
            None => Task::none(),
        }
    }

    /// Copy the current layout into the session and write it out
    fn save_session(&mut self) {
        if let Some((root, manifest)) = &self.catalog_source {
            self.session.last_root = Some(root.clone());
            self.session.last_manifest = manifest.clone();
        }
        self.session.last_lesson = self.state.viewer.lesson().map(|l| l.path.clone());
        self.session
            .set_expanded(self.state.sidebar.expanded_courses.iter().copied());
        self.session.sidebar_visible = self.state.sidebar.visible;
        self.session.toc_visible = self.state.toc_visible;
        self.session.zoom = self.state.zoom;

        if let Err(e) = self.session.save() {
            log::error!("Failed to save session: {}", AppError::from(e));
        }
    }

    /// Handle catalog messages
    fn handle_catalog_message(&mut self, msg: CatalogMessage) -> Task<Message> {
        match msg {
            CatalogMessage::Load { root, manifest } => self.load_catalog(root, manifest),

            CatalogMessage::Reload => match self.catalog_source.clone() {
                Some((root, manifest)) => self.load_catalog(root, manifest),
                None => Task::none(),
            },

            CatalogMessage::Loaded(Ok(catalog)) => {
                let lessons = catalog.lesson_count();
                let title = catalog.title.clone();
                self.state.set_catalog(catalog);

                if !self.session_restored {
                    self.session_restored = true;
                    for course in self.session.expanded() {
                        self.state.sidebar.expand_course(course);
                    }
                }

                // Keep the shown lesson highlighted across catalog reloads
                let shown = self.state.viewer.lesson().map(|l| l.path.clone());
                if let (Some(path), Some(catalog)) = (shown, self.state.catalog.as_ref()) {
                    if let Some(key) = catalog.find_lesson(&path) {
                        self.state.sidebar.active_lesson = Some(key);
                        self.state.sidebar.expand_course(key.course);
                    }
                }

                let notice =
                    self.notify(format!("{}: {} lessons", title, lessons), StatusLevel::Info);
                Task::batch([notice, self.open_pending_lesson()])
            }

            CatalogMessage::Loaded(Err(error)) => {
                log::error!("Failed to load courses: {}", error);
                self.state.sidebar.is_loading = false;
                self.state.sidebar.set_error(error);
                self.open_pending_lesson()
            }
        }
    }

    /// Handle sidebar messages
    fn handle_sidebar_message(&mut self, msg: SidebarMessage) -> Task<Message> {
        match msg {
            SidebarMessage::ToggleCourse(course) => {
                let shown = self.state.sidebar.toggle_course(course);
                log::debug!("Course {} {}", course.0, if shown { "shown" } else { "hidden" });
            }

            SidebarMessage::SelectLesson(key) => {
                if let Some(ticket) = self.state.select_lesson(key) {
                    return self.start_fetch(ticket);
                }
            }

            SidebarMessage::SetFilter(text) => {
                self.state.sidebar.set_filter(text);
            }

            SidebarMessage::ClearFilter => {
                self.state.sidebar.clear_filter();
            }
        }
        Task::none()
    }

    /// Handle lesson loading messages
    fn handle_lesson_message(&mut self, msg: LessonMessage) -> Task<Message> {
        match msg {
            LessonMessage::Open(path) => {
                let ticket = self.state.open_path(&path);
                self.start_fetch(ticket)
            }

            LessonMessage::Fetched { ticket, result } => {
                let lesson = ticket.lesson.clone();
                let outcome = self.state.viewer.finish_load(
                    ticket,
                    result,
                    &self.renderer,
                    &self.highlighter,
                );

                match outcome {
                    LoadOutcome::Shown => {
                        self.session
                            .add_recent_lesson(lesson.path.clone(), lesson.title.clone());

                        // Sync the outline with whatever is already in view
                        if let Some(generation) = self.state.viewer.observer.generation() {
                            let viewport = self.state.viewer.viewport;
                            self.state.viewer.on_viewport(generation, viewport);
                        }
                        Self::snap_content(0.0)
                    }
                    LoadOutcome::Failed | LoadOutcome::Stale => Task::none(),
                }
            }

            LessonMessage::Reload => match self.state.reload() {
                Some(ticket) => self.start_fetch(ticket),
                None => Task::none(),
            },

            LessonMessage::Export => {
                let current = self
                    .state
                    .viewer
                    .document()
                    .cloned()
                    .zip(self.state.viewer.lesson().cloned());
                let (document, lesson) = match current {
                    Some(pair) => pair,
                    None => return self.notify("No lesson to export", StatusLevel::Warning),
                };

                let fallback = dirs::download_dir()
                    .or_else(dirs::home_dir)
                    .unwrap_or_else(|| PathBuf::from("."));
                let output = match &lesson.path {
                    LessonPath::Local(path) => suggest_output_path(path, &fallback),
                    LessonPath::Remote(_) => {
                        let stem = lesson.path.file_stem().unwrap_or_default();
                        suggest_output_path(Path::new(&stem), &fallback)
                    }
                };
                let options = HtmlExportOptions {
                    title: Some(lesson.title),
                    dark_mode: self.config.ui.theme == ThemePreference::Dark,
                    include_toc: true,
                };

                let exporter = self.exporter.clone();
                Task::perform(
                    async move {
                        tokio::task::spawn_blocking(move || {
                            exporter
                                .export_html_file(&document, &output, &options)
                                .map(|()| output)
                                .map_err(|e| e.to_string())
                        })
                        .await
                        .map_err(|e| format!("Export was interrupted: {}", e))?
                    },
                    |result| Self::app_message(Message::Lesson(LessonMessage::Exported(result))),
                )
            }

            LessonMessage::Exported(Ok(path)) => {
                self.notify(format!("Exported to {}", path.display()), StatusLevel::Info)
            }

            LessonMessage::Exported(Err(error)) => {
                log::error!("Export failed: {}", error);
                self.notify(format!("Export failed: {}", error), StatusLevel::Error)
            }
        }
    }

    /// Handle outline messages
    fn handle_toc_message(&mut self, msg: TocMessage) -> Task<Message> {
        match msg {
            TocMessage::Navigate(id) => {
                let duration = self.config.viewer.scroll_animation();
                let viewer = &mut self.state.viewer;
                match viewer.scroll_to_heading(&id, duration, Instant::now()) {
                    Some(target) => {
                        viewer.toc.set_active(&id);
                        if viewer.is_scrolling() {
                            // The frame subscription drives the rest
                            Task::none()
                        } else {
                            Self::snap_content(target)
                        }
                    }
                    None => {
                        log::debug!("No layout for heading {}", id);
                        Task::none()
                    }
                }
            }
        }
    }

    /// Handle content pane messages
    fn handle_content_message(&mut self, msg: ContentMessage) -> Task<Message> {
        match msg {
            ContentMessage::Scrolled {
                generation,
                viewport,
            } => {
                match generation {
                    Some(generation) => {
                        if let Some(heading) = self.state.viewer.on_viewport(generation, viewport)
                        {
                            log::trace!("Outline entry now {}", heading);
                        }
                    }
                    None => self.state.viewer.viewport = viewport,
                }
                Task::none()
            }

            ContentMessage::AnimationTick => match self.state.viewer.tick(Instant::now()) {
                Some(offset) => Self::snap_content(offset),
                None => Task::none(),
            },
        }
    }

    /// Handle copy button messages
    fn handle_code_block_message(&mut self, msg: CodeBlockMessage) -> Task<Message> {
        match msg {
            CodeBlockMessage::Copy(id) => {
                match self.state.viewer.code_blocks.copy(id, &mut self.clipboard) {
                    Ok(Some(ticket)) => Task::perform(
                        tokio::time::sleep(self.config.viewer.copy_feedback()),
                        move |_| {
                            Self::app_message(Message::CodeBlock(CodeBlockMessage::RevertLabel(
                                ticket,
                            )))
                        },
                    ),
                    Ok(None) => Task::none(),
                    Err(e) => self.report(e.into()),
                }
            }

            CodeBlockMessage::RevertLabel(ticket) => {
                if !self.state.viewer.code_blocks.revert(ticket) {
                    log::trace!("Copy confirmation {:?} already superseded", ticket);
                }
                Task::none()
            }
        }
    }

    /// Handle view-related messages
    fn handle_view_message(&mut self, msg: ViewMessage) -> Task<Message> {
        match msg {
            ViewMessage::ToggleSidebar => self.state.toggle_sidebar(),
            ViewMessage::ToggleToc => self.state.toggle_toc(),
            ViewMessage::ZoomIn => {
                self.state.viewer.cancel_scroll();
                self.state.zoom_in(&self.config.viewer);
            }
            ViewMessage::ZoomOut => {
                self.state.viewer.cancel_scroll();
                self.state.zoom_out(&self.config.viewer);
            }
            ViewMessage::ZoomReset => {
                self.state.viewer.cancel_scroll();
                self.state.reset_zoom(&self.config.viewer);
            }
        }
        Task::none()
    }

    /// Handle system-related messages
    fn handle_system_message(&mut self, msg: SystemMessage) -> Task<Message> {
        match msg {
            SystemMessage::CloseRequested => {
                Task::done(Self::app_message(Message::System(SystemMessage::Quit)))
            }

            SystemMessage::Quit => {
                self.save_session();
                std::process::exit(0);
            }

            SystemMessage::ClearStatus(id) => {
                self.state.clear_status_if(id);
                Task::none()
            }
        }
    }
}
