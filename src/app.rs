//! Application assembly
//!
//! Owns the window loop, drains recognition events from the scheduler,
//! and routes toolbar actions onto the shared canvas state.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use eframe::egui;
use parking_lot::RwLock;
use tracing::debug;

use crate::notices::{Notice, NoticeBoard};
use crate::recognition::{Recognition, RecognitionScheduler, RecognizeError, SchedulerStatus};
use crate::shared::{RecognitionEvent, SharedSketchState};
use crate::ui::{
    render_notices, render_results, render_toolbar, theme, CanvasView, ToolbarActions,
};

/// The main sketchpad application
pub struct SketchpadApp {
    /// Shared canvas state
    shared: Arc<RwLock<SharedSketchState>>,
    /// Background recognition driver
    scheduler: RecognitionScheduler,
    /// Scheduler state for the toolbar status line
    scheduler_status: Arc<SchedulerStatus>,
    /// Events arriving from recognition attempts
    events: Receiver<RecognitionEvent>,
    /// Canvas texture state
    canvas: CanvasView,
    /// Latest completed ranking
    results: Vec<Recognition>,
    /// Whether an attempt is currently shown as busy
    recognizing: bool,
    /// Active notices
    notices: NoticeBoard,
    /// Slider binding for the brush width
    brush_size: u32,
    /// Automatic attempt period, for the status line
    interval: Duration,
    /// Whether theme has been applied
    theme_applied: bool,
}

impl SketchpadApp {
    /// Create the application around already-started collaborators
    pub fn new(
        shared: Arc<RwLock<SharedSketchState>>,
        scheduler: RecognitionScheduler,
        events: Receiver<RecognitionEvent>,
    ) -> Self {
        let (brush_size, interval) = {
            let state = shared.read();
            (
                state.config.brush.size,
                Duration::from_millis(state.config.recognition.interval_ms),
            )
        };
        let scheduler_status = scheduler.status();

        Self {
            shared,
            scheduler,
            scheduler_status,
            events,
            canvas: CanvasView::new(),
            results: Vec::new(),
            recognizing: false,
            notices: NoticeBoard::default(),
            brush_size,
            interval,
            theme_applied: false,
        }
    }

    /// Create eframe options for the sketchpad window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([860.0, 620.0])
                .with_min_inner_size([640.0, 480.0])
                .with_title("DoodlePad"),
            ..Default::default()
        }
    }

    /// Apply recognition events that arrived since the last frame
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                RecognitionEvent::Started => {
                    self.recognizing = true;
                }
                RecognitionEvent::Completed(ranked) => {
                    self.recognizing = false;
                    if let Some(top) = ranked.first() {
                        self.notices.push(Notice::recognized(top));
                    }
                    self.results = ranked;
                }
                RecognitionEvent::Failed(err) => {
                    // A nothing-drawn report is advisory and never had a
                    // matching Started
                    if !matches!(err, RecognizeError::NothingDrawn) {
                        self.recognizing = false;
                    }
                    self.notices.push(Notice::from_error(&err));
                }
            }
        }
    }

    fn apply_toolbar_actions(&mut self, actions: ToolbarActions) {
        if actions.brush_changed {
            self.shared.write().set_brush_size(self.brush_size);
        }

        if actions.clear {
            self.shared.write().clear_canvas();
            self.results.clear();
            self.notices.push(Notice::canvas_cleared());
            debug!("Canvas cleared");
        }

        if actions.recognize {
            self.scheduler.request_recognition();
        }
    }
}

impl eframe::App for SketchpadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.drain_events();

        let auto_interval = self
            .scheduler_status
            .timer_active()
            .then_some(self.interval);

        let mut actions = ToolbarActions::default();
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            actions = render_toolbar(ui, &mut self.brush_size, self.recognizing, auto_interval);
            ui.add_space(4.0);
        });
        self.apply_toolbar_actions(actions);

        egui::SidePanel::right("results")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                render_results(ui, &self.results, self.recognizing);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas.show(ui, &self.shared);
        });

        render_notices(ctx, &mut self.notices);

        // Recognition events can arrive while the pointer is idle
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Run the sketchpad window (blocking until the window closes)
pub fn run_sketchpad(
    shared: Arc<RwLock<SharedSketchState>>,
    scheduler: RecognitionScheduler,
    events: Receiver<RecognitionEvent>,
) -> Result<(), eframe::Error> {
    let app = SketchpadApp::new(shared, scheduler, events);
    eframe::run_native(
        "DoodlePad",
        SketchpadApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
