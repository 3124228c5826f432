//! Hold-to-use tool lifecycle.
//!
//! Hotkey press arms the tool and hotkey release hands control back to
//! whatever tool was active before. Mouse press/drag/release while armed run
//! one [`DragSession`] each, wrapped in a single undo chunk.

use crate::push_pull::TOOL_NAME;
use crate::push_pull::error::PushPullError;
use crate::push_pull::host::SceneHost;
use crate::push_pull::scale::compensation_requested;
use crate::push_pull::session::DragSession;
use crate::push_pull::settings::{Modifiers, PushPullSettings};
use bevy::prelude::{Resource, Vec2};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub enum ToolPhase {
    #[default]
    Inactive,
    Armed,
    Dragging(Box<DragSession>),
}

impl ToolPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::Armed => "Armed",
            Self::Dragging(_) => "Dragging",
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PushPullTool {
    settings: PushPullSettings,
    former_tool: Option<String>,
    phase: ToolPhase,
    chunk_open: bool,
}

impl PushPullTool {
    pub fn new(settings: PushPullSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &PushPullSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PushPullSettings) {
        self.settings = settings;
    }

    pub fn phase(&self) -> &ToolPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, ToolPhase::Inactive)
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            ToolPhase::Dragging(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn former_tool(&self) -> Option<&str> {
        self.former_tool.as_deref()
    }

    /// Hotkey press. Key repeat while already active is ignored.
    pub fn activate<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        if self.is_active() {
            return;
        }

        let current = host.current_tool();
        self.former_tool = (current != TOOL_NAME && !current.is_empty()).then_some(current);
        host.set_tool(TOOL_NAME);
        self.phase = ToolPhase::Armed;
        debug!(former = ?self.former_tool, "push/pull tool armed");
    }

    /// Hotkey release. Restores the former tool unless something else took
    /// over in the meantime.
    pub fn deactivate<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        if !self.is_active() {
            return;
        }

        self.release(host);
        if host.current_tool() == TOOL_NAME {
            if let Some(former) = self.former_tool.as_deref() {
                host.set_tool(former);
            }
        }
        debug!(restored = ?self.former_tool, "push/pull tool released");
        self.phase = ToolPhase::Inactive;
    }

    /// Mouse press while armed. On failure the undo chunk is already closed
    /// and drags are ignored until the next press.
    pub fn press<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer: Vec2,
        modifiers: Modifiers,
    ) -> Result<(), PushPullError> {
        if !self.is_active() {
            return Ok(());
        }
        self.release(host);

        host.open_undo_chunk();
        self.chunk_open = true;

        let compensate =
            compensation_requested(&self.settings, modifiers, self.former_tool.as_deref());
        match DragSession::begin(&*host, &self.settings, pointer, compensate) {
            Ok(session) => {
                self.phase = ToolPhase::Dragging(Box::new(session));
                Ok(())
            }
            Err(err) => {
                warn!("push/pull press ignored: {err}");
                self.close_chunk(host);
                Err(err)
            }
        }
    }

    /// Mouse drag. Returns the applied depth change, `None` when no drag is
    /// running.
    pub fn drag<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer: Vec2,
    ) -> Result<Option<f32>, PushPullError> {
        let ToolPhase::Dragging(session) = &mut self.phase else {
            return Ok(None);
        };
        session.update(host, pointer).map(Some)
    }

    /// Mouse release. Safe to call at any time.
    pub fn release<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        self.close_chunk(host);
        if let ToolPhase::Dragging(session) = &self.phase {
            debug!(change = session.last_change(), "push/pull drag finished");
            self.phase = ToolPhase::Armed;
        }
    }

    fn close_chunk<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        if self.chunk_open {
            host.close_undo_chunk();
            self.chunk_open = false;
        }
    }
}
