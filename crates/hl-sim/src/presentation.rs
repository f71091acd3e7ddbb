//! What observers see of each agent: display state, open site and cues.

use hl_core::{AgentId, BlockPos, CueId, DisplayState};
use hl_task::AgentPresenter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentView {
    pub display:   DisplayState,
    pub open_site: Option<BlockPos>,
    pub last_cue:  Option<CueId>,
    pub cues:      u32,
}

/// Per-agent presentation record, indexed by `AgentId`.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    views: Vec<AgentView>,
}

impl Presentation {
    pub fn new(agent_count: usize) -> Self {
        Self { views: vec![AgentView::default(); agent_count] }
    }

    pub fn view(&self, agent: AgentId) -> Option<&AgentView> {
        self.views.get(agent.index())
    }

    pub fn views(&self) -> &[AgentView] {
        &self.views
    }

    fn view_mut(&mut self, agent: AgentId) -> Option<&mut AgentView> {
        self.views.get_mut(agent.index())
    }
}

impl AgentPresenter for Presentation {
    fn set_display_state(&mut self, agent: AgentId, state: DisplayState) {
        if let Some(v) = self.view_mut(agent) {
            v.display = state;
        }
    }

    fn play_cue(&mut self, agent: AgentId, cue: CueId) {
        if let Some(v) = self.view_mut(agent) {
            v.last_cue = Some(cue);
            v.cues += 1;
        }
    }

    fn set_open_site(&mut self, agent: AgentId, site: BlockPos) {
        if let Some(v) = self.view_mut(agent) {
            v.open_site = Some(site);
        }
    }

    fn clear_open_site(&mut self, agent: AgentId) {
        if let Some(v) = self.view_mut(agent) {
            v.open_site = None;
        }
    }
}
