use thiserror::Error;

use crate::site::projects::{ProjectCatalog, ProjectRecord};

pub const MODAL_SELECTOR: &str = ".modal";
pub const MODAL_CLOSE_SELECTOR: &str = ".modal__close";
pub const MODAL_ACTIVE_CLASS: &str = "modal--active";
pub const READ_MORE_SELECTOR: &str = ".project__btn";
pub const PROJECT_CARD_SELECTOR: &str = ".project__card";
pub const PROJECT_ID_ATTRIBUTE: &str = "data-project";

pub const MODAL_TITLE_SELECTOR: &str = "#modalTitle";
pub const MODAL_CATEGORY_SELECTOR: &str = "#modalCategory";
pub const MODAL_DESCRIPTION_SELECTOR: &str = "#modalDescription";
pub const MODAL_IMAGE_SELECTOR: &str = ".modal__image img";
pub const MODAL_CLIENT_SELECTOR: &str = "[data-spec=\"client\"] .modal__spec-value";
pub const MODAL_DATE_SELECTOR: &str = "[data-spec=\"date\"] .modal__spec-value";

pub const ACTIVATE_DELAY_MS: u32 = 10;
pub const CLOSE_TRANSITION_MS: u32 = 300;

/// Picks the project a "read more" trigger refers to: its own attribute,
/// else the enclosing card's. Empty values count as absent.
pub fn trigger_project_id(own: Option<String>, card: impl FnOnce() -> Option<String>) -> Option<String> {
    own.filter(|id| !id.is_empty())
        .or_else(|| card().filter(|id| !id.is_empty()))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModalError {
    #[error("no project found with id `{0}`")]
    UnknownProject(String),
}

/// Visual phase of the overlay. `Shown` is the short window between
/// `display: block` and the transition class landing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalPhase {
    #[default]
    Hidden,
    Shown,
    Active,
    Closing,
}

impl ModalPhase {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Shown | Self::Active)
    }
}

#[derive(Debug, Default)]
pub struct ModalState {
    catalog: ProjectCatalog,
    phase: ModalPhase,
    project: Option<&'static ProjectRecord>,
}

impl ModalState {
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn project(&self) -> Option<&'static ProjectRecord> {
        self.project
    }

    /// Resolves `project_id` and moves to `Shown`. An unknown id leaves every
    /// field untouched.
    pub fn open(&mut self, project_id: &str) -> Result<&'static ProjectRecord, ModalError> {
        let record = self
            .catalog
            .lookup(project_id)
            .ok_or_else(|| ModalError::UnknownProject(project_id.to_string()))?;
        self.project = Some(record);
        self.phase = ModalPhase::Shown;
        Ok(record)
    }

    /// Second phase of opening; ignored unless the overlay was just shown.
    pub fn activate(&mut self) -> bool {
        if self.phase != ModalPhase::Shown {
            return false;
        }
        self.phase = ModalPhase::Active;
        true
    }

    pub fn begin_close(&mut self) -> bool {
        if !self.phase.is_visible() {
            return false;
        }
        self.phase = ModalPhase::Closing;
        true
    }

    pub fn finish_close(&mut self) -> bool {
        if self.phase != ModalPhase::Closing {
            return false;
        }
        self.phase = ModalPhase::Hidden;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_known_project_populates_and_shows() {
        let mut modal = ModalState::default();

        let record = modal.open("project-1").expect("project-1 exists");

        assert_eq!(record.title, "Industrial HVAC System Design");
        assert_eq!(record.category, "Manufacturing");
        assert!(record.description.starts_with("Comprehensive design"));
        assert_eq!(modal.phase(), ModalPhase::Shown);
        assert!(modal.phase().is_visible());
    }

    #[test]
    fn open_unknown_project_leaves_state_unchanged() {
        let mut modal = ModalState::default();
        modal.open("project-3").expect("project-3 exists");
        modal.activate();

        let error = modal.open("unknown-id").expect_err("unknown id is rejected");

        assert_eq!(error, ModalError::UnknownProject("unknown-id".to_string()));
        assert_eq!(modal.phase(), ModalPhase::Active);
        assert_eq!(modal.project().map(|record| record.id), Some("project-3"));
    }

    #[test]
    fn close_runs_through_closing_to_hidden() {
        let mut modal = ModalState::default();
        modal.open("project-2").expect("project-2 exists");
        assert!(modal.activate());

        assert!(modal.begin_close());
        assert!(!modal.phase().is_visible());
        assert!(modal.finish_close());
        assert_eq!(modal.phase(), ModalPhase::Hidden);
    }

    #[test]
    fn close_while_hidden_is_a_no_op() {
        let mut modal = ModalState::default();

        assert!(!modal.begin_close());
        assert!(!modal.finish_close());
    }

    #[test]
    fn reopen_during_close_cancels_the_close() {
        let mut modal = ModalState::default();
        modal.open("project-1").expect("project-1 exists");
        modal.activate();
        modal.begin_close();

        modal.open("project-2").expect("project-2 exists");

        assert!(!modal.finish_close());
        assert!(modal.activate());
        assert_eq!(modal.phase(), ModalPhase::Active);
    }

    #[test]
    fn trigger_prefers_its_own_id_over_the_card() {
        let id = trigger_project_id(Some("project-2".to_string()), || panic!("card lookup not needed"));

        assert_eq!(id.as_deref(), Some("project-2"));
    }

    #[test]
    fn blank_trigger_id_falls_back_to_the_card() {
        assert_eq!(
            trigger_project_id(Some(String::new()), || Some("project-3".to_string())).as_deref(),
            Some("project-3")
        );
        assert_eq!(trigger_project_id(None, || Some(String::new())), None);
    }
}
