//! # Project Data Structures
//!
//! The `Project` struct is the root container for a takeoff: metadata, QS
//! settings, wall dimensions, wall sections, and the last computed totals.
//! Projects serialize to `.qto` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: QsSettings (wastage, ratios, element toggles)
//! ├── dimensions: WallDimensions
//! ├── sections: Vec<WallSection> (each owning its doors/windows)
//! └── totals: Option<CalculationTotals> (last computed output)
//! ```
//!
//! ## Editing Model
//!
//! All editing operations are last-write-wins replacements of sub-records
//! that touch the modified timestamp. Totals are never patched in place:
//! [`Project::recompute`] replaces them wholesale from the current inputs,
//! and leaves the previous totals standing when the dimensions are invalid.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::PriceBook;
//! use takeoff_core::project::Project;
//! use takeoff_core::walls::WallKind;
//!
//! let mut project = Project::new("Jane Surveyor", "25-014", "Acme Builders");
//! project.dimensions.external_perimeter_m = 20.0;
//! project.dimensions.internal_perimeter_m = 10.0;
//! project.dimensions.external_height_m = 2.4;
//! project.dimensions.internal_height_m = 2.4;
//!
//! let section_id = project.add_section(WallKind::External);
//! project.add_door(section_id);
//!
//! let book = PriceBook::new();
//! assert!(project.recompute(&book));
//! assert_eq!(project.totals.as_ref().unwrap().net_doors, 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::totals::{compute, CalculationTotals};
use crate::catalog::PriceBook;
use crate::openings::{Door, Window};
use crate::settings::QsSettings;
use crate::walls::{WallDimensions, WallKind, WallSection};

/// Current schema version for .qto files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// This is the top-level struct that gets serialized to `.qto` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Quantity-surveyor settings
    pub settings: QsSettings,

    /// Core wall dimensions
    pub dimensions: WallDimensions,

    /// Wall sections, each owning its doors and windows
    pub sections: Vec<WallSection>,

    /// Last computed totals; `None` until the first successful recompute
    pub totals: Option<CalculationTotals>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible surveyor/engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: QsSettings::default(),
            dimensions: WallDimensions::default(),
            sections: Vec::new(),
            totals: None,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Replace the wall dimensions wholesale.
    pub fn set_dimensions(&mut self, dimensions: WallDimensions) {
        self.dimensions = dimensions;
        self.touch();
    }

    /// Replace the QS settings wholesale.
    pub fn set_settings(&mut self, settings: QsSettings) {
        self.settings = settings;
        self.touch();
    }

    /// Add an empty wall section of the given kind, returning its id.
    pub fn add_section(&mut self, kind: WallKind) -> Uuid {
        let section = WallSection::new(kind);
        let id = section.id;
        self.sections.push(section);
        self.touch();
        id
    }

    /// Remove a wall section (and the openings it owns).
    pub fn remove_section(&mut self, id: Uuid) -> Option<WallSection> {
        let idx = self.sections.iter().position(|s| s.id == id)?;
        let removed = self.sections.remove(idx);
        self.touch();
        Some(removed)
    }

    /// Get a wall section by id.
    pub fn section(&self, id: Uuid) -> Option<&WallSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Get a mutable wall section by id.
    ///
    /// Note: this marks the project modified when the section is found,
    /// since handing out `&mut` is an edit as far as the caller goes.
    pub fn section_mut(&mut self, id: Uuid) -> Option<&mut WallSection> {
        if self.sections.iter().any(|s| s.id == id) {
            self.meta.modified = Utc::now();
            self.sections.iter_mut().find(|s| s.id == id)
        } else {
            None
        }
    }

    /// Add a default door to a section, sized from the section's wall
    /// thickness. Returns the door index within the section.
    pub fn add_door(&mut self, section_id: Uuid) -> Option<usize> {
        let section = self.sections.iter_mut().find(|s| s.id == section_id)?;
        let door = Door::new(section.thickness_mm());
        section.doors.push(door);
        let idx = section.doors.len() - 1;
        self.touch();
        Some(idx)
    }

    /// Add a default window to a section. Returns the window index.
    pub fn add_window(&mut self, section_id: Uuid) -> Option<usize> {
        let section = self.sections.iter_mut().find(|s| s.id == section_id)?;
        let window = Window::new(section.thickness_mm());
        section.windows.push(window);
        let idx = section.windows.len() - 1;
        self.touch();
        Some(idx)
    }

    /// Remove a door from a section by index.
    pub fn remove_door(&mut self, section_id: Uuid, index: usize) -> Option<Door> {
        let section = self.sections.iter_mut().find(|s| s.id == section_id)?;
        if index >= section.doors.len() {
            return None;
        }
        let removed = section.doors.remove(index);
        self.touch();
        Some(removed)
    }

    /// Remove a window from a section by index.
    pub fn remove_window(&mut self, section_id: Uuid, index: usize) -> Option<Window> {
        let section = self.sections.iter_mut().find(|s| s.id == section_id)?;
        if index >= section.windows.len() {
            return None;
        }
        let removed = section.windows.remove(index);
        self.touch();
        Some(removed)
    }

    /// Recompute the totals from the current inputs.
    ///
    /// Returns `true` when a fresh totals record was stored. When the wall
    /// dimensions are invalid the previous totals remain untouched and
    /// `false` is returned. Callers must not pass a partially loaded price
    /// book: all-zero prices compute safely but should not be shown as
    /// final figures.
    pub fn recompute(&mut self, book: &PriceBook) -> bool {
        match compute(&self.dimensions, &self.sections, &self.settings, book) {
            Some(totals) => {
                self.totals = Some(totals);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Number of wall sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible surveyor/engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with_walls() -> Project {
        let mut project = Project::new("Jane Surveyor", "25-014", "Acme Builders");
        project.dimensions = WallDimensions {
            external_perimeter_m: 20.0,
            internal_perimeter_m: 10.0,
            external_height_m: 2.4,
            internal_height_m: 2.4,
            length_m: 6.0,
            width_m: 4.0,
        };
        project
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("Jane Surveyor", "25-014", "Acme Builders");
        assert_eq!(project.meta.engineer, "Jane Surveyor");
        assert_eq!(project.meta.job_id, "25-014");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert!(project.totals.is_none());
    }

    #[test]
    fn test_add_remove_section() {
        let mut project = project_with_walls();
        let id = project.add_section(WallKind::External);
        assert_eq!(project.section_count(), 1);
        assert!(project.section(id).is_some());

        let removed = project.remove_section(id);
        assert!(removed.is_some());
        assert_eq!(project.section_count(), 0);
        assert!(project.remove_section(id).is_none());
    }

    #[test]
    fn test_add_door_uses_section_thickness() {
        let mut project = project_with_walls();
        let external = project.add_section(WallKind::External);
        let internal = project.add_section(WallKind::Internal);

        project.add_door(external).unwrap();
        project.add_door(internal).unwrap();

        assert_eq!(project.section(external).unwrap().doors[0].wall_thickness_mm, 200);
        assert_eq!(project.section(internal).unwrap().doors[0].wall_thickness_mm, 150);
    }

    #[test]
    fn test_remove_door_out_of_range() {
        let mut project = project_with_walls();
        let id = project.add_section(WallKind::External);
        assert!(project.remove_door(id, 0).is_none());
        project.add_door(id);
        assert!(project.remove_door(id, 0).is_some());
    }

    #[test]
    fn test_recompute_stores_totals() {
        let mut project = project_with_walls();
        let id = project.add_section(WallKind::External);
        project.add_door(id);

        assert!(project.recompute(&PriceBook::new()));
        let totals = project.totals.as_ref().unwrap();
        assert_eq!(totals.net_doors, 1);
        assert!(totals.gross_area_m2 > 0.0);
    }

    #[test]
    fn test_recompute_keeps_previous_totals_on_invalid_input() {
        let mut project = project_with_walls();
        assert!(project.recompute(&PriceBook::new()));
        let before = project.totals.clone();

        project.dimensions.external_height_m = -1.0;
        assert!(!project.recompute(&PriceBook::new()));
        assert_eq!(project.totals, before);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut project = project_with_walls();
        project.add_section(WallKind::External);
        let book = PriceBook::new();

        assert!(project.recompute(&book));
        let first = project.totals.clone();
        assert!(project.recompute(&book));
        assert_eq!(project.totals, first);
    }

    #[test]
    fn test_editing_touches_modified_timestamp() {
        let mut project = project_with_walls();
        let before = project.meta.modified;
        std::thread::sleep(std::time::Duration::from_millis(5));
        project.add_section(WallKind::External);
        assert!(project.meta.modified > before);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = project_with_walls();
        let id = project.add_section(WallKind::External);
        project.add_door(id);
        project.recompute(&PriceBook::new());

        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("Jane Surveyor"));
        assert!(json.contains("sections"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.job_id, "25-014");
        assert_eq!(roundtrip.section_count(), 1);
        assert!(roundtrip.totals.is_some());
    }
}
