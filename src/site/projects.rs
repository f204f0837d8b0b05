/// Display fields for one showcase project.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub client: &'static str,
    pub date: &'static str,
}

const SHOWCASE_IMAGE: &str = "https://res.cloudinary.com/dxtx1kkwy/image/upload/v1737025117/WhatsApp_Image_2025-01-16_at_10.03.48_01ed99bf_glcnhc.jpg";

pub static PROJECTS: [ProjectRecord; 3] = [
    ProjectRecord {
        id: "project-1",
        title: "Industrial HVAC System Design",
        category: "Manufacturing",
        description: "Comprehensive design and implementation of a state-of-the-art HVAC system for a 50,000 sq ft manufacturing facility. The project involved custom ductwork fabrication, energy-efficient unit installation, and automated climate control systems integration.",
        image_url: SHOWCASE_IMAGE,
        client: "Industrial Solutions Ltd",
        date: "January 2024",
    },
    ProjectRecord {
        id: "project-2",
        title: "Automated Assembly Line",
        category: "Automation",
        description: "Design and implementation of a fully automated assembly line system that increased production efficiency by 30%. The project included custom machinery fabrication, robotic integration, and advanced control systems.",
        image_url: SHOWCASE_IMAGE,
        client: "AutoTech Industries",
        date: "March 2024",
    },
    ProjectRecord {
        id: "project-3",
        title: "Power Plant Equipment Maintenance",
        category: "Energy",
        description: "Comprehensive maintenance and optimization program for critical power generation equipment. The project involved preventive maintenance protocols, equipment upgrades, and efficiency improvements.",
        image_url: SHOWCASE_IMAGE,
        client: "Energy Systems Corp",
        date: "May 2024",
    },
];

/// Read-only lookup over a fixed project table.
#[derive(Clone, Copy, Debug)]
pub struct ProjectCatalog {
    records: &'static [ProjectRecord],
}

impl Default for ProjectCatalog {
    fn default() -> Self {
        Self::new(&PROJECTS)
    }
}

impl ProjectCatalog {
    pub fn new(records: &'static [ProjectRecord]) -> Self {
        Self { records }
    }

    pub fn lookup(&self, id: &str) -> Option<&'static ProjectRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}
