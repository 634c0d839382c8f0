//! REST resources exposed by the reporting API

use clap::ValueEnum;

use crate::records::RecordKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Resource {
    Institutions,
    Campuses,
    Programs,
    FacultyProfiles,
    Graduates,
    Users,
}

impl Resource {
    /// Collection path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Institutions => "institutions",
            Resource::Campuses => "campuses",
            Resource::Programs => "programs",
            Resource::FacultyProfiles => "faculty-profiles",
            Resource::Graduates => "graduates",
            Resource::Users => "users",
        }
    }

    /// Record kind stored in this resource; users have no workbook template
    pub fn record_kind(&self) -> Option<RecordKind> {
        match self {
            Resource::Institutions => Some(RecordKind::Institution),
            Resource::Campuses => Some(RecordKind::Campus),
            Resource::Programs => Some(RecordKind::Program),
            Resource::FacultyProfiles => Some(RecordKind::Faculty),
            Resource::Graduates => Some(RecordKind::Graduate),
            Resource::Users => None,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_round_trips_through_resource() {
        for resource in Resource::value_variants() {
            if let Some(kind) = resource.record_kind() {
                assert_eq!(kind.resource(), *resource);
            }
        }
        assert_eq!(Resource::Users.record_kind(), None);
    }

    #[test]
    fn test_cli_names_match_paths() {
        for resource in Resource::value_variants() {
            let name = resource.to_possible_value().unwrap();
            assert_eq!(name.get_name(), resource.path());
        }
    }
}
