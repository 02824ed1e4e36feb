use std::sync::LazyLock;

use regex::Regex;

/// Splits headers at repeated-entity index markers (`_0_`, `_1_`, ...).
static INDEX_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new("_[0-9]_").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub cells: Vec<String>,
}

impl Column {
    pub fn new(header: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            header: header.into(),
            cells,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnGroup {
    Special,
    Cases,
    Samples,
    Portions,
    Analytes,
    Aliquots,
    Slides,
    Demographic,
    Exposures,
    Diagnoses,
    Treatments,
    FamilyHistories,
    ReadGroups,
    /// Claims nested project columns; never emitted.
    Project,
}

impl ColumnGroup {
    fn promotes_submitter_id(self) -> bool {
        self != ColumnGroup::Special
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    Contains(&'static str),
    IndexedEntity(&'static str),
}

impl Matcher {
    pub fn matches(&self, header: &str) -> bool {
        match self {
            Matcher::Contains(token) => header.contains(token),
            Matcher::IndexedEntity(token) => {
                let segments: Vec<&str> = INDEX_MARKER.split(header).collect();
                segments.len() > 1 && segments[segments.len() - 2] == *token
            }
        }
    }
}

pub const RULES: [(ColumnGroup, Matcher); 17] = [
    (ColumnGroup::Special, Matcher::Contains("file_name")),
    (ColumnGroup::Special, Matcher::Contains("file_id")),
    (ColumnGroup::Special, Matcher::Contains("project_project_id")),
    (ColumnGroup::Special, Matcher::Contains("project_name")),
    (ColumnGroup::Samples, Matcher::IndexedEntity("samples")),
    (ColumnGroup::Portions, Matcher::IndexedEntity("portions")),
    (ColumnGroup::Analytes, Matcher::IndexedEntity("analytes")),
    (ColumnGroup::Aliquots, Matcher::IndexedEntity("aliquots")),
    (ColumnGroup::Slides, Matcher::IndexedEntity("slides")),
    (
        ColumnGroup::ReadGroups,
        Matcher::IndexedEntity("analysis_metadata_read_groups"),
    ),
    (ColumnGroup::Project, Matcher::IndexedEntity("project")),
    (ColumnGroup::Demographic, Matcher::Contains("demographic")),
    (ColumnGroup::Exposures, Matcher::Contains("exposures")),
    (ColumnGroup::Treatments, Matcher::Contains("treatments")),
    (ColumnGroup::Diagnoses, Matcher::Contains("diagnoses")),
    (
        ColumnGroup::FamilyHistories,
        Matcher::Contains("family_histories"),
    ),
    (ColumnGroup::Cases, Matcher::Contains("cases")),
];

pub const EMIT_ORDER: [ColumnGroup; 13] = [
    ColumnGroup::Special,
    ColumnGroup::Cases,
    ColumnGroup::Samples,
    ColumnGroup::Portions,
    ColumnGroup::Analytes,
    ColumnGroup::Aliquots,
    ColumnGroup::Slides,
    ColumnGroup::Demographic,
    ColumnGroup::Exposures,
    ColumnGroup::Diagnoses,
    ColumnGroup::Treatments,
    ColumnGroup::FamilyHistories,
    ColumnGroup::ReadGroups,
];

pub fn assign_groups<S: AsRef<str>>(headers: &[S]) -> Vec<Option<ColumnGroup>> {
    let mut groups = vec![None; headers.len()];
    for (group, matcher) in RULES.iter() {
        for (slot, header) in groups.iter_mut().zip(headers) {
            if slot.is_none() && matcher.matches(header.as_ref()) {
                *slot = Some(*group);
            }
        }
    }
    groups
}

pub fn ordered_indices<S: AsRef<str>>(headers: &[S]) -> Vec<usize> {
    let groups = assign_groups(headers);
    let mut order = Vec::with_capacity(headers.len());

    // Within a group, rule order decides before column order, so walk the
    // rules again rather than the group assignments.
    for target in EMIT_ORDER {
        let mut members = Vec::new();
        for (group, matcher) in RULES.iter().filter(|(group, _)| *group == target) {
            for (idx, header) in headers.iter().enumerate() {
                if groups[idx] == Some(*group)
                    && matcher.matches(header.as_ref())
                    && !members.contains(&idx)
                {
                    members.push(idx);
                }
            }
        }
        if target.promotes_submitter_id() {
            let (submitter, rest): (Vec<usize>, Vec<usize>) = members
                .into_iter()
                .partition(|&idx| headers[idx].as_ref().contains("submitter_id"));
            members = submitter.into_iter().chain(rest).collect();
        }
        order.extend(members);
    }

    order.extend(
        groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.is_none())
            .map(|(idx, _)| idx),
    );
    order
}

pub fn ordered_headers<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    ordered_indices(headers)
        .into_iter()
        .map(|idx| headers[idx].as_ref().to_string())
        .collect()
}

pub fn order_columns(columns: Vec<Column>) -> Vec<Column> {
    let headers: Vec<&str> = columns.iter().map(|c| c.header.as_str()).collect();
    let order = ordered_indices(&headers);
    let mut slots: Vec<Option<Column>> = columns.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}
