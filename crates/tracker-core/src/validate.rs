use std::collections::HashSet;

use crate::{Error, Palette, Project, ProjectTag, Result, Status};

/// Check that a project name is safe to use as a file stem: `[A-Za-z0-9_-]+`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::invalid(
            "Invalid project name. Use only letters, numbers, hyphens, underscores.",
        ))
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Returns the first name that appears twice, ignoring case.
fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(name.to_lowercase()))
}

pub fn validate_statuses(statuses: &[Status], palette: &Palette) -> Result<()> {
    if let Some(name) = first_duplicate(statuses.iter().map(|s| s.name.as_str())) {
        return Err(Error::invalid(format!("duplicate status name: '{}'", name)));
    }
    for status in statuses {
        if !palette.contains(&status.color) {
            return Err(Error::invalid(format!(
                "status '{}' uses color '{}', which is not one of: {}",
                status.name,
                status.color,
                palette.colors().join(", ")
            )));
        }
    }
    Ok(())
}

pub fn validate_project_tags(tags: &[ProjectTag]) -> Result<()> {
    if let Some(name) = first_duplicate(tags.iter().map(|t| t.name.as_str())) {
        return Err(Error::invalid(format!("duplicate project name: '{}'", name)));
    }
    for tag in tags {
        if !is_hex_color(&tag.color) {
            return Err(Error::invalid(format!(
                "project '{}' has invalid color '{}' (expected #RRGGBB)",
                tag.name, tag.color
            )));
        }
    }
    Ok(())
}

/// Null out node status/project references that point at nothing in this
/// document. Returns how many references were cleared.
pub fn clear_dangling_refs(project: &mut Project) -> usize {
    let status_ids: HashSet<&str> = project.statuses.iter().map(|s| s.id.as_str()).collect();
    let tag_ids: HashSet<&str> = project
        .feature_projects
        .iter()
        .map(|t| t.id.as_str())
        .collect();

    let mut cleared = 0;
    for node in &mut project.nodes {
        if node
            .status_id
            .as_deref()
            .is_some_and(|id| !status_ids.contains(id))
        {
            node.status_id = None;
            cleared += 1;
        }
        if node
            .project_id
            .as_deref()
            .is_some_and(|id| !tag_ids.contains(id))
        {
            node.project_id = None;
            cleared += 1;
        }
    }
    cleared
}

/// Idempotent: `normalize(normalize(p)) == normalize(p)`.
pub fn normalize(mut project: Project) -> Project {
    clear_dangling_refs(&mut project);
    project
}
