//! Parsing answers to the numbered menus shown by `delete`.
//!
//! Menus are 1-based. A blank answer, `0`, `q` or `cancel` means cancel.

use crate::errors::SelectionError;

/// Which versions of a coordinate to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelection {
    All,
    /// 0-based indices into the version list, in the order given, without duplicates.
    Some(Vec<usize>),
}

fn is_cancel(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "" | "0" | "q" | "cancel")
}

fn parse_index(token: &str, max: usize) -> Result<usize, SelectionError> {
    let choice: usize = token.parse().map_err(|_| SelectionError::NotANumber {
        input: token.to_string(),
    })?;
    if choice == 0 || choice > max {
        return Err(SelectionError::OutOfRange { choice, max });
    }
    Ok(choice - 1)
}

/// Parse a single choice from a menu of `max` entries. `Ok(None)` means cancel.
pub fn parse_choice(input: &str, max: usize) -> Result<Option<usize>, SelectionError> {
    let input = input.trim();
    if is_cancel(input) {
        return Ok(None);
    }
    parse_index(input, max).map(Some)
}

/// Parse a version choice from a menu of `count` versions followed by an "all versions" entry.
///
/// Accepts one number, a comma-separated list, `a`/`all`, or the number of
/// the "all versions" entry. `Ok(None)` means cancel.
pub fn parse_versions(input: &str, count: usize) -> Result<Option<VersionSelection>, SelectionError> {
    let input = input.trim();
    if is_cancel(input) {
        return Ok(None);
    }
    if matches!(input.to_lowercase().as_str(), "a" | "all") {
        return Ok(Some(VersionSelection::All));
    }

    let mut indices = Vec::new();
    for token in input.split(',').map(str::trim) {
        if token.is_empty() {
            return Err(SelectionError::Empty);
        }
        let idx = parse_index(token, count + 1)?;
        if idx == count {
            return Ok(Some(VersionSelection::All));
        }
        if !indices.contains(&idx) {
            indices.push(idx);
        }
    }

    if indices.len() == count {
        return Ok(Some(VersionSelection::All));
    }
    Ok(Some(VersionSelection::Some(indices)))
}
