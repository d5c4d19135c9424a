//! Declarative column-name aliases for roster tables.
//!
//! Headers are matched after normalization (case, surrounding and inner
//! whitespace, `_` and `-` are ignored), so `Module_1`, `module 1` and
//! `MODULE-1` all resolve to the same field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::model::Module;

/// A column the roster must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Module1,
    Module2,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Module1, Field::Module2];
}

impl From<Module> for Field {
    fn from(module: Module) -> Self {
        match module {
            Module::Module1 => Field::Module1,
            Module::Module2 => Field::Module2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Module1 => write!(f, "Module1"),
            Field::Module2 => write!(f, "Module2"),
        }
    }
}

/// Accepted header spellings per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAliases {
    #[serde(default = "default_name_aliases")]
    pub name: Vec<String>,
    #[serde(default = "default_module1_aliases")]
    pub module1: Vec<String>,
    #[serde(default = "default_module2_aliases")]
    pub module2: Vec<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_name_aliases() -> Vec<String> {
    to_strings(&["이름", "name", "student", "student name", "성명", "학생"])
}

fn default_module1_aliases() -> Vec<String> {
    to_strings(&["module1", "module 1", "m1", "mod1", "모듈1"])
}

fn default_module2_aliases() -> Vec<String> {
    to_strings(&["module2", "module 2", "m2", "mod2", "모듈2"])
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            name: default_name_aliases(),
            module1: default_module1_aliases(),
            module2: default_module2_aliases(),
        }
    }
}

impl ColumnAliases {
    pub fn for_field(&self, field: Field) -> &[String] {
        match field {
            Field::Name => &self.name,
            Field::Module1 => &self.module1,
            Field::Module2 => &self.module2,
        }
    }

    /// Defaults plus the given extra spellings.
    pub fn with_extra(extra: &ColumnAliases) -> Self {
        let mut aliases = Self::default();
        for field in Field::ALL {
            let target = match field {
                Field::Name => &mut aliases.name,
                Field::Module1 => &mut aliases.module1,
                Field::Module2 => &mut aliases.module2,
            };
            for alias in extra.for_field(field) {
                if !target.contains(alias) {
                    target.push(alias.clone());
                }
            }
        }
        aliases
    }

    fn matches(&self, field: Field, header: &str) -> bool {
        let header = normalize_header(header);
        self.for_field(field)
            .iter()
            .any(|alias| normalize_header(alias) == header)
    }
}

/// Canonical form used for header comparison.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Column positions of the required fields in one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub module1: usize,
    pub module2: usize,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> usize {
        match field {
            Field::Name => self.name,
            Field::Module1 => self.module1,
            Field::Module2 => self.module2,
        }
    }

    pub fn module(&self, module: Module) -> usize {
        self.get(module.into())
    }
}

/// Resolve the required fields against a header row.
pub fn resolve_columns(headers: &[String], aliases: &ColumnAliases) -> Result<ColumnMap, RosterError> {
    let find = |field: Field| -> Result<usize, RosterError> {
        let mut matches = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| aliases.matches(field, h))
            .map(|(i, _)| i);
        let first = matches.next().ok_or_else(|| RosterError::MissingColumn {
            field,
            accepted: aliases.for_field(field).to_vec(),
            found: headers.to_vec(),
        })?;
        for other in matches {
            tracing::warn!(
                "column '{}' also matches {field}; using '{}'",
                headers[other],
                headers[first]
            );
        }
        Ok(first)
    };

    Ok(ColumnMap {
        name: find(Field::Name)?,
        module1: find(Field::Module1)?,
        module2: find(Field::Module2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(items: &[&str]) -> Vec<String> {
        to_strings(items)
    }

    #[test]
    fn normalization_ignores_case_space_and_punctuation() {
        assert_eq!(normalize_header(" Module_1 "), "module1");
        assert_eq!(normalize_header("MODULE-1"), "module1");
        assert_eq!(normalize_header("\u{feff}이름"), "이름");
        assert_eq!(normalize_header("Student Name"), "studentname");
    }

    #[test]
    fn resolves_korean_headers() {
        let map = resolve_columns(&headers(&["이름", "Module1", "Module2"]), &ColumnAliases::default())
            .unwrap();
        assert_eq!(map, ColumnMap { name: 0, module1: 1, module2: 2 });
    }

    #[test]
    fn resolves_reordered_and_spelled_differently() {
        let map = resolve_columns(
            &headers(&["m2", "Notes", "student_name", "Module 1"]),
            &ColumnAliases::default(),
        )
        .unwrap();
        assert_eq!(map.name, 2);
        assert_eq!(map.module1, 3);
        assert_eq!(map.module2, 0);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = resolve_columns(&headers(&["name", "Module1"]), &ColumnAliases::default())
            .unwrap_err();
        match err {
            RosterError::MissingColumn { field, found, .. } => {
                assert_eq!(field, Field::Module2);
                assert_eq!(found, headers(&["name", "Module1"]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_duplicate_match_wins() {
        let map = resolve_columns(
            &headers(&["name", "이름", "Module1", "Module2"]),
            &ColumnAliases::default(),
        )
        .unwrap();
        assert_eq!(map.name, 0);
    }

    #[test]
    fn extra_aliases_extend_defaults() {
        let extra = ColumnAliases {
            name: vec!["학생명".into()],
            module1: vec![],
            module2: vec!["section two".into()],
        };
        let aliases = ColumnAliases::with_extra(&extra);
        let map = resolve_columns(&headers(&["학생명", "m1", "Section_Two"]), &aliases).unwrap();
        assert_eq!(map, ColumnMap { name: 0, module1: 1, module2: 2 });
    }
}
