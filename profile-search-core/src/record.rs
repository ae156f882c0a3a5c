use crate::dataset::Cell;
use profile_search_common::ColumnMap;

/// Typed view of one row. An absent column and a missing cell both read as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub name: Option<String>,
    pub age: Option<Cell>,
    pub gender: Option<String>,
    pub salary: Option<Cell>,
    pub hobbies: Option<String>,
    pub qualities: Option<String>,
    pub location: Option<String>,
    pub job: Option<String>,
}

/// Header positions of the profile fields, resolved once per dataset.
#[derive(Debug, Clone, Default)]
pub struct ProfileLayout {
    name: Option<usize>,
    age: Option<usize>,
    gender: Option<usize>,
    salary: Option<usize>,
    hobbies: Option<usize>,
    qualities: Option<usize>,
    location: Option<usize>,
    job: Option<usize>,
}

impl ProfileLayout {
    pub fn new(headers: &[String], columns: &ColumnMap) -> Self {
        let find = |col: &str| headers.iter().position(|h| h == col);
        Self {
            name: find(&columns.name),
            age: find(&columns.age),
            gender: find(&columns.gender),
            salary: find(&columns.salary),
            hobbies: find(&columns.hobbies),
            qualities: find(&columns.qualities),
            location: find(&columns.location),
            job: find(&columns.job),
        }
    }

    pub fn extract(&self, cells: &[Cell], raw: &[String]) -> Profile {
        let text = |idx: Option<usize>| {
            let i = idx?;
            match cells.get(i)? {
                Cell::Null => None,
                _ => raw.get(i).cloned(),
            }
        };
        let cell = |idx: Option<usize>| cells.get(idx?).filter(|c| !c.is_null()).cloned();
        Profile {
            name: text(self.name),
            age: cell(self.age),
            gender: text(self.gender),
            salary: cell(self.salary),
            hobbies: text(self.hobbies),
            qualities: text(self.qualities),
            location: text(self.location),
            job: text(self.job),
        }
    }
}
