//! The address book: an ordered, record-only collection with sort, search,
//! duplicate-aware insertion, and ambiguity-aware removal.

use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::errors::{CoreError, ParseError};
use crate::parse::{parse_date, parse_phone, parse_street_pair, title_case, PhoneRegion};
use crate::record::{Field, FieldValue, Record};
use crate::search::find_range;
use crate::traits::{DecisionProvider, RemovalChoice, Snapshot};

/// Outcome of a lookup: nothing, exactly one record, or the ordered run of
/// records sharing the queried key.
#[derive(Clone, Debug, PartialEq)]
pub enum Matches {
    None,
    One(Record),
    Many(Vec<Record>),
}

/// Ordered collection of [`Record`]s, bound to at most one snapshot file.
///
/// Only record-typed operations exist, so element type safety is enforced
/// by the compiler rather than by runtime checks.
#[derive(Debug, Default)]
pub struct AddressBook {
    records: Vec<Record>,
    file: Option<PathBuf>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn how_many(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// The snapshot path this book is bound to, once saved or opened.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn append(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn insert(&mut self, index: usize, record: Record) {
        self.records.insert(index, record);
    }

    pub fn extend<I: IntoIterator<Item = Record>>(&mut self, records: I) {
        self.records.extend(records);
    }

    /// Swap out the record at `index`, returning the previous occupant.
    pub fn replace(&mut self, index: usize, record: Record) -> Record {
        std::mem::replace(&mut self.records[index], record)
    }

    /// Stable sort by `(field-is-unset, field-value)`. Ascending puts unset
    /// values last; descending reverses the whole ordering, so unset values
    /// come FIRST there. That asymmetry is documented store behavior.
    pub fn sort_by(&mut self, field: Field, descending: bool) {
        self.records.sort_by(|a, b| {
            let ka = (a.value_of(field).is_none(), a.value_of(field));
            let kb = (b.value_of(field).is_none(), b.value_of(field));
            if descending {
                kb.cmp(&ka)
            } else {
                ka.cmp(&kb)
            }
        });
    }

    /// Look up records by criteria. Only the first pair is processed;
    /// further pairs are accepted and ignored (reference behavior). The raw
    /// value is normalized to the field's stored representation, the book is
    /// sorted ascending by that field, and the search engine does the rest.
    pub fn find_by(&mut self, criteria: &[(Field, &str)]) -> Result<Matches, CoreError> {
        match self.locate(criteria)? {
            None => Ok(Matches::None),
            Some(range) if range.len() == 1 => {
                Ok(Matches::One(self.records[range.start].clone()))
            }
            Some(range) => Ok(Matches::Many(self.records[range].to_vec())),
        }
    }

    /// Construct a record from the four mandatory attributes and append it.
    /// An existing record with the same `person_id` defers the decision to
    /// the provider. Returns whether a record was appended; a validation
    /// failure aborts before any mutation.
    pub fn add_new(
        &mut self,
        name: &str,
        surname: &str,
        email: &str,
        phone: &str,
        decider: &dyn DecisionProvider,
    ) -> Result<bool, CoreError> {
        let record = Record::new(name, surname, email, phone, PhoneRegion::default())?;

        // Nothing to collide with in an empty book.
        if self.records.is_empty() {
            self.records.push(record);
            return Ok(true);
        }

        let target = FieldValue::Text(record.person_id().to_string());
        self.sort_by(Field::PersonId, false);
        match find_range(&self.records, Field::PersonId, &target) {
            None => {
                self.records.push(record);
                Ok(true)
            }
            Some(range) => {
                if decider.allow_duplicate(&self.records[range]) {
                    self.records.push(record);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Remove by criteria. A unique match is removed directly; several
    /// matches defer to the provider. Returns the number removed (zero when
    /// the provider aborts).
    pub fn remove(
        &mut self,
        criteria: &[(Field, &str)],
        decider: &dyn DecisionProvider,
    ) -> Result<usize, CoreError> {
        let described = criteria
            .first()
            .map(|(_, raw)| raw.to_string())
            .unwrap_or_else(|| "the element you're looking for".to_string());
        let range = self
            .locate(criteria)?
            .ok_or(CoreError::NotFound(described))?;

        if range.len() == 1 {
            self.records.remove(range.start);
            return Ok(1);
        }
        match decider.pick_removal(&self.records[range.clone()]) {
            RemovalChoice::Abort => Ok(0),
            RemovalChoice::All => {
                let count = range.len();
                self.records.drain(range);
                Ok(count)
            }
            RemovalChoice::One(index) => {
                if index >= range.len() {
                    return Err(CoreError::Internal(format!(
                        "removal choice {index} out of range for {} candidates",
                        range.len()
                    )));
                }
                self.records.remove(range.start + index);
                Ok(1)
            }
        }
    }

    /// Persist through the snapshot collaborator and bind the written path.
    pub fn save<S: Snapshot>(&mut self, snapshot: &S, path: &Path) -> Result<(), CoreError> {
        let written = snapshot
            .save(path, &self.records)
            .map_err(|e| CoreError::StorageIo(e.to_string()))?;
        self.file = Some(written);
        Ok(())
    }

    /// Re-persist to the already-bound path.
    pub fn save_changes<S: Snapshot>(&self, snapshot: &S) -> Result<(), CoreError> {
        let path = self
            .file
            .as_ref()
            .ok_or_else(|| CoreError::StorageIo("no snapshot file bound".to_string()))?;
        snapshot
            .save(path, &self.records)
            .map_err(|e| CoreError::StorageIo(e.to_string()))?;
        Ok(())
    }

    /// Build a book from a snapshot file and bind it.
    pub fn open<S: Snapshot>(snapshot: &S, path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let records = snapshot
            .load(&path)
            .map_err(|e| CoreError::StorageIo(e.to_string()))?;
        Ok(Self {
            records,
            file: Some(path),
        })
    }

    fn locate(&mut self, criteria: &[(Field, &str)]) -> Result<Option<Range<usize>>, CoreError> {
        let Some(&(field, raw)) = criteria.first() else {
            return Ok(None);
        };
        let target = normalize(field, raw)?;
        if self.records.is_empty() {
            return Ok(None);
        }
        self.sort_by(field, false);
        Ok(find_range(&self.records, field, &target))
    }
}

/// Bring a raw criteria value into the representation the field stores.
fn normalize(field: Field, raw: &str) -> Result<FieldValue, ParseError> {
    let value = match field {
        Field::Name | Field::Surname | Field::City => FieldValue::Text(title_case(raw)),
        Field::StreetName => FieldValue::Text(parse_street_pair(raw, "")?.0),
        Field::Phone => FieldValue::Text(parse_phone(raw, PhoneRegion::default())?.digits),
        Field::Birthday => {
            let (year, month, day) = parse_date(raw)?;
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or(ParseError::CalendarDate { year, month, day })?;
            FieldValue::Date(date)
        }
        Field::Year | Field::Month | Field::Day => {
            FieldValue::Int(raw.trim().parse().map_err(|_| ParseError::NumberFormat)?)
        }
        Field::Email | Field::PhoneArea | Field::PersonId | Field::StreetNumber => {
            FieldValue::Text(raw.to_string())
        }
    };
    Ok(value)
}
