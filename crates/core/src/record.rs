use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, ParseError};
use crate::parse::{
    parse_date, parse_phone, parse_street, parse_street_pair, title_case, valid_email, PhoneRegion,
};

/// The attributes a record can be sorted and searched by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Surname,
    Email,
    Phone,
    PhoneArea,
    PersonId,
    Birthday,
    Year,
    Month,
    Day,
    City,
    StreetName,
    StreetNumber,
}

/// A comparable attribute value. A given [`Field`] always yields the same
/// variant, so cross-variant ordering never comes into play.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Int(i32),
}

/// One contact entry. Every mutation goes through a setter that re-runs the
/// relevant parser, so derived field groups (the phone triple, the birthday
/// plus year/month/day, the street pair) never end up half-updated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    name: String,
    surname: String,
    email: String,
    phone: String,
    phone_area: String,
    phone_display: String,
    person_id: String,
    #[serde(default)]
    region: PhoneRegion,
    #[serde(default)]
    birthday: Option<NaiveDate>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    month: Option<u32>,
    #[serde(default)]
    day: Option<u32>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    street_name: Option<String>,
    #[serde(default)]
    street_number: Option<String>,
}

impl Record {
    /// Build a record from the four mandatory attributes. Fails atomically
    /// when the email or the phone number does not parse.
    ///
    /// `person_id` is fixed here, once: later edits to the name or surname
    /// do not touch it.
    pub fn new(
        name: &str,
        surname: &str,
        email: &str,
        phone: &str,
        region: PhoneRegion,
    ) -> Result<Self, ParseError> {
        let name = title_case(name);
        let surname = title_case(surname);
        let email = valid_email(email)?.to_string();
        let parsed = parse_phone(phone, region)?;
        let person_id = format!("{surname}_{name}");
        Ok(Self {
            name,
            surname,
            email,
            phone: parsed.digits,
            phone_area: parsed.area,
            phone_display: parsed.display,
            person_id,
            region,
            birthday: None,
            year: None,
            month: None,
            day: None,
            city: None,
            street_name: None,
            street_number: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Digits-only phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn phone_area(&self) -> &str {
        &self.phone_area
    }

    /// The phone number as matched, separators preserved.
    pub fn phone_display(&self) -> &str {
        &self.phone_display
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn region(&self) -> PhoneRegion {
        self.region
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn street_name(&self) -> Option<&str> {
        self.street_name.as_deref()
    }

    pub fn street_number(&self) -> Option<&str> {
        self.street_number.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = title_case(name);
    }

    pub fn set_surname(&mut self, surname: &str) {
        self.surname = title_case(surname);
    }

    pub fn set_city(&mut self, city: &str) {
        self.city = Some(title_case(city));
    }

    /// Re-validate and store verbatim; email is never case-normalized.
    pub fn set_email(&mut self, email: &str) -> Result<(), ParseError> {
        self.email = valid_email(email)?.to_string();
        Ok(())
    }

    /// Re-parse with the record's region and replace the whole phone triple.
    pub fn set_phone(&mut self, phone: &str) -> Result<(), ParseError> {
        let parsed = parse_phone(phone, self.region)?;
        self.phone = parsed.digits;
        self.phone_area = parsed.area;
        self.phone_display = parsed.display;
        Ok(())
    }

    /// Combined street input; both a name and a number must be present.
    pub fn set_street(&mut self, street: &str) -> Result<(), ParseError> {
        let compact: String = street.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(ParseError::Blank);
        }
        if compact.chars().all(|c| c.is_alphabetic()) {
            return Err(ParseError::MissingStreetNumber);
        }
        // The numeric check looks at the raw string: "64 10" is not purely
        // numeric and goes through the parser (which reads it as number 64,
        // name "10").
        if street.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseError::MissingStreetName);
        }
        let (name, number) = parse_street(street)?;
        self.street_name = Some(name);
        self.street_number = Some(number);
        Ok(())
    }

    /// Re-parse the name together with the current number (or a blank
    /// placeholder) so the pair stays consistent.
    pub fn set_street_name(&mut self, name: &str) -> Result<(), ParseError> {
        let number = self.street_number.as_deref().unwrap_or(" ").to_string();
        let (name, number) = parse_street_pair(name, &number)?;
        self.street_name = Some(name);
        self.street_number = Some(number);
        Ok(())
    }

    /// Mirror of [`set_street_name`](Self::set_street_name).
    pub fn set_street_number(&mut self, number: &str) -> Result<(), ParseError> {
        let name = self.street_name.as_deref().unwrap_or(" ").to_string();
        let (name, number) = parse_street_pair(&name, number)?;
        self.street_name = Some(name);
        self.street_number = Some(number);
        Ok(())
    }

    /// Parse the date text, reject calendar-invalid combinations, and set
    /// birthday plus year/month/day as a unit.
    pub fn set_birthday(&mut self, birthday: &str) -> Result<(), ParseError> {
        let (year, month, day) = parse_date(birthday)?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ParseError::CalendarDate { year, month, day })?;
        self.birthday = Some(date);
        self.year = Some(date.year());
        self.month = Some(date.month());
        self.day = Some(date.day());
        Ok(())
    }

    /// Whole elapsed years between the birthday and `today`.
    pub fn age_on(&self, today: NaiveDate) -> Result<i32, CoreError> {
        let birthday = self.birthday.ok_or(CoreError::BirthdayUnset)?;
        let mut years = today.year() - birthday.year();
        if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
            years -= 1;
        }
        if years < 0 {
            return Err(CoreError::NotYetBorn);
        }
        Ok(years)
    }

    pub fn age(&self) -> Result<i32, CoreError> {
        self.age_on(Local::now().date_naive())
    }

    /// `"Label: value"` lines for every set field, in a fixed order.
    pub fn details(&self) -> Vec<String> {
        let fields: [(&str, Option<String>); 8] = [
            ("Surname", Some(self.surname.clone())),
            ("Name", Some(self.name.clone())),
            ("Email", Some(self.email.clone())),
            ("Phone", Some(self.phone.clone())),
            ("Birthday", self.birthday.map(|d| d.to_string())),
            ("City", self.city.clone()),
            ("Streetname", self.street_name.clone()),
            ("Streetnumber", self.street_number.clone()),
        ];
        fields
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
            .collect()
    }

    /// The attribute the sort and search engines key on; `None` when the
    /// field is unset.
    pub fn value_of(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Name => Some(FieldValue::Text(self.name.clone())),
            Field::Surname => Some(FieldValue::Text(self.surname.clone())),
            Field::Email => Some(FieldValue::Text(self.email.clone())),
            Field::Phone => Some(FieldValue::Text(self.phone.clone())),
            Field::PhoneArea => Some(FieldValue::Text(self.phone_area.clone())),
            Field::PersonId => Some(FieldValue::Text(self.person_id.clone())),
            Field::Birthday => self.birthday.map(FieldValue::Date),
            Field::Year => self.year.map(FieldValue::Int),
            Field::Month => self.month.map(|m| FieldValue::Int(m as i32)),
            Field::Day => self.day.map(|d| FieldValue::Int(d as i32)),
            Field::City => self.city.clone().map(FieldValue::Text),
            Field::StreetName => self.street_name.clone().map(FieldValue::Text),
            Field::StreetNumber => self.street_number.clone().map(FieldValue::Text),
        }
    }
}

// Identity is the fixed person_id, nothing else.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.person_id == other.person_id
    }
}

impl Eq for Record {}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.person_id.cmp(&other.person_id)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Record: {}, {}, {}, {}>",
            self.name, self.surname, self.email, self.phone
        )
    }
}
