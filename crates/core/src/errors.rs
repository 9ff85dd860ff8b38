use thiserror::Error;

/// Field-level failures raised by the parsers and by `Record` setters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("input cannot be blank")]
    Blank,
    #[error("invalid phone format")]
    PhoneFormat,
    #[error("invalid street format")]
    StreetFormat,
    #[error("a street name is required")]
    MissingStreetName,
    #[error("a street number is required")]
    MissingStreetNumber,
    #[error("invalid date format")]
    DateFormat,
    #[error("invalid calendar date {year}-{month}-{day}")]
    CalendarDate { year: i32, month: u32, day: u32 },
    #[error("invalid email address")]
    EmailFormat,
    #[error("invalid number")]
    NumberFormat,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{0} has not been found in the base")]
    NotFound(String),
    #[error("the birthday has not been set")]
    BirthdayUnset,
    #[error("judging by the date of birth, this person has not been born yet")]
    NotYetBorn,
    #[error("storage io error: {0}")]
    StorageIo(String),
    #[error("internal error: {0}")]
    Internal(String),
}
