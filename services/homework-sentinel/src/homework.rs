//! Homework status vocabulary, response validation and message formatting

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::SentinelError;

/// Review state of a homework submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human readable verdict sent to the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(SentinelError::UnknownStatus(other.to_string())),
        }
    }
}

/// Check the API answer's shape and return its `homeworks` list
pub fn check_response(response: &Value) -> crate::Result<&[Value]> {
    tracing::debug!("Checking API response shape");

    let Some(object) = response.as_object() else {
        tracing::error!("API response is not an object");
        return Err(SentinelError::NotAnObject);
    };

    for key in ["homeworks", "current_date"] {
        if !object.contains_key(key) {
            tracing::error!("API response has no '{}' key", key);
            return Err(SentinelError::MissingData(key));
        }
    }

    match &object["homeworks"] {
        Value::Array(homeworks) => Ok(homeworks.as_slice()),
        _ => {
            tracing::error!("'homeworks' in API response is not a list");
            Err(SentinelError::HomeworksNotAList)
        }
    }
}

fn required_str<'a>(homework: &'a Value, field: &'static str) -> crate::Result<&'a str> {
    match homework.get(field).and_then(Value::as_str) {
        Some(value) => Ok(value),
        None => {
            tracing::error!("Homework record has no '{}' field", field);
            Err(SentinelError::MissingField(field))
        }
    }
}

/// Build the chat message describing one homework record
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    let name = required_str(homework, "homework_name")?;
    let status = required_str(homework, "status")?
        .parse::<HomeworkStatus>()
        .inspect_err(|e| tracing::error!("{}", e))?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}
