//! 財政年度計算
//!
//! 檔名最後一個 `_` 分隔片段視為日期標記，支援三種格式：
//!
//! - `YYYYFY`：直接指定財政年度，例如 `2022FY`
//! - `MMMYYYY`：月份與年份，例如 `JUL2022`
//! - `DDMMMYYYY`：完整日期，例如 `10JUL2022`
//!
//! 財政年度以結束的年份命名，預設七月開始（`10JUL2022` 屬於 `2023FY`）。

use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FyParseError {
    #[error("No file name")]
    NoFileName,

    #[error("File name is not valid UTF-8")]
    NonUtf8Name,

    #[error("File name does not end with date: {token:?}")]
    UnrecognisedFormat { token: String },

    #[error("Date is not an FY: {token}")]
    NotFiscalYear { token: String },

    #[error("Could not parse year {token:?}")]
    InvalidYear { token: String },

    #[error("Could not parse day of month {token:?}")]
    InvalidDay { token: String },

    #[error("Month {token:?} not recognised")]
    UnknownMonth { token: String },

    #[error("Date {token:?} does not exist")]
    InvalidDate { token: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiscalYear(pub u16);

impl FiscalYear {
    pub fn year(self) -> u16 {
        self.0
    }

    /// 目標資料夾名稱，例如 `2023FY`
    pub fn folder_name(self, suffix: &str) -> String {
        format!("{}{}", self.0, suffix)
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Month {
    Jan = 1,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// 只接受三個大寫字母的月份縮寫
    pub fn from_abbrev(abbrev: &str) -> Option<Self> {
        let month = match abbrev {
            "JAN" => Month::Jan,
            "FEB" => Month::Feb,
            "MAR" => Month::Mar,
            "APR" => Month::Apr,
            "MAY" => Month::May,
            "JUN" => Month::Jun,
            "JUL" => Month::Jul,
            "AUG" => Month::Aug,
            "SEP" => Month::Sep,
            "OCT" => Month::Oct,
            "NOV" => Month::Nov,
            "DEC" => Month::Dec,
            _ => return None,
        };
        Some(month)
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalCalendar {
    start_month: u8,
    strict_dates: bool,
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self {
            start_month: Self::DEFAULT_START_MONTH,
            strict_dates: false,
        }
    }
}

impl FiscalCalendar {
    pub const DEFAULT_START_MONTH: u8 = 7;

    pub fn new(start_month: u8) -> Result<Self> {
        validate_range("fy_start_month", start_month, 1, 12)?;
        Ok(Self {
            start_month,
            strict_dates: false,
        })
    }

    /// 嚴格模式下以 chrono 檢查日期是否存在（例如拒絕 `31FEB2021`）
    pub fn with_strict_dates(mut self, strict_dates: bool) -> Self {
        self.strict_dates = strict_dates;
        self
    }

    pub fn start_month(&self) -> u8 {
        self.start_month
    }

    pub fn strict_dates(&self) -> bool {
        self.strict_dates
    }

    /// 加到日曆年份上即得財政年度
    pub fn offset(&self, month: Month) -> u16 {
        if self.start_month > 1 && month.number() >= self.start_month {
            1
        } else {
            0
        }
    }

    pub fn fiscal_year_of_file(&self, path: &Path) -> std::result::Result<FiscalYear, FyParseError> {
        let token = date_token(path)?;
        self.fiscal_year_of(token)
    }

    pub fn fiscal_year_of(&self, token: &str) -> std::result::Result<FiscalYear, FyParseError> {
        match token.len() {
            6 => fiscal_year_only(token),
            7 => self.month_and_year(token, None),
            9 => self.full_date(token),
            _ => Err(FyParseError::UnrecognisedFormat {
                token: token.to_string(),
            }),
        }
    }

    fn full_date(&self, token: &str) -> std::result::Result<FiscalYear, FyParseError> {
        let day = token
            .get(0..2)
            .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|d| d.parse::<u8>().ok())
            .ok_or_else(|| FyParseError::InvalidDay {
                token: token.to_string(),
            })?;
        let rest = token.get(2..).ok_or_else(|| FyParseError::InvalidDay {
            token: token.to_string(),
        })?;
        self.month_and_year(rest, Some((day, token)))
    }

    fn month_and_year(
        &self,
        token: &str,
        day: Option<(u8, &str)>,
    ) -> std::result::Result<FiscalYear, FyParseError> {
        let month = token
            .get(0..3)
            .and_then(Month::from_abbrev)
            .ok_or_else(|| FyParseError::UnknownMonth {
                token: token.get(0..3).unwrap_or(token).to_string(),
            })?;
        let year = token
            .get(3..)
            .and_then(parse_year)
            .ok_or_else(|| FyParseError::InvalidYear {
                token: token.to_string(),
            })?;

        if let Some((day, full)) = day.filter(|_| self.strict_dates) {
            if NaiveDate::from_ymd_opt(year as i32, month.number() as u32, day as u32).is_none() {
                return Err(FyParseError::InvalidDate {
                    token: full.to_string(),
                });
            }
        }

        // 年份最多四位數（9999），加 1 不會超出 u16
        Ok(FiscalYear(year + self.offset(month)))
    }
}

fn fiscal_year_only(token: &str) -> std::result::Result<FiscalYear, FyParseError> {
    if token.get(4..) != Some("FY") {
        return Err(FyParseError::NotFiscalYear {
            token: token.to_string(),
        });
    }
    token
        .get(0..4)
        .and_then(parse_year)
        .map(FiscalYear)
        .ok_or_else(|| FyParseError::InvalidYear {
            token: token.to_string(),
        })
}

fn parse_year(s: &str) -> Option<u16> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// 取出檔名（不含副檔名）最後一個 `_` 之後的片段
pub fn date_token(path: &Path) -> std::result::Result<&str, FyParseError> {
    let stem = path.file_stem().ok_or(FyParseError::NoFileName)?;
    let stem = stem.to_str().ok_or(FyParseError::NonUtf8Name)?;
    stem.split_terminator('_')
        .last()
        .ok_or_else(|| FyParseError::UnrecognisedFormat {
            token: stem.to_string(),
        })
}
