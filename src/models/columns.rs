//! Column codecs shared by the row mappers.
//!
//! SQLite has no exact decimal type, so each decimal column is stored as an
//! integer holding the value multiplied by `10^decimal_places`. Enums are
//! stored as their snake_case names.

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::{FieldErrors, ValidationKind};

/// Declared precision of a decimal column: total digits and digits after
/// the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSpec {
    pub max_digits: u32,
    pub decimal_places: u32,
}

pub const MONEY: DecimalSpec = DecimalSpec {
    max_digits: 10,
    decimal_places: 2,
};
pub const BATHROOMS: DecimalSpec = DecimalSpec {
    max_digits: 3,
    decimal_places: 1,
};
pub const COORDINATE: DecimalSpec = DecimalSpec {
    max_digits: 9,
    decimal_places: 6,
};
pub const SCORE: DecimalSpec = DecimalSpec {
    max_digits: 3,
    decimal_places: 2,
};

impl DecimalSpec {
    /// Records a `RangeConstraint` failure when `value` does not fit.
    pub fn check(&self, field: &str, value: Decimal, errors: &mut FieldErrors) {
        let normalized = value.normalize();
        let whole = normalized.abs().trunc();
        let whole_digits = if whole.is_zero() {
            0
        } else {
            whole.to_string().len() as u32
        };
        let max_whole = self.max_digits - self.decimal_places;

        if normalized.scale() > self.decimal_places {
            errors.push(
                field,
                ValidationKind::RangeConstraint,
                format!(
                    "Ensure that there are no more than {} decimal places.",
                    self.decimal_places
                ),
            );
        } else if whole_digits > max_whole {
            errors.push(
                field,
                ValidationKind::RangeConstraint,
                format!(
                    "Ensure that there are no more than {max_whole} digits before the decimal point."
                ),
            );
        }
    }

    /// Integer representation for storage. Values with more decimal places
    /// than declared are rounded half-even.
    pub fn to_scaled(&self, value: Decimal) -> i64 {
        let mut v = value.round_dp(self.decimal_places);
        v.rescale(self.decimal_places);
        // max_digits <= 10 keeps every checked value well inside i64
        i64::try_from(v.mantissa()).unwrap_or(i64::MAX)
    }

    pub fn from_scaled(&self, raw: i64) -> Decimal {
        Decimal::new(raw, self.decimal_places)
    }

    pub fn get(&self, row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
        let raw: i64 = row.try_get(column)?;
        Ok(self.from_scaled(raw))
    }

    pub fn get_opt(&self, row: &SqliteRow, column: &str) -> Result<Option<Decimal>, sqlx::Error> {
        let raw: Option<i64> = row.try_get(column)?;
        Ok(raw.map(|r| self.from_scaled(r)))
    }
}

/// Decodes a TEXT column through `FromStr`, surfacing parse failures as
/// column decode errors.
pub fn get_parsed<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn money_scales_to_cents_and_back() {
        assert_eq!(MONEY.to_scaled(d("100.00")), 10_000);
        assert_eq!(MONEY.to_scaled(d("99.5")), 9_950);
        assert_eq!(MONEY.from_scaled(30_000).to_string(), "300.00");
    }

    #[test]
    fn coordinates_keep_six_places() {
        let lat = d("40.712776");
        assert_eq!(COORDINATE.from_scaled(COORDINATE.to_scaled(lat)), lat);
        assert_eq!(COORDINATE.to_scaled(d("-73.9")), -73_900_000);
    }

    #[test]
    fn trailing_zeros_do_not_count_against_precision() {
        let mut errors = FieldErrors::new();
        BATHROOMS.check("bathrooms", d("1.50"), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn too_many_decimal_places_is_a_range_error() {
        let mut errors = FieldErrors::new();
        MONEY.check("price", d("10.005"), &mut errors);
        assert_eq!(errors.kind_of("price"), Some(ValidationKind::RangeConstraint));
    }

    #[test]
    fn too_many_whole_digits_is_a_range_error() {
        let mut errors = FieldErrors::new();
        COORDINATE.check("latitude", d("1000.5"), &mut errors);
        BATHROOMS.check("bathrooms", d("99.5"), &mut errors);
        assert_eq!(errors.kind_of("latitude"), Some(ValidationKind::RangeConstraint));
        assert!(errors.message_of("bathrooms").is_none());

        let mut errors = FieldErrors::new();
        BATHROOMS.check("bathrooms", d("100"), &mut errors);
        assert!(errors.kind_of("bathrooms").is_some());
    }
}
