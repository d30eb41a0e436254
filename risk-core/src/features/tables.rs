//! Categorical Tables - choice label → numeric code
//!
//! Mỗi bảng là một hàm toàn phần trên miền khai báo của nó.
//! Giá trị ngoài bảng là lỗi, không bao giờ là giá trị mặc định.

use crate::error::EncodeError;

/// A closed enumeration with its numeric encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTable {
    pub name: &'static str,
    entries: &'static [(&'static str, f32)],
}

impl CategoryTable {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, f32)]) -> Self {
        Self { name, entries }
    }

    /// Exact, case-sensitive match against the declared labels
    pub fn lookup(&self, field: &str, value: &str) -> Result<f32, EncodeError> {
        self.entries
            .iter()
            .find(|(label, _)| *label == value)
            .map(|(_, code)| *code)
            .ok_or_else(|| EncodeError::UnrecognizedCategory {
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    /// Labels in display order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|(label, _)| *label == value)
    }
}

pub const YES_NO: CategoryTable = CategoryTable::new("yes_no", &[("Yes", 1.0), ("No", 0.0)]);

pub const SEX: CategoryTable = CategoryTable::new("sex", &[("Male", 1.0), ("Female", 0.0)]);

pub const PHYSICAL_ACTIVITY: CategoryTable = CategoryTable::new(
    "physical_activity",
    &[
        ("None", 0.0),
        ("Rarely", 2.5),
        ("Sometimes", 5.0),
        ("Often", 7.5),
        ("Everyday", 10.0),
    ],
);

pub const FRUIT_VEG: CategoryTable = CategoryTable::new(
    "fruit_veg",
    &[("No", 0.0), ("Sometimes", 0.5), ("Yes", 1.0)],
);

/// Monthly income brackets, ranked 1..5
pub const INCOME: CategoryTable = CategoryTable::new(
    "income",
    &[
        ("< RM1,000", 1.0),
        ("RM1,000–RM3,000", 2.0),
        ("RM3,001–RM5,000", 3.0),
        ("RM5,001–RM10,000", 4.0),
        ("> RM10,000", 5.0),
    ],
);

/// "Have you been unwell?" flag standing in for a 0-30 day count
pub const ILLNESS_FLAG: CategoryTable =
    CategoryTable::new("illness_flag", &[("Yes", 5.0), ("No", 0.0)]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no_exact_match() {
        assert_eq!(YES_NO.lookup("smoking", "Yes"), Ok(1.0));
        assert_eq!(YES_NO.lookup("smoking", "No"), Ok(0.0));
        assert!(YES_NO.lookup("smoking", "yes").is_err());
        assert!(YES_NO.lookup("smoking", "Yes ").is_err());
    }

    #[test]
    fn test_unrecognized_category_carries_field_and_value() {
        assert_eq!(
            YES_NO.lookup("alcohol", "Maybe"),
            Err(EncodeError::UnrecognizedCategory {
                field: "alcohol".to_string(),
                value: "Maybe".to_string(),
            })
        );
    }

    #[test]
    fn test_activity_scale() {
        let codes: Vec<f32> = PHYSICAL_ACTIVITY
            .labels()
            .map(|l| PHYSICAL_ACTIVITY.lookup("physical_activity", l).unwrap())
            .collect();
        assert_eq!(codes, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_income_ranks() {
        assert_eq!(INCOME.lookup("income", "< RM1,000"), Ok(1.0));
        assert_eq!(INCOME.lookup("income", "RM1,000–RM3,000"), Ok(2.0));
        assert_eq!(INCOME.lookup("income", "> RM10,000"), Ok(5.0));
        // ASCII hyphen is not the same label
        assert!(INCOME.lookup("income", "RM1,000-RM3,000").is_err());
    }

    #[test]
    fn test_fruit_veg_and_sex() {
        assert_eq!(FRUIT_VEG.lookup("fruit_veg", "Sometimes"), Ok(0.5));
        assert_eq!(SEX.lookup("sex", "Female"), Ok(0.0));
        assert!(SEX.contains("Male"));
        assert!(!SEX.contains("male"));
    }

    #[test]
    fn test_illness_flag() {
        assert_eq!(ILLNESS_FLAG.lookup("mental_illness", "Yes"), Ok(5.0));
        assert_eq!(ILLNESS_FLAG.lookup("mental_illness", "No"), Ok(0.0));
    }
}
