//! Submission gate for the report form.
//!
//! Pure function of the form and its config. The result is all-or-nothing:
//! a single [`ValidationError`] lists every issue found.

use crate::config::{CategoryPolicy, FormConfig};
use crate::error::{FieldIssue, ValidationError};
use crate::model::FormState;

pub fn validate(form: &FormState, config: &FormConfig) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    if form.title.trim().is_empty() {
        issues.push(FieldIssue::BlankTitle);
    }

    if form.description.trim().is_empty() {
        issues.push(FieldIssue::BlankDescription);
    }

    if form.category.trim().is_empty() {
        issues.push(FieldIssue::BlankCategory);
    } else if config.category_policy == CategoryPolicy::MustMatchList
        && !form.has_category(&form.category)
    {
        issues.push(FieldIssue::UnknownCategory {
            name: form.category.clone(),
        });
    }

    if form.coordinates.is_unset() {
        issues.push(FieldIssue::CoordinatesUnset);
    } else if !form.coordinates.is_valid() {
        issues.push(FieldIssue::CoordinatesOutOfRange);
    }

    // Status is a closed enum, so it can never be blank.
    match &form.image {
        Some(image) if !image.is_blank() => {}
        _ => issues.push(FieldIssue::MissingImage),
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}
