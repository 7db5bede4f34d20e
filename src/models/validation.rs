use crate::{
    error::{AppError, Result},
    utils::slugify,
};

/// Trimmed value of a required text field.
pub fn required_text(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

/// Trimmed value of a text field that may be omitted but not blanked.
pub fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>> {
    value.map(|v| required_text(field, Some(v))).transpose()
}

pub fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

/// Slug for an already validated, non-empty name.
pub fn slug_for(name: &str) -> Result<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "name must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_missing() {
        let err = required_text("name", Some("   ".to_string())).unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == "name is required"));
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(
            required_text("brand", Some("  Apple ".to_string())).unwrap(),
            "Apple"
        );
    }

    #[test]
    fn omitted_optional_text_is_none_but_blank_is_rejected() {
        assert_eq!(optional_text("image", None).unwrap(), None);
        assert!(optional_text("image", Some(String::new())).is_err());
    }

    #[test]
    fn symbol_only_name_has_no_slug() {
        assert!(matches!(slug_for("!!!"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn cyrillic_name_gets_a_transliterated_slug() {
        assert_eq!(slug_for("Обувь").unwrap(), "obuv");
    }
}
