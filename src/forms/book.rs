use serde_derive::Deserialize;
use serde_valid::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub title: String,
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub author: String,
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub genre: String,
    #[validate(minimum = 0)]
    #[validate(maximum = 9999)]
    pub year: i32,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookUpdateForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub title: Option<String>,
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub author: Option<String>,
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub genre: Option<String>,
    #[validate(minimum = 0)]
    #[validate(maximum = 9999)]
    pub year: Option<i32>,
}

impl BookUpdateForm {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.genre.is_none() && self.year.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_requires_every_field() {
        let form: BookForm = serde_json::from_value(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science fiction",
            "year": 1965
        }))
        .unwrap();
        assert!(form.validate().is_ok());

        let missing_year = serde_json::from_value::<BookForm>(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science fiction"
        }));
        assert!(missing_year.is_err());

        let form: BookForm = serde_json::from_value(json!({
            "title": "",
            "author": "Frank Herbert",
            "genre": "Science fiction",
            "year": 1965
        }))
        .unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_year_out_of_range_fails_validation() {
        let form: BookUpdateForm = serde_json::from_value(json!({"year": -4})).unwrap();
        assert!(form.validate().is_err());

        let form: BookUpdateForm = serde_json::from_value(json!({"year": 10000})).unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_book_update_form_emptiness() {
        assert!(BookUpdateForm::default().is_empty());
        let form: BookUpdateForm = serde_json::from_value(json!({"genre": "Classic"})).unwrap();
        assert!(!form.is_empty());
        assert!(form.validate().is_ok());
    }
}
