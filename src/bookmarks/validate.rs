use serde::Deserialize;
use serde_json::Value as JsonValue;
use url::Url;

use crate::error::ValidationError;

/// Create payload as it arrives on the wire. All fields are optional here so
/// presence checks produce this API's own messages instead of a rejection
/// from the JSON extractor; `rating` stays a raw JSON value until the
/// rating rule has run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<JsonValue>,
}

/// A create payload that passed validation.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<JsonValue>,
}

/// An update payload that passed validation; only the supplied fields are
/// set.
#[derive(Debug, Clone, Default)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i32>,
}

impl CreateBookmark {
    /// Checks the three required fields in a fixed order and reports the
    /// first one missing, then applies the url and rating rules.
    pub fn validate(self) -> Result<NewBookmark, ValidationError> {
        let title = require_text("title", self.title)?;
        let url = require_text("url", self.url)?;
        let rating = match self.rating {
            Some(value) => value,
            None => return Err(ValidationError::MissingField("rating")),
        };

        check_web_uri(&url)?;
        let rating = check_rating(&rating)?;

        Ok(NewBookmark {
            title,
            url,
            description: self.description,
            rating,
        })
    }
}

impl UpdateBookmark {
    /// At least one of title, url, rating must be supplied; description alone
    /// does not count as an update. Supplied url and rating values follow the
    /// create rules.
    pub fn validate(self) -> Result<BookmarkPatch, ValidationError> {
        let title = self.title.filter(|title| !title.is_empty());
        let url = self.url.filter(|url| !url.is_empty());

        if title.is_none() && url.is_none() && self.rating.is_none() {
            return Err(ValidationError::EmptyUpdate);
        }

        if let Some(url) = &url {
            check_web_uri(url)?;
        }
        let rating = match &self.rating {
            Some(value) => Some(check_rating(value)?),
            None => None,
        };

        Ok(BookmarkPatch {
            title,
            url,
            description: self.description,
            rating,
        })
    }
}

fn require_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Absolute http(s) URL with a non-empty host.
fn check_web_uri(raw: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl)?;
    let scheme_ok = matches!(parsed.scheme(), "http" | "https");
    let host_ok = parsed.host_str().is_some_and(|host| !host.is_empty());
    if scheme_ok && host_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl)
    }
}

/// JSON number that is a whole value in [0,5]. A number is judged by value,
/// not wire form, so `4.0` counts as 4 while `3.5`, strings, and null are
/// rejected.
fn check_rating(value: &JsonValue) -> Result<i32, ValidationError> {
    let rating = match value.as_i64() {
        Some(whole) => whole,
        None => {
            let number = value.as_f64().ok_or(ValidationError::InvalidRating)?;
            if number.fract() != 0.0 {
                return Err(ValidationError::InvalidRating);
            }
            number as i64
        }
    };
    if !(0..=5).contains(&rating) {
        return Err(ValidationError::InvalidRating);
    }
    Ok(rating as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_from(value: serde_json::Value) -> CreateBookmark {
        serde_json::from_value(value).unwrap()
    }

    fn update_from(value: serde_json::Value) -> UpdateBookmark {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_create_reports_first_missing_field() {
        let err = create_from(json!({})).validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing 'title' in request body");

        let err = create_from(json!({"title": "x"})).validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing 'url' in request body");

        let err = create_from(json!({"title": "x", "url": "https://x.dev"}))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing 'rating' in request body");
    }

    #[test]
    fn test_create_treats_empty_and_null_as_missing() {
        let err = create_from(json!({"title": "", "url": "https://x.dev", "rating": 3}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title"));

        let err = create_from(json!({"title": "x", "url": null, "rating": 3}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("url"));

        let err = create_from(json!({"title": "x", "url": "https://x.dev", "rating": null}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("rating"));
    }

    #[test]
    fn test_create_missing_rating_beats_invalid_url() {
        let err = create_from(json!({"title": "x", "url": "htps//nope"}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("rating"));
    }

    #[test]
    fn test_create_url_rule() {
        let bad = [
            "htps//www.newurl.com",
            "htp://invalid.url",
            "ftp://example.com",
            "https://",
            "not a url",
        ];
        for url in bad {
            let err = create_from(json!({"title": "x", "url": url, "rating": 3}))
                .validate()
                .unwrap_err();
            assert_eq!(err, ValidationError::InvalidUrl, "url: {url}");
        }

        let good = ["http://example.com", "https://example.com/path?x=1"];
        for url in good {
            let result = create_from(json!({"title": "x", "url": url, "rating": 3})).validate();
            assert!(result.is_ok(), "url: {url}");
        }
    }

    #[test]
    fn test_create_rating_rule() {
        let bad = [
            json!("invalid"),
            json!(6),
            json!(-1),
            json!(3.5),
            json!(6.0),
            json!(true),
        ];
        for rating in bad {
            let err = create_from(json!({"title": "x", "url": "https://x.dev", "rating": rating}))
                .validate()
                .unwrap_err();
            assert_eq!(err, ValidationError::InvalidRating);
        }

        for rating in 0..=5 {
            let bookmark = create_from(json!({"title": "x", "url": "https://x.dev", "rating": rating}))
                .validate()
                .unwrap();
            assert_eq!(bookmark.rating, rating);
        }

        // A whole float is the same rating its integer form would be.
        let bookmark = create_from(json!({"title": "x", "url": "https://x.dev", "rating": 4.0}))
            .validate()
            .unwrap();
        assert_eq!(bookmark.rating, 4);
    }

    #[test]
    fn test_create_description_is_optional() {
        let bookmark = create_from(json!({"title": "x", "url": "https://x.dev", "rating": 0}))
            .validate()
            .unwrap();
        assert_eq!(bookmark.description, None);
    }

    #[test]
    fn test_update_requires_a_recognized_field() {
        let empties = [
            json!({}),
            json!({"description": "only a description"}),
            json!({"fieldToIgnore": "x"}),
            json!({"title": ""}),
        ];
        for payload in empties {
            let err = update_from(payload).validate().unwrap_err();
            assert_eq!(err, ValidationError::EmptyUpdate);
        }
        assert_eq!(
            ValidationError::EmptyUpdate.to_string(),
            "Request body must contain either 'title, 'url', or 'rating'"
        );
    }

    #[test]
    fn test_update_revalidates_url_and_rating() {
        let err = update_from(json!({"url": "htp://invalid.url"}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidUrl);

        let err = update_from(json!({"rating": "invalid"})).validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidRating);

        let patch = update_from(json!({"rating": 5.0})).validate().unwrap();
        assert_eq!(patch.rating, Some(5));
    }

    #[test]
    fn test_update_passes_through_subset() {
        let patch = update_from(json!({"title": "new title"})).validate().unwrap();
        assert_eq!(patch.title.as_deref(), Some("new title"));
        assert_eq!(patch.url, None);
        assert_eq!(patch.description, None);
        assert_eq!(patch.rating, None);
    }
}
