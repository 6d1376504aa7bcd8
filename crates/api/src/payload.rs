//! Mapping between request bodies and [`MovieInput`].
//!
//! Create and replace accept `application/json`,
//! `application/x-www-form-urlencoded` or `multipart/form-data` (the only way
//! to send a poster file). All are first flattened into a field map plus a
//! poster part, then validated in one place by [`MoviePayload::into_form`].

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use reel_core::error::CoreError;
use reel_core::fields::{self, FieldErrors, NOT_A_FILE};
use reel_core::poster::{detect_poster_format, PosterFormat};
use reel_db::models::movie::{MovieInput, PosterChange};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// A poster upload whose header has been checked.
#[derive(Debug, Clone)]
pub struct PosterImage {
    pub bytes: Bytes,
    pub format: PosterFormat,
}

/// What the request said about the poster.
#[derive(Debug, Clone, PartialEq)]
enum PosterPart {
    Absent,
    /// `null`, an empty string, or an empty file part.
    Empty,
    /// A value that cannot carry file contents (e.g. a JSON string).
    NotAFile,
    File(Bytes),
}

/// An unvalidated movie body. Extract it in handlers, then call
/// [`into_form`](Self::into_form).
#[derive(Debug)]
pub struct MoviePayload {
    fields: Map<String, Value>,
    poster: PosterPart,
}

/// A validated movie body.
#[derive(Debug)]
pub struct MovieForm {
    /// `poster` is `Keep` or `Clear` here; an upload is applied once stored.
    pub input: MovieInput,
    pub poster: Option<PosterImage>,
}

impl MoviePayload {
    pub fn from_json(value: Value) -> AppResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(AppError::BadRequest("Expected a JSON object".into()));
        };

        let poster = match fields.remove("poster") {
            None => PosterPart::Absent,
            Some(Value::Null) => PosterPart::Empty,
            Some(Value::String(s)) if s.is_empty() => PosterPart::Empty,
            Some(_) => PosterPart::NotAFile,
        };

        Ok(Self { fields, poster })
    }

    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut fields = Map::new();
        let mut poster = PosterPart::Absent;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(stream_error)?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "" => {}
                "poster" => {
                    let is_file = field.file_name().is_some();
                    let data = field
                        .bytes()
                        .await
                        .map_err(stream_error)?;
                    poster = if data.is_empty() {
                        PosterPart::Empty
                    } else if is_file {
                        PosterPart::File(data)
                    } else {
                        PosterPart::NotAFile
                    };
                }
                _ => {
                    let text = field
                        .text()
                        .await
                        .map_err(stream_error)?;
                    fields.insert(name, Value::String(text));
                }
            }
        }

        Ok(Self { fields, poster })
    }

    /// Validate every field, collecting all messages before failing.
    ///
    /// `id` and unknown fields are ignored.
    pub fn into_form(self) -> Result<MovieForm, CoreError> {
        let mut errors = FieldErrors::new();
        let values = &self.fields;

        let title = errors.check("title", fields::text_value(values.get("title")));
        let genre = errors.check("genre", fields::text_value(values.get("genre")));
        let director = errors.check("director", fields::text_value(values.get("director")));
        let release_year = errors.check(
            "release_year",
            fields::integer_value(values.get("release_year")),
        );
        let rating = errors.check("rating", fields::number_value(values.get("rating")));

        let (poster_change, poster_image) = match self.poster {
            PosterPart::Absent => (PosterChange::Keep, None),
            PosterPart::Empty => (PosterChange::Clear, None),
            PosterPart::NotAFile => {
                errors.add("poster", NOT_A_FILE);
                (PosterChange::Keep, None)
            }
            PosterPart::File(bytes) => match detect_poster_format(&bytes) {
                Ok(format) => (PosterChange::Keep, Some(PosterImage { bytes, format })),
                Err(message) => {
                    errors.add("poster", message);
                    (PosterChange::Keep, None)
                }
            },
        };

        let (Some(title), Some(genre), Some(director), Some(release_year), Some(rating)) =
            (title, genre, director, release_year, rating)
        else {
            return Err(CoreError::Validation(errors));
        };

        let input = MovieInput {
            title,
            genre,
            director,
            release_year,
            rating,
            poster: poster_change,
        };

        if let Err(invalid) = input.validate() {
            errors.merge(invalid.into());
        }
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }

        Ok(MovieForm {
            input,
            poster: poster_image,
        })
    }
}

fn stream_error(err: MultipartError) -> AppError {
    AppError::rejected(err.status(), err.body_text())
}

impl<S> FromRequest<S> for MoviePayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
            Self::from_json(Value::Object(fields))
        } else {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
            Self::from_json(value)
        }
    }
}
