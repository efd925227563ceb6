//! [`Context`]-related definitions.

use std::{
    str::FromStr as _,
    sync::atomic::{self, AtomicU16},
};

use axum::{async_trait, extract::FromRequestParts};
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::domain::staff;

use crate::{define_error, Error, JuniperResponse, Service};

/// HTTP header carrying the ID of the staff member issuing the request.
///
/// Staff identity is established by an upstream gateway, so the header is
/// trusted as-is and is optional.
pub const STAFF_ID_HEADER: &str = "X-Staff-Id";

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Error status code.
    error_status_code: AtomicU16,

    /// ID of the staff member issuing the current request (if identified).
    staff_id: Option<staff::Id>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the ID of the staff member issuing the current request, if
    /// the [`STAFF_ID_HEADER`] was provided.
    #[must_use]
    pub fn staff_id(&self) -> Option<staff::Id> {
        self.staff_id
    }

    /// Returns the error status code of this [`Context`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let reject = |status_code, error: Error| JuniperResponse {
            status_code,
            response: GraphQLBatchResponse::Single(GraphQLResponse::error(
                error.into_field_error(),
            )),
        };

        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                reject(
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    Error::internal(&"missing `Service` extension"),
                )
            })?;

        let staff_id = parts
            .headers
            .get(STAFF_ID_HEADER)
            .map(|header| {
                header
                    .to_str()
                    .ok()
                    .and_then(|s| staff::Id::from_str(s).ok())
                    .ok_or_else(|| {
                        reject(
                            http::StatusCode::BAD_REQUEST,
                            StaffIdError::Invalid.into(),
                        )
                    })
            })
            .transpose()?;

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            staff_id,
        })
    }
}

define_error! {
    enum StaffIdError {
        #[code = "INVALID_STAFF_ID"]
        #[status = BAD_REQUEST]
        #[message = "`X-Staff-Id` header is not a valid UUID"]
        Invalid,
    }
}
