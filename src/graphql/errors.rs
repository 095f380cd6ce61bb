use async_graphql::{Error as GraphQLError, ErrorExtensions, Result as GraphQLResult};
use uuid::Uuid;

use crate::api::ApiError;

impl ErrorExtensions for ApiError {
    /// Same message as the REST envelope, with the HTTP status as `code`.
    fn extend(&self) -> GraphQLError {
        let message = match self {
            ApiError::Validation(errors) => errors
                .iter()
                .map(|(field, reason)| format!("{field}: {reason}"))
                .collect::<Vec<_>>()
                .join(", "),
            other => other.message(),
        };
        let code = i32::from(self.status().as_u16());
        GraphQLError::new(message).extend_with(|_, e| e.set("code", code))
    }
}

/// Converts any error the REST handlers understand into a GraphQL error.
pub trait GqlResultExt<T> {
    fn gql(self) -> GraphQLResult<T>;
}

impl<T, E> GqlResultExt<T> for Result<T, E>
where
    E: Into<ApiError>,
{
    fn gql(self) -> GraphQLResult<T> {
        self.map_err(|e| {
            let err: ApiError = e.into();
            err.extend()
        })
    }
}

pub fn parse_id(raw: &str) -> GraphQLResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid identifier".into()).extend())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::validation::single;
    use async_graphql::Pos;

    #[test]
    fn carries_http_status_as_code() {
        let err = ApiError::NotFound("Post not found".into()).extend();
        let json = serde_json::to_value(err.into_server_error(Pos::default())).unwrap();
        assert_eq!(json["message"], "Post not found");
        assert_eq!(json["extensions"]["code"], 404);
    }

    #[test]
    fn validation_lists_fields() {
        let err = ApiError::Validation(single("caption", "is required")).extend();
        assert_eq!(err.message, "caption: is required");
    }

    #[test]
    fn rejects_bad_ids() {
        assert!(parse_id("nope").is_err());
        assert!(parse_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
